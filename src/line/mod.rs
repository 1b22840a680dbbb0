//! Deterministic line animation
//!
//! This module is pure and deterministic:
//! - Seeded RNG only, one stream per line
//! - Timelines advance only when told to
//! - No rendering or platform dependencies beyond vertex output

pub mod backdrop;
pub mod ease;
pub mod path;
pub mod state;
pub mod timeline;

pub use backdrop::Backdrop;
pub use ease::Ease;
pub use path::{Break, Path, SurfaceSize, UnitRandom, Zone, generate, generate_breaks};
pub use state::{AnimationState, NeonLine};
pub use timeline::{Advance, Channel, Scheduler, Timeline, Tween};
