//! Neon Backdrop - procedural neon line background
//!
//! Core modules:
//! - `line`: Deterministic line animation (path generation, timeline, per-line state)
//! - `renderer`: Per-point shading and the WebGPU line pipeline
//! - `settings`: Data-driven backdrop configuration
//! - `error`: Setup errors

pub mod error;
pub mod line;
pub mod renderer;
pub mod settings;

pub use error::{BackdropError, BackdropResult};
pub use line::{AnimationState, Backdrop, NeonLine, Path, SurfaceSize, Zone};
pub use settings::{LineSpec, Settings, TimingSettings};

/// Animation constants
pub mod consts {
    /// Sample points per generated path
    pub const PATH_POINTS: usize = 200;
    /// Off-screen overshoot on each side, as a fraction of surface width
    pub const MARGIN_FRACTION: f32 = 0.05;
    /// Normalized length over which a break ramps to its full offset
    pub const BREAK_RAMP: f32 = 0.2;
    /// Smallest surface extent accepted for generation
    pub const MIN_SURFACE_EXTENT: f32 = 1.0;
    /// Size change (in units) that counts as a new surface
    pub const RESIZE_EPSILON: f32 = 0.5;

    /// Draw phase duration (seconds)
    pub const DRAW_DURATION: f32 = 2.0;
    /// Delay between draw start and erase start (seconds)
    pub const ERASE_HOLD: f32 = 2.0;
    /// Erase phase duration (seconds)
    pub const ERASE_DURATION: f32 = 2.0;
    /// Erase target, slightly past 1.0 so the tail fully clears
    pub const ERASE_TARGET: f32 = 1.1;
    /// Pause between cycles (seconds)
    pub const REPEAT_DELAY: f32 = 1.0;

    /// Half-width of the bright drawing head (normalized length)
    pub const HEAD_SIZE: f32 = 0.03;
    /// Erase progress beyond which the head is no longer drawn
    pub const HEAD_ERASE_CUTOFF: f32 = 0.1;

    /// Largest frame delta fed to the timeline (avoids jumps after tab switches)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Blend an RGB color toward white by `amount` (0 = unchanged, 1 = white)
#[inline]
pub fn blend_to_white(color: [f32; 3], amount: f32) -> [f32; 3] {
    let f = amount.clamp(0.0, 1.0);
    [
        color[0] * (1.0 - f) + f,
        color[1] * (1.0 - f) + f,
        color[2] * (1.0 - f) + f,
    ]
}
