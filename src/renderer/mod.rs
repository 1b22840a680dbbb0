//! Line rendering
//!
//! `shade` computes per-point colors from the animation state, `shapes`
//! tessellates them, and `pipeline` uploads the result through WebGPU.

pub mod pipeline;
pub mod shade;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shade::{LineStyle, shade, shade_path};
pub use vertex::Vertex;
