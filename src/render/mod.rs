//! Raster surface: pixel storage, triangle filling, and 2D primitives.

pub mod framebuffer;
pub mod rasterizer;
pub mod surface;

pub use framebuffer::FrameBuffer;
pub use surface::{Surface, ToneMap};
