//! A CPU-only triangle rasterizer driven by JSON scene descriptions.
//!
//! Scenes are loaded into a shared vertex arena, transformed once, sorted
//! back to front, projected, and painted onto a floating-point surface with
//! no depth buffer. SDL2 is used only to show the packed frames.
//!
//! # Quick Start
//!
//! ```ignore
//! use liraster::prelude::*;
//!
//! let settings = Settings::default();
//! let mut engine = Engine::new(settings)?;
//! engine.load_scene(Scene::load("scene.json")?);
//! engine.prepare(Transform::new().set_translation_xyz(0.0, 0.0, -3.0));
//! let pixels = engine.render_frame();
//! ```

// Public API - exposed to library consumers
pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod light;
pub mod logging;
pub mod math;
pub mod projection;
pub mod render;
pub mod scene;
pub mod sorting;
pub mod time;
pub mod transform;
pub mod triangle;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use config::Settings;
pub use engine::{Engine, RenderMode, RunOptions, RunSummary, ShadingMode};
pub use error::{ConfigError, LoadError, RenderError};
pub use geometry::GeometryStore;
pub use projection::{Projection, Projector};
pub use scene::Scene;
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use liraster::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::config::Settings;
    pub use crate::engine::{Engine, RenderMode, RunOptions, ShadingMode};

    // Scene
    pub use crate::geometry::GeometryStore;
    pub use crate::scene::Scene;

    // Pipeline stages
    pub use crate::projection::Projection;
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::colors::Color;
    pub use crate::render::{Surface, ToneMap};

    // Window
    pub use crate::window::{Presenter, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::rasterizer::fill_triangle;
    pub use crate::render::FrameBuffer;
    pub use crate::triangle::Triangle;
}
