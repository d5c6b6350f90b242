//! Floating-point colors and the packed format handed to the presenter.
//!
//! Colors are stored as linear RGBA `f32` so shading and tone mapping can
//! work above 1.0. Packing quantizes to ARGB8888 (`0xAARRGGBB`), the
//! streaming texture format used by the window.

use std::ops::Mul;

use crate::math::vec3::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

// Engine defaults
pub const BACKGROUND: Color = BLACK;
pub const FILL: Color = BLUE;
pub const WIREFRAME: Color = WHITE;
pub const VERTEX: Color = WHITE;
pub const AXIS_X: Color = RED;
pub const AXIS_Y: Color = GREEN;

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from three components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Maps a unit direction onto a color, `[-1, 1]` to `[0, 1]` per axis.
    pub fn from_direction(direction: Vec3) -> Self {
        Self::rgb(
            (direction.x + 1.0) * 0.5,
            (direction.y + 1.0) * 0.5,
            (direction.z + 1.0) * 0.5,
        )
    }

    /// Applies `f` to the three color channels, leaving alpha alone.
    pub fn map_rgb(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    /// Packs into `0xAARRGGBB`, clamping every channel to `[0, 1]` first.
    #[inline]
    pub fn to_argb8888(self) -> u32 {
        (quantize(self.a) << 24)
            | (quantize(self.r) << 16)
            | (quantize(self.g) << 8)
            | quantize(self.b)
    }
}

/// NaN quantizes to 0.
#[inline]
fn quantize(channel: f32) -> u32 {
    if channel.is_nan() {
        return 0;
    }
    (channel.clamp(0.0, 1.0) * 255.0).round() as u32
}

/// Scales the color channels; alpha is kept.
impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Self::Output {
        self.map_rgb(|c| c * rhs)
    }
}
