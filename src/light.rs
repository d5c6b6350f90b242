//! Flat shading against a single directional light.

use crate::colors::Color;
use crate::math::vec3::Vec3;

/// Parallel light arriving from one direction, plus a constant ambient term.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Unit vector the light travels along.
    pub direction: Vec3,
    pub ambient_intensity: f32,
    pub diffuse_strength: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::new(-1.0, -1.0, -1.0))
    }
}

impl DirectionalLight {
    /// `direction` is normalized here.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
            ambient_intensity: 0.1,
            diffuse_strength: 1.0,
        }
    }

    /// Lambert term for a unit normal, zero for faces turned away.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        normal.dot(-self.direction).max(0.0)
    }

    /// One color for a whole face. Faces without a normal get ambient only.
    pub fn shade(&self, base: Color, normal: Option<Vec3>) -> Color {
        let diffuse = normal.map_or(0.0, |n| self.intensity(n) * self.diffuse_strength);
        base * (self.ambient_intensity + diffuse).min(1.0)
    }
}
