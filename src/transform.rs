//! Rigid-body transform applied to the shared vertex array.
//!
//! Provides a [`Transform`] with a fluent API for rotation (Euler angles,
//! applied about X, then Y, then Z) followed by a translation.

use crate::math::vec3::Vec3;

/// Rotations about the origin followed by a translation.
///
/// ```ignore
/// let mut transform = Transform::new();
/// transform
///     .set_rotation_degrees(0.0, 10.0, 0.0)
///     .set_translation_xyz(0.0, 0.0, -3.0);
/// transform.apply(&mut vertices);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    rotation: Vec3, // Euler angles in radians
    translation: Vec3,
}

impl Transform {
    /// Create the identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Rotation ============

    /// Get the rotation (Euler angles in radians).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Set the rotation (Euler angles in radians).
    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    /// Set the rotation from angles in degrees.
    pub fn set_rotation_degrees(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotation = Vec3::new(x.to_radians(), y.to_radians(), z.to_radians());
        self
    }

    // ============ Translation ============

    /// Get the translation.
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Set the translation.
    pub fn set_translation(&mut self, translation: Vec3) -> &mut Self {
        self.translation = translation;
        self
    }

    /// Set the translation from x, y, z components.
    pub fn set_translation_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.translation = Vec3::new(x, y, z);
        self
    }

    /// Translate by a delta vector.
    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.translation = self.translation + delta;
        self
    }

    // ============ Application ============

    /// Transforms a single point.
    ///
    /// Zero angles and a zero translation are skipped, so the identity
    /// transform returns the input bit for bit.
    #[inline]
    pub fn transform_point(&self, mut v: Vec3) -> Vec3 {
        if self.rotation.x != 0.0 {
            v = v.rotate_x(self.rotation.x);
        }
        if self.rotation.y != 0.0 {
            v = v.rotate_y(self.rotation.y);
        }
        if self.rotation.z != 0.0 {
            v = v.rotate_z(self.rotation.z);
        }
        if self.translation != Vec3::ZERO {
            v = v + self.translation;
        }
        v
    }

    /// Transforms every vertex in place in a single pass.
    pub fn apply(&self, vertices: &mut [Vec3]) {
        for v in vertices.iter_mut() {
            *v = self.transform_point(*v);
        }
    }
}
