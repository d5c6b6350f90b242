//! 4x4 transformation matrix using column-vector convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Storage is `data[row][col]`
//! - Projection follows the OpenGL clip-space layout (`-w <= z <= w`)

use std::ops::Mul;

use super::vec4::Vec4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    /// Creates a right-handed perspective matrix for a camera at the origin
    /// looking down -Z.
    ///
    /// The resulting clip-space `w` equals the distance in front of the
    /// camera (`-z`), so points behind the camera get a negative `w` and
    /// points in the camera plane get `w == 0`.
    ///
    /// # Arguments
    ///
    /// * `fov_y` - Vertical field of view in radians.
    /// * `aspect_ratio` - Width divided by height.
    /// * `near`, `far` - Clip plane distances, `0 < near < far`.
    pub fn perspective_rh(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let a = (far + near) / (near - far);
        let b = 2.0 * far * near / (near - far);
        Mat4::new([
            [f / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, a, b],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let row = |r: usize| {
            self.data[r][0] * v.x
                + self.data[r][1] * v.y
                + self.data[r][2] * v.z
                + self.data[r][3] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}
