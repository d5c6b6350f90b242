//! Perspective projection and viewport mapping.
//!
//! [`Projection`] holds the camera parameters (FOV, aspect ratio, near/far
//! planes) and builds the matrix. [`Projector`] owns the per-frame buffer of
//! screen-space triangles, one per face and in the same order.
//!
//! No frustum or screen clipping happens here. Triangles behind the camera
//! or off screen pass through unchanged and the rasterizer clips per pixel.

use crate::geometry::GeometryStore;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::triangle::Triangle;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    /// Near clipping plane distance.
    z_near: f32,
    /// Far clipping plane distance.
    z_far: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance (must be > 0)
    /// * `z_far` - Far clipping plane distance (must be > z_near)
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a projection from degrees instead of radians.
    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    /// Generates the right-handed perspective projection matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }

    /// Aspect ratio (width / height); test-only accessor.
    #[cfg(test)]
    pub(crate) fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}

/// Projects camera-space points to pixel coordinates.
#[derive(Debug, Clone)]
pub struct Projector {
    matrix: Mat4,
    width: f32,
    height: f32,
    triangles: Vec<Triangle>,
}

impl Projector {
    pub fn new(projection: &Projection, width: u32, height: u32) -> Self {
        Self {
            matrix: projection.matrix(),
            width: width as f32,
            height: height as f32,
            triangles: Vec::new(),
        }
    }

    /// Maps a camera-space point to screen space.
    ///
    /// `x` and `y` are divided by the clip-space `w` unless it is exactly
    /// zero, in which case the undivided values are used. The result for
    /// such points is meaningless but finite. NDC is then mapped with
    /// `sx = W(1 + x)/2` and `sy = H(1 - y)/2`; rows grow downward.
    #[inline]
    pub fn project_point(&self, v: Vec3) -> Vec2 {
        let clip = self.matrix * Vec4::point(v);

        let (ndc_x, ndc_y) = if clip.w != 0.0 {
            (clip.x / clip.w, clip.y / clip.w)
        } else {
            (clip.x, clip.y)
        };

        Vec2::new(
            self.width * (1.0 + ndc_x) / 2.0,
            self.height * (1.0 - ndc_y) / 2.0,
        )
    }

    /// Rebuilds the screen-space triangle buffer from the store's faces,
    /// preserving their order.
    pub fn project(&mut self, geometry: &GeometryStore) -> &[Triangle] {
        let vertices = geometry.vertices();

        self.triangles.clear();
        self.triangles.reserve(geometry.triangle_count());
        for face in geometry.faces() {
            let [a, b, c] = face.resolve(vertices);
            self.triangles.push(Triangle::new(
                self.project_point(a),
                self.project_point(b),
                self.project_point(c),
            ));
        }

        &self.triangles
    }

    /// The triangles produced by the last [`Projector::project`] call.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle::Face;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn projector(width: u32, height: u32) -> Projector {
        let projection = Projection::from_degrees(90.0, width as f32 / height as f32, 0.1, 100.0);
        Projector::new(&projection, width, height)
    }

    #[test]
    fn from_degrees_converts_correctly() {
        let degrees = Projection::from_degrees(45.0, 1.0, 0.1, 100.0).matrix();
        let radians = Projection::new(FRAC_PI_4, 1.0, 0.1, 100.0).matrix();
        let p = Vec4::new(1.0, 2.0, -3.0, 1.0);
        let (a, b) = (degrees * p, radians * p);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn forward_axis_projects_to_center_pixel() {
        let p = projector(640, 480);
        for z in [-0.5, -5.0, -99.0] {
            let s = p.project_point(Vec3::new(0.0, 0.0, z));
            assert!((s.x - 320.0).abs() <= 0.5);
            assert!((s.y - 240.0).abs() <= 0.5);
        }
    }

    #[test]
    fn fov_edge_maps_to_screen_edge() {
        // 90 degree FOV: y == -z sits on the top edge of the view.
        let p = projector(100, 100);
        let s = p.project_point(Vec3::new(5.0, 5.0, -5.0));
        assert_relative_eq!(s.x, 100.0, epsilon = 1e-4);
        assert_relative_eq!(s.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn zero_w_skips_divide() {
        let p = projector(100, 100);
        let s = p.project_point(Vec3::new(0.5, 0.25, 0.0));
        // Undivided clip x/y are 0.5 and 0.25.
        assert_relative_eq!(s.x, 75.0, epsilon = 1e-4);
        assert_relative_eq!(s.y, 37.5, epsilon = 1e-4);
    }

    #[test]
    fn screen_y_decreases_as_source_y_increases() {
        let vertices = vec![
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(1.0, 0.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
        ];
        let store = GeometryStore::new(vertices, vec![Face::new(0, 1, 2)]).unwrap();
        let mut p = projector(200, 200);
        let triangles = p.project(&store);
        assert_eq!(triangles.len(), 1);

        let [a, b, c] = triangles[0].points;
        assert_relative_eq!(a.x, 100.0);
        assert_relative_eq!(a.y, 100.0);
        assert_relative_eq!(b.x, 120.0, epsilon = 1e-4);
        assert_relative_eq!(b.y, a.y);
        assert!(c.y < a.y);
        assert_relative_eq!(c.y, 80.0, epsilon = 1e-4);
    }
}
