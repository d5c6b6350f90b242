use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

// A triangle defined by three indices into the shared vertex array.
// Faces never copy positions, so transforming the vertex array once
// moves every face that references it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    /// Looks up the three referenced positions.
    ///
    /// # Panics
    /// Panics if an index is outside `vertices`. Faces built by
    /// [`Scene::into_geometry`](crate::scene::Scene::into_geometry) are
    /// validated against the vertex count.
    #[inline]
    pub fn resolve(&self, vertices: &[Vec3]) -> [Vec3; 3] {
        [
            vertices[self.a as usize],
            vertices[self.b as usize],
            vertices[self.c as usize],
        ]
    }

    /// Arithmetic mean of the three vertex positions.
    pub fn centroid(&self, vertices: &[Vec3]) -> Vec3 {
        let [a, b, c] = self.resolve(vertices);
        (a + b + c) / 3.0
    }

    /// Unit face normal `(b - a) x (c - a)`, or `None` for a degenerate face
    /// whose normal length is at or below `epsilon`.
    pub fn normal(&self, vertices: &[Vec3], epsilon: f32) -> Option<Vec3> {
        let [a, b, c] = self.resolve(vertices);
        (b - a).cross(c - a).try_normalize(epsilon)
    }
}

// A triangle after projection: three points in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    pub points: [Vec2; 3],
}

impl Triangle {
    pub const fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { points: [a, b, c] }
    }
}
