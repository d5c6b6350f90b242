//! Depth sequencing for the painter's algorithm.
//!
//! There is no depth buffer, so faces are drawn in the order this module
//! leaves them: ascending centroid Z. With the camera looking down -Z the
//! farthest face comes first and nearer faces overwrite it.

use crate::math::vec3::Vec3;
use crate::triangle::Face;

/// Depth key of a face: the Z component of its centroid.
#[inline]
pub fn depth_key(face: &Face, vertices: &[Vec3]) -> f32 {
    face.centroid(vertices).z
}

/// Sorts faces by ascending depth key (farthest first).
///
/// The sort is stable, so faces with equal keys keep their insertion
/// order and repeated calls on unchanged vertices give the same order.
/// NaN keys are placed by [`f32::total_cmp`].
pub fn sort_by_depth(faces: &mut [Face], vertices: &[Vec3]) {
    let mut keyed: Vec<(f32, Face)> = faces
        .iter()
        .map(|face| (depth_key(face, vertices), *face))
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (slot, (_, face)) in faces.iter_mut().zip(keyed) {
        *slot = face;
    }
}
