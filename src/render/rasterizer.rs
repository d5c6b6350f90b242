//! Edge function-based triangle rasterization.
//!
//! For each pixel center in the triangle's bounding box (clipped to the
//! buffer), three edge functions decide coverage:
//!
//! ```text
//! E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
//! ```
//!
//! The vertex order is normalized so that interior points give positive
//! values. A pixel center exactly on an edge is covered only when that edge
//! is a top or left edge, so two triangles sharing an edge never both draw,
//! and never both skip, a pixel on it.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use super::framebuffer::FrameBuffer;
use crate::colors::Color;
use crate::math::vec2::Vec2;
use crate::triangle::Triangle;

/// Computes the edge function value for point P relative to edge (A -> B).
///
/// Positive on the interior side once the triangle has positive area.
#[inline]
fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Edge function evaluated from a canonical endpoint, so two triangles
/// sharing an edge get exactly negated values for every pixel.
#[inline]
fn shared_edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    if (a.y, a.x) <= (b.y, b.x) {
        edge_function(a, b, p)
    } else {
        -edge_function(b, a, p)
    }
}

/// Top-left rule for a positively wound triangle in screen space (Y down).
///
/// A top edge is horizontal with the interior below it; a left edge runs
/// downward with the interior to its right.
#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dy == 0.0 && dx < 0.0) || dy > 0.0
}

#[inline]
fn covers(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

/// Fills a triangle with a single color.
///
/// Returns the number of pixels written. Degenerate (zero-area or
/// non-finite) triangles write nothing.
pub fn fill_triangle(triangle: &Triangle, buffer: &mut FrameBuffer, color: Color) -> usize {
    let [v0, mut v1, mut v2] = triangle.points;

    let mut area = edge_function(v0, v1, v2);
    if area.abs() < f32::EPSILON || !area.is_finite() {
        return 0;
    }
    if area < 0.0 {
        std::mem::swap(&mut v1, &mut v2);
        area = -area;
    }
    debug_assert!(area > 0.0);

    // Bounding box clipped to the buffer. Float-to-int casts saturate.
    let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
    let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(buffer.width() as i32 - 1);
    let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
    let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(buffer.height() as i32 - 1);

    let top_left = [is_top_left(v1, v2), is_top_left(v2, v0), is_top_left(v0, v1)];

    let mut written = 0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            // Sample at pixel center
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

            let w0 = shared_edge_function(v1, v2, p);
            let w1 = shared_edge_function(v2, v0, p);
            let w2 = shared_edge_function(v0, v1, p);

            if covers(w0, top_left[0])
                && covers(w1, top_left[1])
                && covers(w2, top_left[2])
                && buffer.set_pixel(x, y, color)
            {
                written += 1;
            }
        }
    }
    written
}
