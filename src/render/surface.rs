//! Low-level rendering primitives.
//!
//! Provides the [`Surface`] struct which owns the color buffer and implements
//! the drawing operations the frame loop needs: triangle fills, thick lines,
//! circles, tone mapping, packing for presentation, and PNG export.

use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};

use super::framebuffer::FrameBuffer;
use super::rasterizer;
use crate::colors::{self, Color};
use crate::error::RenderError;
use crate::math::vec2::Vec2;
use crate::triangle::Triangle;

/// Operator applied to every pixel before the surface is packed or exported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ToneMap {
    /// Clamp each channel to [0, 1].
    #[default]
    Clamp,
    /// Reinhard `c / (1 + c)` on the color channels.
    Reinhard,
}

impl ToneMap {
    #[inline]
    pub fn apply(self, color: Color) -> Color {
        match self {
            ToneMap::Clamp => color.map_rgb(|c| c.clamp(0.0, 1.0)),
            ToneMap::Reinhard => color.map_rgb(|c| {
                let c = c.max(0.0);
                c / (1.0 + c)
            }),
        }
    }
}

pub struct Surface {
    color_buffer: Vec<Color>,
    width: u32,
    height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            color_buffer: vec![colors::BACKGROUND; size],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels, top row first.
    pub fn pixels(&self) -> &[Color] {
        &self.color_buffer
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.color_buffer[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.color_buffer.fill(color);
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let index = y as usize * self.width as usize + x as usize;
            self.color_buffer[index] = color;
        }
    }

    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(&mut self.color_buffer, self.width, self.height)
    }

    /// Fills a triangle using the top-left rule. Returns the pixels written.
    pub fn fill_triangle(&mut self, triangle: &Triangle, color: Color) -> usize {
        let mut fb = self.as_framebuffer();
        rasterizer::fill_triangle(triangle, &mut fb, color)
    }

    /// Outlines a triangle with three lines of the given thickness.
    pub fn draw_triangle(&mut self, triangle: &Triangle, color: Color, thickness: u32) {
        let [p0, p1, p2] = triangle.points;
        self.draw_line(p0, p1, color, thickness);
        self.draw_line(p1, p2, color, thickness);
        self.draw_line(p2, p0, color, thickness);
    }

    /// Draws a line between two points using Bresenham's line algorithm.
    ///
    /// The segment is first clipped to the surface (grown by the stroke
    /// thickness) so far-off endpoints cost nothing. Every visited pixel is
    /// stamped with a `thickness` x `thickness` square.
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, thickness: u32) {
        if thickness == 0 || self.width == 0 || self.height == 0 {
            return;
        }
        let margin = thickness as f32;
        let bounds = ClipRect {
            min_x: -margin,
            min_y: -margin,
            max_x: (self.width - 1) as f32 + margin,
            max_y: (self.height - 1) as f32 + margin,
        };
        let Some((from, to)) = bounds.clip(from, to) else {
            return;
        };

        let (x0, y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);

        // Absolute distances in each axis.
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();

        // +1 if moving in the positive direction, -1 if negative.
        let x_incr_direction = if x0 < x1 { 1 } else { -1 };
        let y_incr_direction = if y0 < y1 { 1 } else { -1 };

        // Error term: positive favors x movement, negative favors y.
        let mut err = dx - dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.stamp(x, y, color, thickness);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }

    #[inline]
    fn stamp(&mut self, x: i32, y: i32, color: Color, thickness: u32) {
        if thickness == 1 {
            self.set_pixel(x, y, color);
            return;
        }
        let lo = -((thickness as i32 - 1) / 2);
        let hi = lo + thickness as i32;
        for oy in lo..hi {
            for ox in lo..hi {
                self.set_pixel(x + ox, y + oy, color);
            }
        }
    }

    /// Fills every pixel whose center lies within `radius` of `center`.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        let min_x = ((center.x - radius).floor() as i32).max(0);
        let max_x = ((center.x + radius).ceil() as i32).min(self.width as i32 - 1);
        let min_y = ((center.y - radius).floor() as i32).max(0);
        let max_y = ((center.y + radius).ceil() as i32).min(self.height as i32 - 1);

        let r2 = radius * radius;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Outlines a circle with the midpoint circle algorithm.
    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        let (w, h) = (self.width as f32, self.height as f32);
        if center.x + radius < 0.0
            || center.y + radius < 0.0
            || center.x - radius > w
            || center.y - radius > h
        {
            return;
        }
        if radius > w + h {
            self.draw_large_circle(center, radius, color);
            return;
        }

        // Both the center and the radius are now within a few surface sizes.
        let r = radius.round() as i32;
        let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);

        let mut x = r;
        let mut y = 0;
        let mut err = 1 - r;
        while x >= y {
            for (px, py) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.set_pixel(cx + px, cy + py, color);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Outline of a circle much larger than the surface: tests every pixel
    /// against the ring instead of walking the whole circumference.
    fn draw_large_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let (cx, cy) = (center.x.round() as f64, center.y.round() as f64);
        let r = radius.round() as f64;
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let d = (x as f64 - cx).hypot(y as f64 - cy);
                if (d - r).abs() <= 0.5 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Applies the tone-mapping operator to every pixel in place.
    pub fn tonemap(&mut self, operator: ToneMap) {
        for pixel in &mut self.color_buffer {
            *pixel = operator.apply(*pixel);
        }
    }

    /// Packs every pixel into ARGB8888, row-major, top row first.
    pub fn pack_into(&self, out: &mut [u32]) {
        debug_assert_eq!(out.len(), self.color_buffer.len());
        for (dst, src) in out.iter_mut().zip(&self.color_buffer) {
            *dst = src.to_argb8888();
        }
    }

    /// Writes the surface to an image file, creating parent directories.
    ///
    /// The format follows the path's extension (PNG for `.png`).
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let image = RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [a, r, g, b] = self.color_buffer[(y * self.width + x) as usize]
                .to_argb8888()
                .to_be_bytes();
            Rgba([r, g, b, a])
        });
        image.save(path)?;
        Ok(())
    }
}

/// Axis-aligned rectangle for Cohen-Sutherland line clipping.
struct ClipRect {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl ClipRect {
    const INSIDE: u8 = 0;
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const BOTTOM: u8 = 4;
    const TOP: u8 = 8;

    fn outcode(&self, p: Vec2) -> u8 {
        let mut code = Self::INSIDE;
        if p.x < self.min_x {
            code |= Self::LEFT;
        } else if p.x > self.max_x {
            code |= Self::RIGHT;
        }
        if p.y < self.min_y {
            code |= Self::TOP;
        } else if p.y > self.max_y {
            code |= Self::BOTTOM;
        }
        code
    }

    /// Returns the part of the segment inside the rectangle, if any.
    fn clip(&self, mut a: Vec2, mut b: Vec2) -> Option<(Vec2, Vec2)> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        let mut code_a = self.outcode(a);
        let mut code_b = self.outcode(b);

        loop {
            if code_a | code_b == Self::INSIDE {
                return Some((a, b));
            }
            if code_a & code_b != Self::INSIDE {
                return None;
            }

            let out = if code_a != Self::INSIDE { code_a } else { code_b };
            let d = b - a;
            let p = if out & Self::TOP != 0 {
                Vec2::new(a.x + d.x * (self.min_y - a.y) / d.y, self.min_y)
            } else if out & Self::BOTTOM != 0 {
                Vec2::new(a.x + d.x * (self.max_y - a.y) / d.y, self.max_y)
            } else if out & Self::RIGHT != 0 {
                Vec2::new(self.max_x, a.y + d.y * (self.max_x - a.x) / d.x)
            } else {
                Vec2::new(self.min_x, a.y + d.y * (self.min_x - a.x) / d.x)
            };

            if out == code_a {
                a = p;
                code_a = self.outcode(a);
            } else {
                b = p;
                code_b = self.outcode(b);
            }
        }
    }
}
