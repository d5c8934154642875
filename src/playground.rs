//! Interactive triangle playground.
//!
//! Two vertices are pinned with keys, the third follows the cursor. The
//! pinned points and the cursor are marked with single pixels on top of the
//! triangle.

use crate::colors;
use crate::math::vec2::Vec2;
use crate::render::{PixelBuffer, Rasterizer, Triangle};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Playground {
    a: Option<Vec2>,
    b: Option<Vec2>,
}

impl Playground {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn a(&self) -> Option<Vec2> {
        self.a
    }

    pub fn b(&self) -> Option<Vec2> {
        self.b
    }

    pub fn pin_a(&mut self, at: Vec2) {
        self.a = Some(at);
    }

    pub fn pin_b(&mut self, at: Vec2) {
        self.b = Some(at);
    }

    /// Draw the triangle (when both vertices are pinned and the cursor is
    /// known) and the markers.
    pub fn draw<R: Rasterizer>(&self, buffer: &mut PixelBuffer, rasterizer: &R, cursor: Option<Vec2>) {
        if let (Some(a), Some(b), Some(c)) = (self.a, self.b, cursor) {
            rasterizer.fill_triangle(&Triangle::new([a, b, c], colors::PLAYGROUND), buffer);
        }
        for point in [self.a, self.b, cursor].into_iter().flatten() {
            mark(buffer, point);
        }
    }
}

/// Single-pixel marker, truncating to the containing pixel.
fn mark(buffer: &mut PixelBuffer, point: Vec2) {
    if point.is_finite() && point.x >= 0.0 && point.y >= 0.0 {
        buffer.set_pixel(point.x as u32, point.y as u32, colors::MARKER);
    }
}
