//! Triangle rasterization.
//!
//! A single algorithm is provided, [`EdgeFunctionRasterizer`], with two
//! inclusion rules for pixels that lie exactly on an edge:
//!
//! - [`FillRule::Inclusive`]: every pixel on the boundary is filled. Two
//!   triangles sharing an edge both draw the pixels on it.
//! - [`FillRule::TopLeft`]: a boundary pixel is filled only when the edge is a
//!   top or left edge. Adjacent triangles fill each seam pixel exactly once.
//!
//! Both rules accept clockwise and counter-clockwise input.

mod edgefunction;

pub use edgefunction::EdgeFunctionRasterizer;

use super::framebuffer::PixelBuffer;
use crate::colors::Color;
use crate::math::vec2::Vec2;

/// A triangle ready for rasterization in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec2; 3],
    pub color: Color,
}

impl Triangle {
    pub fn new(points: [Vec2; 3], color: Color) -> Self {
        Self { points, color }
    }
}

/// Trait for triangle rasterization algorithms.
///
/// Implementors define how triangles are filled into a pixel buffer.
pub trait Rasterizer {
    /// Fill a triangle into the pixel buffer, clipped to its bounds.
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut PixelBuffer);
}

/// How pixels lying exactly on a triangle edge are treated.
///
/// Can be changed at runtime via [`EdgeFunctionRasterizer::set_fill_rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Pixels inside or exactly on any edge are filled.
    #[default]
    Inclusive,
    /// Pixels on an edge are filled only for top and left edges.
    TopLeft,
}

impl FillRule {
    /// The other rule.
    pub fn toggled(self) -> Self {
        match self {
            FillRule::Inclusive => FillRule::TopLeft,
            FillRule::TopLeft => FillRule::Inclusive,
        }
    }
}

impl std::fmt::Display for FillRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillRule::Inclusive => write!(f, "Inclusive"),
            FillRule::TopLeft => write!(f, "TopLeft"),
        }
    }
}
