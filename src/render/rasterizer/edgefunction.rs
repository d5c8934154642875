//! Edge function-based triangle rasterization.
//!
//! # Algorithm Overview
//!
//! 1. Round every vertex to the nearest integer (half away from zero)
//! 2. Compute the bounding box of the rounded vertices, clamped to the buffer
//! 3. For each integer pixel center in the box, evaluate the three edge
//!    functions and fill the pixel if it is inside (or on the boundary, as
//!    decided by the [`FillRule`])
//!
//! # Edge Function
//!
//! For an edge from point A to point B, the edge function at point P is:
//!
//! ```text
//! E(P) = (B.x - A.x) * (P.y - A.y) - (B.y - A.y) * (P.x - A.x)
//! ```
//!
//! It is linear in P, so it can be written `E(P) = A_e * P.x + B_e * P.y + C_e`
//! and stepped across the box by adding `A_e` per column and `B_e` per row.
//! Since the rounded vertices and the pixel centers are all integers, the
//! evaluation is exact in `i64` arithmetic. There is no epsilon: a point is
//! either on the edge (`E == 0`) or it is not.
//!
//! # Winding Order
//!
//! `E_ab(c)` is twice the signed area of the triangle. When it is negative the
//! triangle is wound the other way, and swapping `b` and `c` flips all three
//! edge functions so that interior points are positive for both windings.
//! A zero area means a degenerate triangle, which fills nothing.
//!
//! # Top-Left Rule
//!
//! After the winding is normalized, the gradient `(A_e, B_e)` of each edge
//! function points into the triangle. An edge is a *left* edge when that
//! gradient points towards +X, and a *top* edge when it is horizontal and
//! points towards +Y (screen Y grows downwards). Two triangles sharing an edge
//! see opposite gradients on it, so exactly one of them owns the seam.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)

use super::{FillRule, Rasterizer, Triangle};
use crate::colors::Color;
use crate::math::vec2::Vec2;
use crate::render::framebuffer::PixelBuffer;

/// Rounded vertex coordinates are clamped to this magnitude so that edge
/// function products stay well inside `i64`.
const COORD_LIMIT: i64 = 1 << 28;

/// An integer screen-space point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Point {
    x: i64,
    y: i64,
}

/// Edge function coefficients `E(x, y) = a * x + b * y + c` plus the minimum
/// value a pixel needs to count as inside this edge.
#[derive(Clone, Copy, Debug)]
struct Edge {
    a: i64,
    b: i64,
    c: i64,
    threshold: i64,
}

impl Edge {
    fn new(from: Point, to: Point, rule: FillRule) -> Self {
        let a = from.y - to.y;
        let b = to.x - from.x;
        let c = -(a * from.x + b * from.y);

        let owns_boundary = match rule {
            FillRule::Inclusive => true,
            FillRule::TopLeft => a > 0 || (a == 0 && b > 0),
        };

        Self {
            a,
            b,
            c,
            threshold: if owns_boundary { 0 } else { 1 },
        }
    }

    #[inline]
    fn eval(&self, x: i64, y: i64) -> i64 {
        self.a * x + self.b * y + self.c
    }
}

/// Triangle rasterizer using the edge function algorithm.
///
/// Iterates over every pixel of the triangle's clamped bounding box and keeps
/// the ones whose center passes all three edge tests. Later draws overwrite
/// earlier ones; there is no depth test.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeFunctionRasterizer {
    rule: FillRule,
}

impl EdgeFunctionRasterizer {
    pub fn new(rule: FillRule) -> Self {
        Self { rule }
    }

    pub fn fill_rule(&self) -> FillRule {
        self.rule
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.rule = rule;
    }

    /// Twice the signed area of triangle `abc`, i.e. `E_ab(c)`.
    #[inline]
    fn edge_function(a: Point, b: Point, p: Point) -> i64 {
        (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
    }

    /// Round a vertex to the integer pixel grid, or None for NaN/infinity.
    fn snap(v: Vec2) -> Option<Point> {
        if !v.is_finite() {
            return None;
        }
        let v = v.round();
        Some(Point {
            x: (v.x as i64).clamp(-COORD_LIMIT, COORD_LIMIT),
            y: (v.y as i64).clamp(-COORD_LIMIT, COORD_LIMIT),
        })
    }

    fn rasterize(&self, points: [Point; 3], buffer: &mut PixelBuffer, color: Color) {
        let [v0, mut v1, mut v2] = points;

        // ─────────────────────────────────────────────────────────────────────
        // Step 1: Normalize winding so interior points are positive
        // ─────────────────────────────────────────────────────────────────────
        let area = Self::edge_function(v0, v1, v2);
        if area == 0 {
            return; // Degenerate triangle
        }
        if area < 0 {
            std::mem::swap(&mut v1, &mut v2);
        }

        // ─────────────────────────────────────────────────────────────────────
        // Step 2: Bounding box clamped to the buffer
        // ─────────────────────────────────────────────────────────────────────
        let min_x = v0.x.min(v1.x).min(v2.x).max(0);
        let max_x = v0.x.max(v1.x).max(v2.x).min(buffer.width() as i64 - 1);
        let min_y = v0.y.min(v1.y).min(v2.y).max(0);
        let max_y = v0.y.max(v1.y).max(v2.y).min(buffer.height() as i64 - 1);
        if min_x > max_x || min_y > max_y {
            return; // Entirely off-screen
        }

        // ─────────────────────────────────────────────────────────────────────
        // Step 3: Walk the box, stepping the edge functions incrementally
        // ─────────────────────────────────────────────────────────────────────
        let e0 = Edge::new(v1, v2, self.rule);
        let e1 = Edge::new(v2, v0, self.rule);
        let e2 = Edge::new(v0, v1, self.rule);

        let mut row0 = e0.eval(min_x, min_y);
        let mut row1 = e1.eval(min_x, min_y);
        let mut row2 = e2.eval(min_x, min_y);

        for y in min_y..=max_y {
            let (mut w0, mut w1, mut w2) = (row0, row1, row2);

            for x in min_x..=max_x {
                if w0 >= e0.threshold && w1 >= e1.threshold && w2 >= e2.threshold {
                    // The box is clamped to the buffer, so x and y are in range.
                    buffer.set_pixel_unchecked(x as u32, y as u32, color);
                }
                w0 += e0.a;
                w1 += e1.a;
                w2 += e2.a;
            }

            row0 += e0.b;
            row1 += e1.b;
            row2 += e2.b;
        }
    }
}

impl Rasterizer for EdgeFunctionRasterizer {
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut PixelBuffer) {
        let [a, b, c] = triangle.points;
        if let (Some(a), Some(b), Some(c)) = (Self::snap(a), Self::snap(b), Self::snap(c)) {
            self.rasterize([a, b, c], buffer, triangle.color);
        }
    }
}
