//! Draws a [`Model`] into a [`PixelBuffer`].
//!
//! Every face is split into a triangle fan anchored at its first corner, each
//! vertex is projected with a fixed orthographic mapping, and each triangle is
//! filled with a pseudo-random color. The random source is reseeded before
//! every full-model draw, so a model always renders with the same colors.
//!
//! # Projection
//!
//! ```text
//! screen.x = width  / 2 + world.x * (height / 5)
//! screen.y = height / 2 + world.y * (height / 5)
//! ```
//!
//! The buffer shows five world units vertically. Z is discarded: there is no
//! perspective divide and no depth test, triangles are painted in face order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::framebuffer::PixelBuffer;
use super::rasterizer::{EdgeFunctionRasterizer, Rasterizer, Triangle};
use crate::colors::Color;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::model::Model;

/// World units visible along the buffer's height.
pub const VIEW_HEIGHT_UNITS: f32 = 5.0;

pub struct ModelRenderer<R: Rasterizer = EdgeFunctionRasterizer> {
    rasterizer: R,
    seed: u64,
}

impl ModelRenderer<EdgeFunctionRasterizer> {
    pub fn new(seed: u64) -> Self {
        Self::with_rasterizer(EdgeFunctionRasterizer::default(), seed)
    }
}

impl<R: Rasterizer> ModelRenderer<R> {
    pub fn with_rasterizer(rasterizer: R, seed: u64) -> Self {
        Self { rasterizer, seed }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    /// Map a world-space position to buffer pixels.
    pub fn project(vertex: Vec3, width: u32, height: u32) -> Vec2 {
        let scale = height as f32 / VIEW_HEIGHT_UNITS;
        let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
        center + Vec2::new(vertex.x, vertex.y) * scale
    }

    /// Projected fan triangles in draw order (faces as parsed, fan order
    /// within each face).
    pub fn screen_triangles(model: &Model, width: u32, height: u32) -> Vec<[Vec2; 3]> {
        let vertices = model.vertices();
        let mut triangles = Vec::with_capacity(model.triangle_count());
        for face in model.faces() {
            for indices in face.fan_vertex_indices() {
                triangles.push(indices.map(|i| Self::project(vertices[i], width, height)));
            }
        }
        triangles
    }

    /// Draw the model with colors from a freshly seeded generator.
    pub fn draw(&self, buffer: &mut PixelBuffer, model: &Model) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.draw_with_rng(buffer, model, &mut rng);
    }

    /// Draw the model, taking one color per triangle from `rng`.
    pub fn draw_with_rng<G: Rng>(
        &self,
        buffer: &mut PixelBuffer,
        model: &Model,
        rng: &mut G,
    ) {
        let (width, height) = (buffer.width(), buffer.height());
        for points in Self::screen_triangles(model, width, height) {
            let triangle = Triangle::new(points, random_color(rng));
            self.rasterizer.fill_triangle(&triangle, buffer);
        }
    }
}

fn random_color<G: Rng>(rng: &mut G) -> Color {
    Color::rgb(rng.gen(), rng.gen(), rng.gen())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::io::Cursor;

    /// Records triangles instead of filling them.
    #[derive(Default)]
    struct Recorder {
        drawn: RefCell<Vec<Triangle>>,
    }

    impl Rasterizer for Recorder {
        fn fill_triangle(&self, triangle: &Triangle, _buffer: &mut PixelBuffer) {
            self.drawn.borrow_mut().push(*triangle);
        }
    }

    const QUAD: &str = "\
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 1.0 1.0 0.0
v -1.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/2 3/3/3 4/4/4
";

    fn quad() -> Model {
        Model::parse(Cursor::new(QUAD), "quad.obj").unwrap()
    }

    fn blank(width: u32, height: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height).unwrap();
        buffer.clear(colors::BLACK);
        buffer
    }

    #[test]
    fn origin_projects_to_buffer_center() {
        let p = ModelRenderer::<EdgeFunctionRasterizer>::project(Vec3::ZERO, 200, 100);
        assert_eq!(p, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn one_unit_is_a_fifth_of_the_height() {
        let p = ModelRenderer::<EdgeFunctionRasterizer>::project(
            Vec3::new(1.0, -2.0, 7.0),
            200,
            100,
        );
        assert_relative_eq!(p.x, 120.0);
        assert_relative_eq!(p.y, 10.0);
    }

    #[test]
    fn quad_is_drawn_as_two_fan_triangles_in_order() {
        let model = quad();
        let renderer = ModelRenderer::with_rasterizer(Recorder::default(), 7);
        let mut buffer = blank(100, 100);
        renderer.draw(&mut buffer, &model);

        let drawn = renderer.rasterizer().drawn.borrow();
        assert_eq!(drawn.len(), 2);

        let v = |i: usize| ModelRenderer::<Recorder>::project(model.vertices()[i], 100, 100);
        assert_eq!(drawn[0].points, [v(0), v(1), v(2)]);
        assert_eq!(drawn[1].points, [v(0), v(2), v(3)]);
    }

    #[test]
    fn colors_follow_seeded_sequence() {
        let model = quad();
        let renderer = ModelRenderer::with_rasterizer(Recorder::default(), 42);
        let mut buffer = blank(10, 10);
        renderer.draw(&mut buffer, &model);

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let expected = [random_color(&mut rng), random_color(&mut rng)];
        let drawn = renderer.rasterizer().drawn.borrow();
        assert_eq!([drawn[0].color, drawn[1].color], expected);
    }

    #[test]
    fn repeated_draws_are_identical() {
        let model = quad();
        let renderer = ModelRenderer::new(1234);
        let mut first = blank(64, 64);
        let mut second = blank(64, 64);
        renderer.draw(&mut first, &model);
        renderer.draw(&mut second, &model);
        renderer.draw(&mut second, &model);
        assert_eq!(first.pixels(), second.pixels());
    }

    #[test]
    fn quad_covers_the_projected_square() {
        let model = quad();
        let mut buffer = blank(100, 100);
        ModelRenderer::new(0).draw(&mut buffer, &model);
        // +-1 unit around the center is +-20 pixels
        assert_ne!(buffer.get_pixel(50, 50), Some(colors::BLACK));
        assert_ne!(buffer.get_pixel(31, 31), Some(colors::BLACK));
        assert_ne!(buffer.get_pixel(69, 69), Some(colors::BLACK));
        assert_eq!(buffer.get_pixel(25, 50), Some(colors::BLACK));
        assert_eq!(buffer.get_pixel(50, 75), Some(colors::BLACK));
    }

    #[test]
    fn empty_model_draws_nothing() {
        let model = Model::default();
        let mut buffer = blank(8, 8);
        ModelRenderer::new(0).draw(&mut buffer, &model);
        assert!(buffer.pixels().iter().all(|&c| c == colors::BLACK));
    }
}
