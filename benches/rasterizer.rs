use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tinyrast::colors;
use tinyrast::math::vec2::Vec2;
use tinyrast::{EdgeFunctionRasterizer, FillRule, Model, ModelRenderer, PixelBuffer, Rasterizer, Triangle};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn create_buffer() -> PixelBuffer {
    PixelBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT).expect("bench buffer")
}

fn triangle(points: [(f32, f32); 3]) -> Triangle {
    Triangle::new(points.map(|(x, y)| Vec2::new(x, y)), colors::RED)
}

fn small_triangle() -> Triangle {
    triangle([(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)])
}

fn medium_triangle() -> Triangle {
    triangle([(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)])
}

fn large_triangle() -> Triangle {
    triangle([(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)])
}

fn rasterizers() -> [(&'static str, EdgeFunctionRasterizer); 2] {
    [
        ("inclusive", EdgeFunctionRasterizer::new(FillRule::Inclusive)),
        ("top_left", EdgeFunctionRasterizer::new(FillRule::TopLeft)),
    ]
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    for (name, tri) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        for (rule, rasterizer) in rasterizers() {
            group.bench_with_input(BenchmarkId::new(rule, name), &tri, |b, tri| {
                let mut buffer = create_buffer();
                b.iter(|| rasterizer.fill_triangle(black_box(tri), &mut buffer));
            });
        }
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");

    // 20x20 grid of small triangles
    let triangles: Vec<Triangle> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 40.0;
                let y = row as f32 * 30.0;
                triangle([(x, y), (x + 35.0, y), (x + 17.5, y + 25.0)])
            })
        })
        .collect();

    for (rule, rasterizer) in rasterizers() {
        group.bench_function(format!("{rule}_400_triangles"), |b| {
            let mut buffer = create_buffer();
            b.iter(|| {
                for tri in &triangles {
                    rasterizer.fill_triangle(black_box(tri), &mut buffer);
                }
            });
        });
    }

    group.finish();
}

fn benchmark_model(c: &mut Criterion) {
    let model = Model::parse(Cursor::new(include_str!("../assets/cube.obj")), "cube.obj")
        .expect("bundled cube parses");
    let renderer = ModelRenderer::new(0);

    c.bench_function("cube_frame", |b| {
        let mut buffer = create_buffer();
        b.iter(|| {
            buffer.clear(colors::BACKGROUND);
            renderer.draw(&mut buffer, black_box(&model));
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_triangle,
    benchmark_many_triangles,
    benchmark_model
);
criterion_main!(benches);
