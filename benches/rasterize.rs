//! Polygon fill throughput across the engine family.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rasterlab::{
    AnalyticRasterizer, CoverageSpanRasterizer, FillingRule, PolygonFill, SupersampleRasterizer,
};

const SIZE: usize = 256;

fn star_vertices() -> Vec<f64> {
    let mut v = Vec::new();
    let (cx, cy) = (SIZE as f64 / 2.0, SIZE as f64 / 2.0);
    let r = SIZE as f64 * 0.45;
    for i in 0..11 {
        let a = -std::f64::consts::FRAC_PI_2 + i as f64 * 4.0 * std::f64::consts::PI / 11.0;
        v.push(cx + r * a.cos());
        v.push(cy + r * a.sin());
    }
    v
}

fn bench_fill(c: &mut Criterion) {
    let star = star_vertices();

    let mut group = c.benchmark_group("polygon_fill");

    group.bench_function("analytic", |b| {
        let mut r = AnalyticRasterizer::new(SIZE, SIZE).unwrap();
        b.iter(|| {
            r.draw_polygon(black_box(&star), 0xFFFFFFFF, FillingRule::NonZero, None);
        });
    });

    group.bench_function("coverage_span", |b| {
        let mut r = CoverageSpanRasterizer::new(SIZE, SIZE).unwrap();
        b.iter(|| {
            r.draw_polygon(black_box(&star), 0xFFFFFFFF, FillingRule::NonZero, None);
        });
    });

    group.bench_function("supersample", |b| {
        let mut r = SupersampleRasterizer::new(SIZE, SIZE).unwrap();
        b.iter(|| {
            r.draw_polygon(black_box(&star), 0xFFFFFFFF, FillingRule::NonZero, None);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_fill);
criterion_main!(benches);
