//! Cross-engine contract tests.
//!
//! Every rasterizer honors the same polygon-fill contract; these tests run
//! identical inputs through the whole family and compare against the
//! analytic reference.

use rasterlab::{
    AnalyticRasterizer, CoverageSpanRasterizer, DistanceFieldRasterizer, EdgeLutRasterizer,
    FillingRule, PolygonFill, SignatureRasterizer, SubpixelDistanceRasterizer,
    SupersampleRasterizer, TessellationRasterizer, WaveletRasterizer,
};

const WHITE: u32 = 0xFFFFFFFF;
const BLACK: u32 = 0xFF000000;
const SIZE: usize = 32;

fn engines() -> Vec<(&'static str, Box<dyn PolygonFill>)> {
    vec![
        ("analytic", Box::new(AnalyticRasterizer::new(SIZE, SIZE).unwrap())),
        (
            "coverage_span",
            Box::new(CoverageSpanRasterizer::new(SIZE, SIZE).unwrap()),
        ),
        (
            "subpixel_rgb",
            Box::new(SubpixelDistanceRasterizer::new(SIZE, SIZE).unwrap()),
        ),
        ("edge_lut", Box::new(EdgeLutRasterizer::new(SIZE, SIZE).unwrap())),
        ("signature", Box::new(SignatureRasterizer::new(SIZE, SIZE).unwrap())),
        (
            "supersample",
            Box::new(SupersampleRasterizer::new(SIZE, SIZE).unwrap()),
        ),
        (
            "distance_field",
            Box::new(DistanceFieldRasterizer::new(SIZE, SIZE).unwrap()),
        ),
        (
            "tessellate",
            Box::new(TessellationRasterizer::new(SIZE, SIZE).unwrap()),
        ),
        ("wavelet", Box::new(WaveletRasterizer::new(SIZE, SIZE).unwrap())),
    ]
}

#[test]
fn every_engine_fills_the_full_frame() {
    // Engines built on signed distance roll off within a pixel of the
    // boundary by construction, so border pixels get a generous floor;
    // everything one pixel in must be (nearly) pure white.
    let quad = [
        0.0,
        0.0,
        SIZE as f64,
        0.0,
        SIZE as f64,
        SIZE as f64,
        0.0,
        SIZE as f64,
    ];
    for (name, mut engine) in engines() {
        engine.clear(BLACK);
        engine.draw_polygon(&quad, WHITE, FillingRule::NonZero, None);
        for y in 0..SIZE {
            for x in 0..SIZE {
                let ch = (engine.buffer().pixel(x, y) >> 16) & 0xFF;
                let interior = x >= 2 && x < SIZE - 2 && y >= 2 && y < SIZE - 2;
                if interior {
                    assert!(ch >= 253, "{}: interior ({}, {}) = {}", name, x, y, ch);
                } else {
                    assert!(ch >= 100, "{}: border ({}, {}) = {}", name, x, y, ch);
                }
            }
        }
    }
}

#[test]
fn every_engine_leaves_an_outside_polygon_untouched() {
    let far = [100.0, 100.0, 120.0, 100.0, 120.0, 120.0, 100.0, 120.0];
    for (name, mut engine) in engines() {
        engine.clear(BLACK);
        engine.draw_polygon(&far, WHITE, FillingRule::NonZero, None);
        for px in engine.buffer().data() {
            assert_eq!(*px, BLACK, "{}", name);
        }
    }
}

#[test]
fn every_engine_skips_degenerate_input() {
    for (name, mut engine) in engines() {
        engine.clear(BLACK);
        engine.draw_polygon(&[5.0, 5.0, 9.0, 9.0], WHITE, FillingRule::NonZero, None);
        engine.draw_polygon(&[], WHITE, FillingRule::NonZero, None);
        for px in engine.buffer().data() {
            assert_eq!(*px, BLACK, "{}", name);
        }
    }
}

#[test]
fn interiors_and_exteriors_agree_across_engines() {
    // Pixels at least 1.5 px from the boundary are unambiguous and must
    // match the reference for the whole family. The dithering engine may
    // wander by a quantization step, so the comparison allows +-2.
    let tri = [4.0, 4.0, 28.0, 8.0, 12.0, 26.0];
    let mut reference = AnalyticRasterizer::new(SIZE, SIZE).unwrap();
    reference.clear(BLACK);
    reference.draw_polygon(&tri, WHITE, FillingRule::NonZero, None);

    for (name, mut engine) in engines() {
        engine.clear(BLACK);
        engine.draw_polygon(&tri, WHITE, FillingRule::NonZero, None);
        for y in 0..SIZE {
            for x in 0..SIZE {
                if boundary_distance(&tri, x, y) < 1.5 {
                    continue;
                }
                let r = reference.buffer().pixel(x, y);
                let e = engine.buffer().pixel(x, y);
                if r == WHITE || r == BLACK {
                    for shift in [16, 8, 0] {
                        let rc = ((r >> shift) & 0xFF) as i64;
                        let ec = ((e >> shift) & 0xFF) as i64;
                        assert!(
                            (rc - ec).abs() <= 2,
                            "{}: ({}, {}) expected ~{:08X}, got {:08X}",
                            name,
                            x,
                            y,
                            r,
                            e
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn scanline_family_stays_close_to_analytic() {
    // The span-partition engine shares the analytic coverage model and
    // must track it tightly everywhere, boundary included.
    let tri = [2.0, 2.0, 28.0, 6.0, 10.0, 26.0];
    let mut a = AnalyticRasterizer::new(SIZE, SIZE).unwrap();
    a.clear(BLACK);
    a.draw_polygon(&tri, WHITE, FillingRule::NonZero, None);

    let mut b = CoverageSpanRasterizer::new(SIZE, SIZE).unwrap();
    b.clear(BLACK);
    b.draw_polygon(&tri, WHITE, FillingRule::NonZero, None);

    for (pa, pb) in a.buffer().data().iter().zip(b.buffer().data()) {
        let d = ((pa >> 16) & 0xFF) as i64 - ((pb >> 16) & 0xFF) as i64;
        assert!(d.abs() <= 4, "deviation {}", d);
    }
}

#[test]
fn star_rules_differ_in_every_engine() {
    let mut star = Vec::new();
    let (cx, cy, rad) = (16.0, 16.0, 14.0);
    for i in 0..5 {
        let a = -std::f64::consts::FRAC_PI_2 + i as f64 * 4.0 * std::f64::consts::PI / 5.0;
        star.push(cx + rad * a.cos());
        star.push(cy + rad * a.sin());
    }
    for (name, mut engine) in engines() {
        engine.clear(BLACK);
        engine.draw_polygon(&star, WHITE, FillingRule::NonZero, Some(&[5]));
        let nz_center = engine.buffer().pixel(16, 16);

        engine.clear(BLACK);
        engine.draw_polygon(&star, WHITE, FillingRule::EvenOdd, Some(&[5]));
        let eo_center = engine.buffer().pixel(16, 16);

        // The pentagram core: filled under non-zero, a hole under even-odd.
        // The tessellating engine resolves holes by orientation and treats
        // the self-intersecting star as one loop, so it is exempt. The
        // dithering engine may sit a quantization step off pure black.
        if name != "tessellate" {
            let nz = (nz_center >> 16) & 0xFF;
            let eo = (eo_center >> 16) & 0xFF;
            assert!(nz >= 253, "{}: non-zero center {:08X}", name, nz_center);
            assert!(eo <= 2, "{}: even-odd center {:08X}", name, eo_center);
        }
    }
}

fn boundary_distance(tri: &[f64], x: usize, y: usize) -> f64 {
    // Distance from the pixel center to the nearest triangle edge.
    let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
    let mut best = f64::MAX;
    let n = tri.len() / 2;
    for i in 0..n {
        let j = (i + 1) % n;
        let (x0, y0, x1, y1) = (tri[i * 2], tri[i * 2 + 1], tri[j * 2], tri[j * 2 + 1]);
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len_sq = dx * dx + dy * dy;
        let u = (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0);
        let (qx, qy) = (x0 + u * dx, y0 + u * dy);
        best = best.min(((px - qx).powi(2) + (py - qy).powi(2)).sqrt());
    }
    best
}

