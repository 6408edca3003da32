//! End-to-end pipeline tests: build -> flatten -> stroke/dash -> fill,
//! plus the paint fetchers driven through the analytic engine.

use rasterlab::{
    AnalyticRasterizer, CompOp, Dasher, Extend, FillingRule, Filter, GradientStop, ImagePattern,
    LinearGradient, PathStorage, PointD, PolygonFill, StrokeOptions, Stroker,
};

const WHITE: u32 = 0xFFFFFFFF;
const BLACK: u32 = 0xFF000000;

fn channel(p: u32) -> u32 {
    (p >> 16) & 0xFF
}

#[test]
fn stroked_segment_fills_a_rectangle() {
    // Stroking a horizontal segment with width 2 and butt caps fills the
    // same pixels as drawing the 10x2 rectangle directly.
    let mut path = PathStorage::new();
    path.move_to(4.0, 8.0);
    path.line_to(14.0, 8.0);
    let stroker = Stroker::new(StrokeOptions {
        width: 2.0,
        ..Default::default()
    });
    let outline = stroker.stroke(&path);
    let (verts, counts) = outline.to_polygon();

    let mut stroked = AnalyticRasterizer::new(20, 16).unwrap();
    stroked.clear(BLACK);
    stroked.draw_polygon(&verts, WHITE, FillingRule::NonZero, Some(&counts));

    let mut rect = AnalyticRasterizer::new(20, 16).unwrap();
    rect.clear(BLACK);
    rect.draw_polygon(
        &[4.0, 7.0, 14.0, 7.0, 14.0, 9.0, 4.0, 9.0],
        WHITE,
        FillingRule::NonZero,
        None,
    );

    assert_eq!(stroked.buffer().data(), rect.buffer().data());
}

#[test]
fn stroked_closed_square_is_an_annulus() {
    let mut path = PathStorage::new();
    path.move_to(6.0, 6.0);
    path.line_to(26.0, 6.0);
    path.line_to(26.0, 26.0);
    path.line_to(6.0, 26.0);
    path.close();
    let stroker = Stroker::new(StrokeOptions {
        width: 4.0,
        ..Default::default()
    });
    let (verts, counts) = stroker.stroke(&path).to_polygon();

    let mut r = AnalyticRasterizer::new(32, 32).unwrap();
    r.clear(BLACK);
    r.draw_polygon(&verts, WHITE, FillingRule::NonZero, Some(&counts));

    // On the stroke ring.
    assert_eq!(r.buffer().pixel(16, 6), WHITE);
    assert_eq!(r.buffer().pixel(6, 16), WHITE);
    // The middle of the square is a hole.
    assert_eq!(r.buffer().pixel(16, 16), BLACK);
    // Well outside.
    assert_eq!(r.buffer().pixel(1, 1), BLACK);
}

#[test]
fn dashes_of_a_segment_rasterize_as_three_bars() {
    // Pattern [4,4] on a 20 px segment: dashes at [0,4], [8,12], [16,20].
    let mut path = PathStorage::new();
    path.move_to(4.0, 8.0);
    path.line_to(24.0, 8.0);
    let dashed = Dasher::new(&[4.0, 4.0], 0.0).dash(&path);
    let stroker = Stroker::new(StrokeOptions {
        width: 2.0,
        ..Default::default()
    });
    let (verts, counts) = stroker.stroke(&dashed).to_polygon();

    let mut r = AnalyticRasterizer::new(28, 16).unwrap();
    r.clear(BLACK);
    r.draw_polygon(&verts, WHITE, FillingRule::NonZero, Some(&counts));

    // Dash interiors on the center row.
    for x in [5, 13, 21] {
        assert_eq!(r.buffer().pixel(x, 8), WHITE, "dash at x={}", x);
    }
    // Gap interiors.
    for x in [9, 17] {
        assert_eq!(r.buffer().pixel(x, 8), BLACK, "gap at x={}", x);
    }
}

#[test]
fn flattened_circle_fills_round() {
    // A circle from four cubic arcs, flattened at insert time.
    let mut path = PathStorage::new();
    let (cx, cy, r) = (16.0, 16.0, 12.0);
    let k = 0.5522847498307936 * r;
    path.move_to(cx + r, cy);
    path.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
    path.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
    path.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
    path.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
    path.close();
    let (verts, counts) = path.to_polygon();

    let mut raster = AnalyticRasterizer::new(32, 32).unwrap();
    raster.clear(BLACK);
    raster.draw_polygon(&verts, WHITE, FillingRule::NonZero, Some(&counts));

    assert_eq!(raster.buffer().pixel(16, 16), WHITE);
    assert_eq!(raster.buffer().pixel(16, 5), WHITE);
    assert_eq!(raster.buffer().pixel(2, 2), BLACK);
    // The rim is anti-aliased: some pixel near the boundary is partial.
    let rim = channel(raster.buffer().pixel(16, 4));
    assert!(rim > 0 && rim < 255, "rim {}", rim);
}

#[test]
fn linear_gradient_paint_across_the_frame() {
    let stops = [
        GradientStop::new(0.0, rasterlab::color::Rgba8::new(255, 0, 0, 255)),
        GradientStop::new(1.0, rasterlab::color::Rgba8::new(0, 0, 255, 255)),
    ];
    let mut paint = LinearGradient::new(
        PointD::new(0.0, 0.0),
        PointD::new(32.0, 0.0),
        &stops,
        Extend::Pad,
    );
    let mut r = AnalyticRasterizer::new(32, 8).unwrap();
    r.clear(BLACK);
    r.draw_polygon_fetched(
        &[0.0, 0.0, 32.0, 0.0, 32.0, 8.0, 0.0, 8.0],
        &mut paint,
        FillingRule::NonZero,
        CompOp::SrcOver,
        None,
    );
    let left = r.buffer().pixel(0, 4);
    let right = r.buffer().pixel(31, 4);
    assert!(channel(left) > 240, "left {:08X}", left);
    assert!((right & 0xFF) > 240, "right {:08X}", right);
    // Monotone red falloff.
    let mid = channel(r.buffer().pixel(16, 4));
    assert!(mid < channel(left) && mid > channel(right));
}

#[test]
fn image_pattern_paint_tiles() {
    const R: u32 = 0xFFFF0000;
    const G: u32 = 0xFF00FF00;
    const B: u32 = 0xFF0000FF;
    const W: u32 = 0xFFFFFFFF;
    let mut paint = ImagePattern::new(2, 2, vec![R, G, B, W]).unwrap();
    paint.set_filter(Filter::Nearest);
    paint.set_extend(Extend::Repeat, Extend::Repeat);

    let mut r = AnalyticRasterizer::new(8, 8).unwrap();
    r.clear(BLACK);
    r.draw_polygon_fetched(
        &[0.0, 0.0, 8.0, 0.0, 8.0, 8.0, 0.0, 8.0],
        &mut paint,
        FillingRule::NonZero,
        CompOp::SrcCopy,
        None,
    );
    for y in 0..8 {
        for x in 0..8 {
            let want = match (x % 2, y % 2) {
                (0, 0) => R,
                (1, 0) => G,
                (0, 1) => B,
                _ => W,
            };
            assert_eq!(r.buffer().pixel(x, y), want, "({}, {})", x, y);
        }
    }
}

#[test]
fn painting_order_is_submission_order() {
    let mut r = AnalyticRasterizer::new(8, 8).unwrap();
    r.clear(BLACK);
    r.draw_polygon(
        &[0.0, 0.0, 8.0, 0.0, 8.0, 8.0, 0.0, 8.0],
        0xFFFF0000,
        FillingRule::NonZero,
        None,
    );
    r.draw_polygon(
        &[2.0, 2.0, 6.0, 2.0, 6.0, 6.0, 2.0, 6.0],
        0xFF0000FF,
        FillingRule::NonZero,
        None,
    );
    assert_eq!(r.buffer().pixel(1, 1), 0xFFFF0000);
    assert_eq!(r.buffer().pixel(4, 4), 0xFF0000FF);
}
