//! Shared polygon-fill contract and polygon primitives.
//!
//! Every rasterization engine in the workbench honors the same contract:
//! a flat `[x0,y0, x1,y1, ...]` vertex array in device coordinates, an
//! ARGB color, a filling rule, and optional per-contour vertex counts.
//! Malformed counts (not summing to the vertex total, or any count of
//! zero) downgrade to a single implicit contour. Engines differ only in
//! their coverage model.
//!
//! This module also hosts the polygon helpers the alternative engines
//! share: directed edge extraction, scanline crossings, winding queries,
//! and bounds.

use log::warn;

use crate::basics::{FillingRule, RectD};
use crate::framebuffer::Framebuffer;

// ============================================================================
// PolygonFill contract
// ============================================================================

/// The capability every rasterization engine exposes.
pub trait PolygonFill {
    /// Fill a polygon with a solid color under the given rule.
    ///
    /// `vertices` is flat and even-length; `contour_counts`, when present,
    /// must sum to `vertices.len() / 2` with every count positive, or the
    /// whole array is treated as a single contour.
    fn draw_polygon(
        &mut self,
        vertices: &[f64],
        color: u32,
        fill_rule: FillingRule,
        contour_counts: Option<&[usize]>,
    );

    /// Set every pixel of the target buffer to `color`.
    fn clear(&mut self, color: u32);

    /// The engine's output buffer.
    fn buffer(&self) -> &Framebuffer;
}

// ============================================================================
// Contour resolution
// ============================================================================

/// Validate contour counts against the point total; fall back to a single
/// implicit contour on mismatch. Returns (start, len) point ranges.
pub fn contour_ranges(num_points: usize, counts: Option<&[usize]>) -> Vec<(usize, usize)> {
    if let Some(counts) = counts {
        let ok = !counts.is_empty()
            && counts.iter().all(|&c| c > 0)
            && counts.iter().sum::<usize>() == num_points;
        if ok {
            let mut out = Vec::with_capacity(counts.len());
            let mut start = 0;
            for &c in counts {
                out.push((start, c));
                start += c;
            }
            return out;
        }
        warn!(
            "contour counts {:?} do not partition {} points; using a single contour",
            counts, num_points
        );
    }
    vec![(0, num_points)]
}

// ============================================================================
// Edge
// ============================================================================

/// A directed polygon edge with the lower-y endpoint first.
///
/// `dir` is +1 when the original edge pointed downward (increasing y),
/// -1 when it pointed upward. Strictly horizontal edges are not built.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub dir: i32,
}

impl Edge {
    /// X of the intersection with the horizontal line at `y`.
    #[inline]
    pub fn x_at(&self, y: f64) -> f64 {
        self.x0 + (self.x1 - self.x0) * (y - self.y0) / (self.y1 - self.y0)
    }

    /// Whether the half-open vertical span [y0, y1) contains `y`.
    #[inline]
    pub fn spans(&self, y: f64) -> bool {
        y >= self.y0 && y < self.y1
    }
}

/// Extract directed edges from a polygon, wrapping around within each
/// contour. Horizontal edges contribute no coverage and are discarded.
pub fn collect_edges(vertices: &[f64], contour_counts: Option<&[usize]>) -> Vec<Edge> {
    let n = vertices.len() / 2;
    let mut edges = Vec::with_capacity(n);
    for (start, len) in contour_ranges(n, contour_counts) {
        if len < 2 {
            continue;
        }
        for i in 0..len {
            let j = (i + 1) % len;
            let (ax, ay) = (vertices[(start + i) * 2], vertices[(start + i) * 2 + 1]);
            let (bx, by) = (vertices[(start + j) * 2], vertices[(start + j) * 2 + 1]);
            if ay == by {
                continue;
            }
            if ay < by {
                edges.push(Edge {
                    x0: ax,
                    y0: ay,
                    x1: bx,
                    y1: by,
                    dir: 1,
                });
            } else {
                edges.push(Edge {
                    x0: bx,
                    y0: by,
                    x1: ax,
                    y1: ay,
                    dir: -1,
                });
            }
        }
    }
    edges
}

// ============================================================================
// Scanline queries
// ============================================================================

/// Collect the sorted (x, dir) crossings of `edges` with the horizontal
/// line at `y` into `out`.
pub fn scanline_crossings(edges: &[Edge], y: f64, out: &mut Vec<(f64, i32)>) {
    out.clear();
    for e in edges {
        if e.spans(y) {
            out.push((e.x_at(y), e.dir));
        }
    }
    out.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
}

/// Reduce sorted crossings to inside intervals under the rule.
pub fn inside_intervals(crossings: &[(f64, i32)], rule: FillingRule, out: &mut Vec<(f64, f64)>) {
    out.clear();
    let mut winding = 0;
    let mut span_start = 0.0;
    let mut inside = false;
    for &(x, dir) in crossings {
        winding += dir;
        let now_inside = rule.is_inside(winding);
        if now_inside && !inside {
            span_start = x;
        } else if !now_inside && inside && x > span_start {
            out.push((span_start, x));
        }
        inside = now_inside;
    }
}

/// Signed winding number at a point (ray cast toward +x).
pub fn winding_at(edges: &[Edge], x: f64, y: f64) -> i32 {
    let mut w = 0;
    for e in edges {
        if e.spans(y) && e.x_at(y) > x {
            w += e.dir;
        }
    }
    w
}

/// Inside test at a point under the rule.
#[inline]
pub fn point_inside(edges: &[Edge], x: f64, y: f64, rule: FillingRule) -> bool {
    rule.is_inside(winding_at(edges, x, y))
}

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned bounds of a flat vertex array.
pub fn polygon_bounds(vertices: &[f64]) -> Option<RectD> {
    if vertices.len() < 2 {
        return None;
    }
    let mut r = RectD::new(vertices[0], vertices[1], vertices[0], vertices[1]);
    for xy in vertices.chunks_exact(2) {
        if xy[0] < r.x1 {
            r.x1 = xy[0];
        }
        if xy[0] > r.x2 {
            r.x2 = xy[0];
        }
        if xy[1] < r.y1 {
            r.y1 = xy[1];
        }
        if xy[1] > r.y2 {
            r.y2 = xy[1];
        }
    }
    Some(r)
}

/// Pixel rows and columns of the polygon bounds clipped to a raster,
/// as inclusive ranges. `None` when fully outside.
pub fn clipped_pixel_bounds(
    vertices: &[f64],
    width: usize,
    height: usize,
) -> Option<(i32, i32, i32, i32)> {
    let b = polygon_bounds(vertices)?;
    let x0 = (b.x1.floor() as i32).max(0);
    let y0 = (b.y1.floor() as i32).max(0);
    let x1 = (b.x2.ceil() as i32).min(width as i32) - 1;
    let y1 = (b.y2.ceil() as i32).min(height as i32) - 1;
    if x1 < x0 || y1 < y0 || b.x2 < 0.0 || b.y2 < 0.0 {
        return None;
    }
    Some((x0, y0, x1, y1))
}

// ============================================================================
// Tests
// ============================================================================
