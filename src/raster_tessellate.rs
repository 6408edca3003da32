//! Tessellating rasterizer.
//!
//! The polygon is triangulated by ear clipping; contours whose orientation
//! opposes the dominant one are treated as holes and spliced into their
//! containing outer contour through a bridge at the hole's rightmost
//! vertex. Each triangle is then rasterized with a 4 x 4 per-pixel sample
//! mask whose population count gives the coverage; triangle coverages
//! accumulate per pixel before one blend pass, so interior seams between
//! adjacent triangles do not double-blend.

use crate::basics::{FillingRule, PointD};
use crate::comp_op::{apply_coverage, blend_src_over};
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::math::{calc_polygon_area, calc_sq_distance, point_in_triangle};
use crate::raster::{contour_ranges, PolygonFill};

const SAMPLES: i32 = 4;

// ============================================================================
// TessellationRasterizer
// ============================================================================

pub struct TessellationRasterizer {
    fb: Framebuffer,
}

impl TessellationRasterizer {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        Ok(Self {
            fb: Framebuffer::new(width, height)?,
        })
    }
}

impl PolygonFill for TessellationRasterizer {
    fn draw_polygon(
        &mut self,
        vertices: &[f64],
        color: u32,
        _fill_rule: FillingRule,
        contour_counts: Option<&[usize]>,
    ) {
        let n = vertices.len() / 2;
        if n < 3 {
            return;
        }

        // Split into contours and classify holes by orientation.
        let mut contours: Vec<Vec<PointD>> = Vec::new();
        for (start, len) in contour_ranges(n, contour_counts) {
            if len < 3 {
                continue;
            }
            let pts: Vec<PointD> = (0..len)
                .map(|i| PointD::new(vertices[(start + i) * 2], vertices[(start + i) * 2 + 1]))
                .collect();
            contours.push(pts);
        }
        if contours.is_empty() {
            return;
        }

        let areas: Vec<f64> = contours.iter().map(|c| calc_polygon_area(c)).collect();
        let dominant = areas
            .iter()
            .cloned()
            .max_by(|a, b| a.abs().partial_cmp(&b.abs()).unwrap())
            .unwrap_or(0.0);

        let mut outers: Vec<Vec<PointD>> = Vec::new();
        let mut holes: Vec<Vec<PointD>> = Vec::new();
        for (c, &a) in contours.into_iter().zip(&areas) {
            if a * dominant >= 0.0 {
                outers.push(c);
            } else {
                holes.push(c);
            }
        }

        // Splice each hole into the outer contour containing it.
        for hole in holes {
            let probe = hole[0];
            if let Some(outer) = outers.iter_mut().find(|o| contour_contains(o, probe)) {
                splice_hole(outer, &hole);
            }
        }

        // Triangulate and accumulate coverage.
        let width = self.fb.width();
        let height = self.fb.height();
        let mut triangles = Vec::new();
        for outer in &outers {
            ear_clip(outer, &mut triangles);
        }
        if triangles.is_empty() {
            return;
        }

        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for t in &triangles {
            for p in t {
                min_x = min_x.min(p.x.floor() as i32);
                min_y = min_y.min(p.y.floor() as i32);
                max_x = max_x.max(p.x.ceil() as i32);
                max_y = max_y.max(p.y.ceil() as i32);
            }
        }
        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        let max_x = max_x.min(width as i32 - 1);
        let max_y = max_y.min(height as i32 - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let bw = (max_x - min_x + 1) as usize;
        let bh = (max_y - min_y + 1) as usize;
        let mut cov = vec![0u16; bw * bh];
        let full = (SAMPLES * SAMPLES) as u16;

        for t in &triangles {
            let tx0 = (t[0].x.min(t[1].x).min(t[2].x).floor() as i32).max(min_x);
            let ty0 = (t[0].y.min(t[1].y).min(t[2].y).floor() as i32).max(min_y);
            let tx1 = (t[0].x.max(t[1].x).max(t[2].x).ceil() as i32).min(max_x);
            let ty1 = (t[0].y.max(t[1].y).max(t[2].y).ceil() as i32).min(max_y);
            for y in ty0..=ty1 {
                for x in tx0..=tx1 {
                    let mut pop = 0u16;
                    for j in 0..SAMPLES {
                        for i in 0..SAMPLES {
                            let sx = x as f64 + (i as f64 + 0.5) / SAMPLES as f64;
                            let sy = y as f64 + (j as f64 + 0.5) / SAMPLES as f64;
                            if point_in_triangle(
                                t[0].x, t[0].y, t[1].x, t[1].y, t[2].x, t[2].y, sx, sy,
                            ) {
                                pop += 1;
                            }
                        }
                    }
                    if pop > 0 {
                        let idx = (y - min_y) as usize * bw + (x - min_x) as usize;
                        cov[idx] = (cov[idx] + pop).min(full);
                    }
                }
            }
        }

        for row in 0..bh {
            for col in 0..bw {
                let pop = cov[row * bw + col];
                if pop == 0 {
                    continue;
                }
                let alpha = (pop as u32 * 255 + full as u32 / 2) / full as u32;
                let (px, py) = ((min_x + col as i32) as usize, (min_y + row as i32) as usize);
                let src = apply_coverage(color, alpha.min(255));
                let dst = self.fb.pixel(px, py);
                self.fb.set_pixel(px, py, blend_src_over(dst, src));
            }
        }
    }

    fn clear(&mut self, color: u32) {
        self.fb.clear(color);
    }

    fn buffer(&self) -> &Framebuffer {
        &self.fb
    }
}

// ============================================================================
// Hole assignment
// ============================================================================

/// Even-odd containment test of a point in one contour.
fn contour_contains(pts: &[PointD], p: PointD) -> bool {
    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (a, b) = (pts[i], pts[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Splice a hole into an outer contour with a two-way bridge between the
/// hole's rightmost vertex and the nearest outer vertex.
fn splice_hole(outer: &mut Vec<PointD>, hole: &[PointD]) {
    let hi = (0..hole.len())
        .max_by(|&a, &b| hole[a].x.partial_cmp(&hole[b].x).unwrap())
        .unwrap();
    let hp = hole[hi];
    let oi = (0..outer.len())
        .min_by(|&a, &b| {
            calc_sq_distance(outer[a].x, outer[a].y, hp.x, hp.y)
                .partial_cmp(&calc_sq_distance(outer[b].x, outer[b].y, hp.x, hp.y))
                .unwrap()
        })
        .unwrap();

    let mut merged = Vec::with_capacity(outer.len() + hole.len() + 2);
    merged.extend_from_slice(&outer[..=oi]);
    for k in 0..=hole.len() {
        merged.push(hole[(hi + k) % hole.len()]);
    }
    merged.push(outer[oi]);
    merged.extend_from_slice(&outer[oi + 1..]);
    *outer = merged;
}

// ============================================================================
// Ear clipping
// ============================================================================

/// Triangulate one polygon by ear clipping. Guaranteed to make progress on
/// degenerate input by clipping the widest corner when no strict ear exists.
fn ear_clip(pts: &[PointD], out: &mut Vec<[PointD; 3]>) {
    let mut poly: Vec<PointD> = pts.to_vec();
    if poly.len() < 3 {
        return;
    }
    let orientation = calc_polygon_area(&poly).signum();

    while poly.len() > 3 {
        let n = poly.len();
        let mut clipped = false;
        for i in 0..n {
            let prev = poly[(i + n - 1) % n];
            let v = poly[i];
            let next = poly[(i + 1) % n];
            let cross = (v.x - prev.x) * (next.y - v.y) - (v.y - prev.y) * (next.x - v.x);
            if cross * orientation <= 0.0 {
                continue; // reflex or collinear corner
            }
            let mut ear = true;
            for (k, p) in poly.iter().enumerate() {
                if k == (i + n - 1) % n || k == i || k == (i + 1) % n {
                    continue;
                }
                if point_in_triangle(prev.x, prev.y, v.x, v.y, next.x, next.y, p.x, p.y) {
                    ear = false;
                    break;
                }
            }
            if ear {
                out.push([prev, v, next]);
                poly.remove(i);
                clipped = true;
                break;
            }
        }
        if !clipped {
            // No strict ear (self-touching bridge geometry): clip the
            // sharpest convex corner to keep terminating.
            let mut best = 0;
            let mut best_cross = f64::MIN;
            for i in 0..poly.len() {
                let n = poly.len();
                let prev = poly[(i + n - 1) % n];
                let v = poly[i];
                let next = poly[(i + 1) % n];
                let cross =
                    ((v.x - prev.x) * (next.y - v.y) - (v.y - prev.y) * (next.x - v.x))
                        * orientation;
                if cross > best_cross {
                    best_cross = cross;
                    best = i;
                }
            }
            let n = poly.len();
            out.push([
                poly[(best + n - 1) % n],
                poly[best],
                poly[(best + 1) % n],
            ]);
            poly.remove(best);
        }
    }
    out.push([poly[0], poly[1], poly[2]]);
}

// ============================================================================
// Tests
// ============================================================================
