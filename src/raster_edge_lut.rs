//! Dominant-edge lookup rasterizer.
//!
//! Coverage near a boundary is approximated by a single half-plane: each
//! pixel selects its dominant edge (smallest squared distance from the
//! pixel center to the segment) and reads coverage from a precomputed 2D
//! table indexed by the edge's orientation, folded into [0, pi/2], and the
//! signed center distance in [-1.25, 1.25]. The winding at the pixel
//! center picks the side of the table. Pathological pixels - two edges
//! nearly equally close, or a projection landing at a segment endpoint -
//! fall back to 4 x 4 supersampling.

use crate::basics::FillingRule;
use crate::comp_op::{apply_coverage, blend_src_over};
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::math::{calc_segment_point_sq_distance_with_u, calc_segment_point_u};
use crate::raster::{clipped_pixel_bounds, collect_edges, point_inside, Edge, PolygonFill};

const THETA_STEPS: usize = 32;
const DIST_STEPS: usize = 64;
const DIST_RANGE: f64 = 1.25;

/// Relative closeness of the two nearest edges below which the half-plane
/// model is unreliable.
const AMBIGUITY_MARGIN: f64 = 0.02;
/// Projection parameter margin treated as "near an endpoint".
const ENDPOINT_MARGIN: f64 = 0.02;

// ============================================================================
// EdgeLutRasterizer
// ============================================================================

pub struct EdgeLutRasterizer {
    fb: Framebuffer,
    lut: Vec<u8>,
}

impl EdgeLutRasterizer {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        Ok(Self {
            fb: Framebuffer::new(width, height)?,
            lut: build_lut(),
        })
    }

    #[inline]
    fn lut_coverage(&self, theta: f64, signed_dist: f64) -> u32 {
        let ti = ((theta / std::f64::consts::FRAC_PI_2) * THETA_STEPS as f64)
            .clamp(0.0, THETA_STEPS as f64 - 1.0) as usize;
        let di = (((signed_dist + DIST_RANGE) / (2.0 * DIST_RANGE)) * DIST_STEPS as f64)
            .clamp(0.0, DIST_STEPS as f64 - 1.0) as usize;
        self.lut[ti * DIST_STEPS + di] as u32
    }
}

/// Coverage of the half-plane `p . n <= s` over the unit pixel centered at
/// the origin, supersampled 16 x 16 at table build time.
fn build_lut() -> Vec<u8> {
    let mut lut = vec![0u8; THETA_STEPS * DIST_STEPS];
    for ti in 0..THETA_STEPS {
        let theta = (ti as f64 + 0.5) / THETA_STEPS as f64 * std::f64::consts::FRAC_PI_2;
        let (ny, nx) = theta.sin_cos();
        for di in 0..DIST_STEPS {
            let s = -DIST_RANGE + (di as f64 + 0.5) / DIST_STEPS as f64 * 2.0 * DIST_RANGE;
            let mut hits = 0u32;
            for j in 0..16 {
                for i in 0..16 {
                    let px = (i as f64 + 0.5) / 16.0 - 0.5;
                    let py = (j as f64 + 0.5) / 16.0 - 0.5;
                    if px * nx + py * ny <= s {
                        hits += 1;
                    }
                }
            }
            lut[ti * DIST_STEPS + di] = ((hits * 255 + 128) / 256) as u8;
        }
    }
    lut
}

impl PolygonFill for EdgeLutRasterizer {
    fn draw_polygon(
        &mut self,
        vertices: &[f64],
        color: u32,
        fill_rule: FillingRule,
        contour_counts: Option<&[usize]>,
    ) {
        if vertices.len() < 6 {
            return;
        }
        let edges = collect_edges(vertices, contour_counts);
        if edges.is_empty() {
            return;
        }
        let Some((x0, y0, x1, y1)) =
            clipped_pixel_bounds(vertices, self.fb.width(), self.fb.height())
        else {
            return;
        };

        for y in y0..=y1 {
            let py = y as f64 + 0.5;
            for x in x0..=x1 {
                let px = x as f64 + 0.5;

                // Dominant edge by squared segment distance.
                let mut best = f64::MAX;
                let mut second = f64::MAX;
                let mut best_edge: Option<&Edge> = None;
                let mut best_u = 0.0;
                for e in &edges {
                    let u = calc_segment_point_u(e.x0, e.y0, e.x1, e.y1, px, py);
                    let d = calc_segment_point_sq_distance_with_u(
                        e.x0, e.y0, e.x1, e.y1, px, py, u,
                    );
                    if d < best {
                        second = best;
                        best = d;
                        best_edge = Some(e);
                        best_u = u;
                    } else if d < second {
                        second = d;
                    }
                }
                let Some(edge) = best_edge else { continue };

                let inside = point_inside(&edges, px, py, fill_rule);
                let dist = best.sqrt();

                let alpha = if dist >= DIST_RANGE {
                    if inside {
                        255
                    } else {
                        0
                    }
                } else if second - best < AMBIGUITY_MARGIN * (1.0 + best)
                    || best_u < ENDPOINT_MARGIN
                    || best_u > 1.0 - ENDPOINT_MARGIN
                {
                    supersample16(&edges, px, py, fill_rule)
                } else {
                    // Orientation of the edge normal folded by symmetry.
                    let dx = (edge.x1 - edge.x0).abs();
                    let dy = edge.y1 - edge.y0;
                    let theta = dx.atan2(dy);
                    let signed = if inside { dist } else { -dist };
                    self.lut_coverage(theta, signed)
                };

                if alpha == 0 {
                    continue;
                }
                let src = apply_coverage(color, alpha);
                let dst = self.fb.pixel(x as usize, y as usize);
                self.fb
                    .set_pixel(x as usize, y as usize, blend_src_over(dst, src));
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

/// 4 x 4 supersampled coverage, the fallback for ambiguous pixels.
fn supersample16(edges: &[Edge], px: f64, py: f64, fill_rule: FillingRule) -> u32 {
    let mut hits = 0u32;
    for j in 0..4 {
        for i in 0..4 {
            let sx = px - 0.5 + (i as f64 + 0.5) / 4.0;
            let sy = py - 0.5 + (j as f64 + 0.5) / 4.0;
            if point_inside(edges, sx, sy, fill_rule) {
                hits += 1;
            }
        }
    }
    (hits * 255 + 8) / 16
}

// ============================================================================
// Tests
// ============================================================================
