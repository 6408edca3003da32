//! Narrow-band signed-distance rasterizer with error diffusion.
//!
//! Restricted to the polygon's bounding box, the engine runs four stages:
//! a scanline inside/outside mask at pixel centers; a narrow-band signed
//! distance field computed exactly only where the mask changes between
//! neighbors; optional stochastic smoothing of the band (jittered 3 x 3
//! averaging with a deterministic LCG); and a smoothstep coverage ramp
//! whose 8-bit quantization error is Floyd-Steinberg diffused across the
//! box.

use crate::basics::FillingRule;
use crate::comp_op::{apply_coverage, blend_src_over};
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::math::calc_segment_point_sq_distance;
use crate::raster::{
    clipped_pixel_bounds, collect_edges, inside_intervals, scanline_crossings, Edge, PolygonFill,
};

/// Half-width of the smoothstep ramp, in pixels.
const RAMP: f64 = std::f64::consts::FRAC_1_SQRT_2;
/// Distance assigned outside the narrow band.
const FAR: f64 = 1.0e6;

// ============================================================================
// DistanceFieldRasterizer
// ============================================================================

pub struct DistanceFieldRasterizer {
    fb: Framebuffer,
    smoothing: bool,
}

impl DistanceFieldRasterizer {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        Ok(Self {
            fb: Framebuffer::new(width, height)?,
            smoothing: false,
        })
    }

    /// Enable the stochastic band-smoothing stage.
    pub fn set_smoothing(&mut self, smoothing: bool) {
        self.smoothing = smoothing;
    }
}

/// Tiny deterministic LCG for the jittered smoothing weights.
struct Lcg(u32);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(1664525).wrapping_add(1013904223);
        (self.0 >> 8) as f64 / (1 << 24) as f64
    }
}

impl PolygonFill for DistanceFieldRasterizer {
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
        let edges: Vec<Edge> = collect_edges(vertices, contour_counts);
        if edges.is_empty() {
            return;
        }
        let Some((bx0, by0, bx1, by1)) =
            clipped_pixel_bounds(vertices, self.fb.width(), self.fb.height())
        else {
            return;
        };

        let bw = (bx1 - bx0 + 1) as usize;
        let bh = (by1 - by0 + 1) as usize;

        // Stage 1: inside/outside mask at pixel centers.
        let mut mask = vec![false; bw * bh];
        let mut crossings = Vec::new();
        let mut intervals = Vec::new();
        for row in 0..bh {
            let y = (by0 + row as i32) as f64 + 0.5;
            scanline_crossings(&edges, y, &mut crossings);
            inside_intervals(&crossings, fill_rule, &mut intervals);
            for &(xa, xb) in &intervals {
                let px0 = ((xa - 0.5).ceil() as i32).max(bx0);
                let px1 = ((xb - 0.5).floor() as i32).min(bx1);
                for px in px0..=px1 {
                    if (px as f64 + 0.5) >= xa && (px as f64 + 0.5) < xb {
                        mask[row * bw + (px - bx0) as usize] = true;
                    }
                }
            }
        }

        // Stage 2: exact signed distances in the band where the mask flips.
        let at = |r: i32, c: i32| -> bool {
            if r < 0 || c < 0 || r >= bh as i32 || c >= bw as i32 {
                false
            } else {
                mask[r as usize * bw + c as usize]
            }
        };
        let mut sdf = vec![0.0f64; bw * bh];
        for row in 0..bh {
            for col in 0..bw {
                let inside = mask[row * bw + col];
                let mut band = false;
                'scan: for dr in -1..=1_i32 {
                    for dc in -1..=1_i32 {
                        if at(row as i32 + dr, col as i32 + dc) != inside {
                            band = true;
                            break 'scan;
                        }
                    }
                }
                let idx = row * bw + col;
                if band {
                    let px = (bx0 + col as i32) as f64 + 0.5;
                    let py = (by0 + row as i32) as f64 + 0.5;
                    let mut best = f64::MAX;
                    for e in &edges {
                        let d = calc_segment_point_sq_distance(e.x0, e.y0, e.x1, e.y1, px, py);
                        if d < best {
                            best = d;
                        }
                    }
                    let d = best.sqrt();
                    sdf[idx] = if inside { d } else { -d };
                } else {
                    sdf[idx] = if inside { FAR } else { -FAR };
                }
            }
        }

        // Stage 3: optional stochastic smoothing of the band.
        if self.smoothing {
            let mut rng = Lcg(0x2545_F491);
            let src = sdf.clone();
            for row in 0..bh {
                for col in 0..bw {
                    let idx = row * bw + col;
                    if src[idx].abs() >= FAR {
                        continue;
                    }
                    let mut sum = 0.0;
                    let mut wsum = 0.0;
                    for dr in -1..=1_i32 {
                        for dc in -1..=1_i32 {
                            let (r, c) = (row as i32 + dr, col as i32 + dc);
                            if r < 0 || c < 0 || r >= bh as i32 || c >= bw as i32 {
                                continue;
                            }
                            let v = src[r as usize * bw + c as usize].clamp(-2.0, 2.0);
                            let w = if dr == 0 && dc == 0 { 4.0 } else { 1.0 }
                                + 0.25 * rng.next_unit();
                            sum += v * w;
                            wsum += w;
                        }
                    }
                    sdf[idx] = sum / wsum;
                }
            }
        }

        // Stage 4: smoothstep coverage + Floyd-Steinberg error diffusion.
        let mut err_row = vec![0.0f64; bw + 2];
        let mut err_next = vec![0.0f64; bw + 2];
        for row in 0..bh {
            err_next.fill(0.0);
            for col in 0..bw {
                let idx = row * bw + col;
                let t = ((sdf[idx] / RAMP + 1.0) * 0.5).clamp(0.0, 1.0);
                let cov = t * t * (3.0 - 2.0 * t) * 255.0;
                let want = cov + err_row[col + 1];
                let q = want.round().clamp(0.0, 255.0);
                let e = want - q;
                err_row[col + 2] += e * 7.0 / 16.0;
                err_next[col] += e * 3.0 / 16.0;
                err_next[col + 1] += e * 5.0 / 16.0;
                err_next[col + 2] += e * 1.0 / 16.0;

                let alpha = q as u32;
                if alpha == 0 {
                    continue;
                }
                let (px, py) = ((bx0 + col as i32) as usize, (by0 + row as i32) as usize);
                let src = apply_coverage(color, alpha);
                let dst = self.fb.pixel(px, py);
                self.fb.set_pixel(px, py, blend_src_over(dst, src));
            }
            std::mem::swap(&mut err_row, &mut err_next);
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
// Tests
// ============================================================================
