//! Scanline span-coverage rasterizer.
//!
//! For every pixel row (optionally split into 2 or 4 vertical tap strips
//! averaged with equal weights), the engine sorts the edge crossings of the
//! strip, pairs them into inside spans under the filling rule, and
//! partitions each span into a left border, a fully covered interior, and a
//! right border. Border pixel coverage is the analytic integral of
//! `clamp(u, 0, 1)` across the strip, where `u` is the linear pixel overlap
//! driven by the crossing X at the strip top and bottom.

use crate::basics::FillingRule;
use crate::comp_op::{apply_coverage, blend_src_over};
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::raster::{collect_edges, polygon_bounds, Edge, PolygonFill};

// ============================================================================
// Crossing record
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Crossing {
    x_mid: f64,
    x_top: f64,
    x_bot: f64,
    /// Fraction of the strip height the edge actually spans.
    h: f64,
    dir: i32,
}

/// Mean of `clamp(u, 0, 1)` as u varies linearly from `u0` to `u1`.
fn integral_clamp01(u0: f64, u1: f64) -> f64 {
    if (u0 - u1).abs() < 1e-12 {
        return u0.clamp(0.0, 1.0);
    }
    let g = |u: f64| -> f64 {
        if u <= 0.0 {
            0.0
        } else if u >= 1.0 {
            u - 0.5
        } else {
            0.5 * u * u
        }
    };
    (g(u1) - g(u0)) / (u1 - u0)
}

// ============================================================================
// CoverageSpanRasterizer
// ============================================================================

/// Span-partition scanline engine with optional vertical supersampling.
pub struct CoverageSpanRasterizer {
    fb: Framebuffer,
    taps: u32,
    crossings: Vec<Crossing>,
    cov: Vec<f32>,
}

impl CoverageSpanRasterizer {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        Ok(Self {
            fb: Framebuffer::new(width, height)?,
            taps: 1,
            crossings: Vec::new(),
            cov: vec![0.0; width],
        })
    }

    /// Vertical tap count; values other than 1, 2, 4 are clamped.
    pub fn set_vertical_taps(&mut self, taps: u32) {
        self.taps = match taps {
            0 | 1 => 1,
            2 | 3 => 2,
            _ => 4,
        };
    }

    fn strip_crossings(&mut self, edges: &[Edge], ys: f64, ye: f64) {
        self.crossings.clear();
        for e in edges {
            let top = e.y0.max(ys);
            let bot = e.y1.min(ye);
            if bot <= top {
                continue;
            }
            let x_top = e.x_at(top);
            let x_bot = e.x_at(bot);
            self.crossings.push(Crossing {
                x_mid: 0.5 * (x_top + x_bot),
                x_top,
                x_bot,
                h: (bot - top) / (ye - ys),
                dir: e.dir,
            });
        }
        self.crossings
            .sort_by(|a, b| a.x_mid.partial_cmp(&b.x_mid).unwrap());
    }

    /// Accumulate one strip's coverage (weighted by `weight`) into `cov`.
    fn accumulate_strip(&mut self, fill_rule: FillingRule, weight: f32) {
        let width = self.fb.width() as i32;
        let mut winding = 0;
        let mut open: Option<Crossing> = None;

        for i in 0..self.crossings.len() {
            let c = self.crossings[i];
            winding += c.dir;
            let inside = fill_rule.is_inside(winding);
            match (inside, open) {
                (true, None) => open = Some(c),
                (false, Some(left)) => {
                    let right = c;
                    let px0 = (left.x_top.min(left.x_bot).floor() as i32).max(0);
                    let px1 = ((right.x_top.max(right.x_bot).ceil() as i32) - 1).min(width - 1);
                    for px in px0..=px1 {
                        let l = integral_clamp01(
                            px as f64 + 1.0 - left.x_top,
                            px as f64 + 1.0 - left.x_bot,
                        );
                        let r = integral_clamp01(
                            right.x_top - px as f64,
                            right.x_bot - px as f64,
                        );
                        let c01 = (l + r - 1.0).max(0.0) * left.h.min(right.h);
                        self.cov[px as usize] += weight * c01 as f32;
                    }
                    open = None;
                }
                _ => {}
            }
        }
    }
}

impl PolygonFill for CoverageSpanRasterizer {
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
        let Some(bounds) = polygon_bounds(vertices) else {
            return;
        };
        let height = self.fb.height() as i32;
        let y0 = (bounds.y1.floor() as i32).max(0);
        let y1 = (bounds.y2.ceil() as i32).min(height) - 1;

        let taps = self.taps;
        let weight = 1.0 / taps as f32;

        for y in y0..=y1 {
            self.cov.fill(0.0);
            for k in 0..taps {
                let ys = y as f64 + k as f64 / taps as f64;
                let ye = y as f64 + (k + 1) as f64 / taps as f64;
                self.strip_crossings(&edges, ys, ye);
                self.accumulate_strip(fill_rule, weight);
            }
            for x in 0..self.fb.width() {
                let c = self.cov[x];
                if c <= 0.0 {
                    continue;
                }
                let alpha = ((c * 255.0 + 0.5) as u32).min(255);
                let src = apply_coverage(color, alpha);
                let dst = self.fb.pixel(x, y as usize);
                self.fb.set_pixel(x, y as usize, blend_src_over(dst, src));
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
// Tests
// ============================================================================
