//! Supersampling rasterizer.
//!
//! Coverage is estimated by point-sampling an N x N grid inside every
//! pixel (optionally a rotated grid, which breaks up the axis-aligned
//! moire of the regular one). A tile cache short-circuits 8 x 8 blocks
//! that no edge touches: fully interior tiles are span-filled, fully
//! exterior tiles are skipped without sampling.

use crate::basics::FillingRule;
use crate::comp_op::{apply_coverage, blend_src_over};
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::raster::{clipped_pixel_bounds, collect_edges, point_inside, Edge, PolygonFill};

const TILE: i32 = 8;
/// Rotated-grid angle: atan(1/2), the classic quincunx-family rotation.
const ROT_ANGLE: f64 = 0.4636476090008061;

// ============================================================================
// SupersampleRasterizer
// ============================================================================

pub struct SupersampleRasterizer {
    fb: Framebuffer,
    grid: u32,
    rotated: bool,
    offsets: Vec<(f64, f64)>,
}

impl SupersampleRasterizer {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        let mut r = Self {
            fb: Framebuffer::new(width, height)?,
            grid: 4,
            rotated: false,
            offsets: Vec::new(),
        };
        r.rebuild_offsets();
        Ok(r)
    }

    /// Samples per pixel axis (clamped to [1, 8]).
    pub fn set_grid(&mut self, n: u32) {
        self.grid = n.clamp(1, 8);
        self.rebuild_offsets();
    }

    pub fn set_rotated(&mut self, rotated: bool) {
        self.rotated = rotated;
        self.rebuild_offsets();
    }

    fn rebuild_offsets(&mut self) {
        let n = self.grid;
        self.offsets.clear();
        let (sin, cos) = ROT_ANGLE.sin_cos();
        for j in 0..n {
            for i in 0..n {
                let ox = (i as f64 + 0.5) / n as f64;
                let oy = (j as f64 + 0.5) / n as f64;
                if self.rotated {
                    let (cx, cy) = (ox - 0.5, oy - 0.5);
                    let rx = cx * cos - cy * sin + 0.5;
                    let ry = cx * sin + cy * cos + 0.5;
                    self.offsets.push((rx - rx.floor(), ry - ry.floor()));
                } else {
                    self.offsets.push((ox, oy));
                }
            }
        }
    }

    /// True when some edge's bounding box overlaps the tile rectangle.
    fn tile_touched(edges: &[Edge], x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
        edges.iter().any(|e| {
            let ex0 = e.x0.min(e.x1);
            let ex1 = e.x0.max(e.x1);
            ex1 >= x0 && ex0 <= x1 && e.y1 >= y0 && e.y0 <= y1
        })
    }

    fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: u32, alpha: u32) {
        let src = apply_coverage(color, alpha);
        for x in x0..=x1 {
            let dst = self.fb.pixel(x as usize, y as usize);
            self.fb
                .set_pixel(x as usize, y as usize, blend_src_over(dst, src));
        }
    }
}

impl PolygonFill for SupersampleRasterizer {
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
        let Some((bx0, by0, bx1, by1)) =
            clipped_pixel_bounds(vertices, self.fb.width(), self.fb.height())
        else {
            return;
        };

        let samples = self.offsets.clone();
        let inv = 1.0 / samples.len() as f64;

        let mut ty = by0;
        while ty <= by1 {
            let tile_y1 = (ty + TILE - 1).min(by1);
            let mut tx = bx0;
            while tx <= bx1 {
                let tile_x1 = (tx + TILE - 1).min(bx1);

                if !Self::tile_touched(
                    &edges,
                    tx as f64,
                    ty as f64,
                    tile_x1 as f64 + 1.0,
                    tile_y1 as f64 + 1.0,
                ) {
                    // Uniform tile: one inside test decides the whole block.
                    let cx = (tx + tile_x1) as f64 * 0.5 + 0.5;
                    let cy = (ty + tile_y1) as f64 * 0.5 + 0.5;
                    if point_inside(&edges, cx, cy, fill_rule) {
                        for y in ty..=tile_y1 {
                            self.fill_span(y, tx, tile_x1, color, 255);
                        }
                    }
                } else {
                    for y in ty..=tile_y1 {
                        for x in tx..=tile_x1 {
                            let mut hits = 0usize;
                            for &(ox, oy) in &samples {
                                if point_inside(&edges, x as f64 + ox, y as f64 + oy, fill_rule) {
                                    hits += 1;
                                }
                            }
                            if hits == 0 {
                                continue;
                            }
                            let alpha = ((hits as f64 * inv) * 255.0 + 0.5) as u32;
                            self.fill_span(y, x, x, color, alpha.min(255));
                        }
                    }
                }
                tx = tile_x1 + 1;
            }
            ty = tile_y1 + 1;
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
