//! Haar wavelet rasterizer.
//!
//! The polygon is integrated over a power-of-two cell grid covering its
//! bounding box: each cell's occupancy is the signed area of the clipped
//! contours (a contour integral evaluated by polygon clipping), giving
//! the finest-level scaling coefficients. A full 2D Haar pyramid is built
//! from them, and the occupancy grid is recovered by quadtree descent that
//! stops early wherever every detail coefficient of a subtree vanishes -
//! uniform regions are filled in one step. Pixel coverage is sampled from
//! the reconstructed cells.

use crate::basics::{FillingRule, PointD};
use crate::comp_op::{apply_coverage, blend_src_over};
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::raster::{clipped_pixel_bounds, contour_ranges, PolygonFill};

/// Largest grid edge; bounding boxes beyond this use coarser cells.
const MAX_GRID: usize = 256;
/// Detail magnitude below which a subtree is treated as uniform.
const DETAIL_EPSILON: f64 = 1e-9;

// ============================================================================
// WaveletRasterizer
// ============================================================================

pub struct WaveletRasterizer {
    fb: Framebuffer,
}

impl WaveletRasterizer {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        Ok(Self {
            fb: Framebuffer::new(width, height)?,
        })
    }
}

impl PolygonFill for WaveletRasterizer {
    fn draw_polygon(
        &mut self,
        vertices: &[f64],
        color: u32,
        fill_rule: FillingRule,
        contour_counts: Option<&[usize]>,
    ) {
        let n = vertices.len() / 2;
        if n < 3 {
            return;
        }
        let Some((bx0, by0, bx1, by1)) =
            clipped_pixel_bounds(vertices, self.fb.width(), self.fb.height())
        else {
            return;
        };
        let bw = (bx1 - bx0 + 1) as usize;
        let bh = (by1 - by0 + 1) as usize;
        let max_dim = bw.max(bh);
        let grid = max_dim.next_power_of_two().min(MAX_GRID);
        let cell = max_dim as f64 / grid as f64;

        // Finest-level scaling coefficients: signed clipped area per cell.
        let mut psi = vec![0.0f64; grid * grid];
        for (start, len) in contour_ranges(n, contour_counts) {
            if len < 3 {
                continue;
            }
            let pts: Vec<PointD> = (0..len)
                .map(|i| PointD::new(vertices[(start + i) * 2], vertices[(start + i) * 2 + 1]))
                .collect();
            accumulate_contour(&pts, &mut psi, grid, bx0 as f64, by0 as f64, cell);
        }

        // Winding to occupancy under the rule.
        for v in psi.iter_mut() {
            let w = v.abs();
            *v = match fill_rule {
                FillingRule::NonZero => w.min(1.0),
                FillingRule::EvenOdd => {
                    let f = w % 2.0;
                    if f > 1.0 {
                        2.0 - f
                    } else {
                        f
                    }
                }
            };
        }

        // Haar analysis, then quadtree synthesis with uniform early-out.
        let pyramid = HaarPyramid::analyze(&psi, grid);
        let mut occupancy = vec![0.0f64; grid * grid];
        pyramid.synthesize(&mut occupancy);

        // Map pixel coverage from grid cells (2 x 2 samples per pixel).
        for y in by0..=by1 {
            for x in bx0..=bx1 {
                let mut sum = 0.0;
                for (ox, oy) in [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)] {
                    let gx = ((x as f64 + ox - bx0 as f64) / cell) as usize;
                    let gy = ((y as f64 + oy - by0 as f64) / cell) as usize;
                    if gx < grid && gy < grid {
                        sum += occupancy[gy * grid + gx];
                    }
                }
                let alpha = (sum * 0.25 * 255.0 + 0.5) as u32;
                if alpha == 0 {
                    continue;
                }
                let src = apply_coverage(color, alpha.min(255));
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

// ============================================================================
// Cell integration
// ============================================================================

/// Add one contour's signed area fraction into every cell it overlaps.
fn accumulate_contour(
    pts: &[PointD],
    psi: &mut [f64],
    grid: usize,
    ox: f64,
    oy: f64,
    cell: f64,
) {
    // Contour bounds in cell indices.
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for p in pts {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let c0 = (((min_x - ox) / cell).floor() as i64).max(0) as usize;
    let r0 = (((min_y - oy) / cell).floor() as i64).max(0) as usize;
    let c1 = ((((max_x - ox) / cell).ceil() as i64).min(grid as i64) as usize).max(c0);
    let r1 = ((((max_y - oy) / cell).ceil() as i64).min(grid as i64) as usize).max(r0);

    let inv_area = 1.0 / (cell * cell);
    let mut clipped = Vec::new();
    let mut tmp = Vec::new();
    for r in r0..r1.min(grid) {
        for c in c0..c1.min(grid) {
            let x0 = ox + c as f64 * cell;
            let y0 = oy + r as f64 * cell;
            let area = clipped_area(pts, x0, y0, x0 + cell, y0 + cell, &mut clipped, &mut tmp);
            if area != 0.0 {
                psi[r * grid + c] += area * inv_area;
            }
        }
    }
}

/// Signed area of a polygon clipped to a rectangle (Sutherland-Hodgman).
fn clipped_area(
    pts: &[PointD],
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    work: &mut Vec<PointD>,
    tmp: &mut Vec<PointD>,
) -> f64 {
    work.clear();
    work.extend_from_slice(pts);

    // Each pass clips against one rectangle side.
    for side in 0..4 {
        if work.len() < 3 {
            return 0.0;
        }
        let inside = |p: &PointD| -> bool {
            match side {
                0 => p.x >= x0,
                1 => p.x <= x1,
                2 => p.y >= y0,
                _ => p.y <= y1,
            }
        };
        let intersect = |a: &PointD, b: &PointD| -> PointD {
            match side {
                0 | 1 => {
                    let x = if side == 0 { x0 } else { x1 };
                    let t = (x - a.x) / (b.x - a.x);
                    PointD::new(x, a.y + t * (b.y - a.y))
                }
                _ => {
                    let y = if side == 2 { y0 } else { y1 };
                    let t = (y - a.y) / (b.y - a.y);
                    PointD::new(a.x + t * (b.x - a.x), y)
                }
            }
        };
        tmp.clear();
        for i in 0..work.len() {
            let a = work[i];
            let b = work[(i + 1) % work.len()];
            match (inside(&a), inside(&b)) {
                (true, true) => tmp.push(b),
                (true, false) => tmp.push(intersect(&a, &b)),
                (false, true) => {
                    tmp.push(intersect(&a, &b));
                    tmp.push(b);
                }
                (false, false) => {}
            }
        }
        std::mem::swap(work, tmp);
    }
    if work.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut prev = work[work.len() - 1];
    for p in work.iter() {
        sum += prev.x * p.y - prev.y * p.x;
        prev = *p;
    }
    sum * 0.5
}

// ============================================================================
// Haar pyramid
// ============================================================================

struct HaarLevel {
    size: usize,
    h: Vec<f64>,
    v: Vec<f64>,
    d: Vec<f64>,
}

/// Full 2D Haar decomposition of a square grid.
struct HaarPyramid {
    root: f64,
    levels: Vec<HaarLevel>,
}

impl HaarPyramid {
    fn analyze(psi: &[f64], grid: usize) -> Self {
        let mut levels = Vec::new();
        let mut avgs = psi.to_vec();
        let mut size = grid;
        while size > 1 {
            let half = size / 2;
            let mut next = vec![0.0; half * half];
            let mut lh = vec![0.0; half * half];
            let mut lv = vec![0.0; half * half];
            let mut ld = vec![0.0; half * half];
            for j in 0..half {
                for i in 0..half {
                    let p00 = avgs[(2 * j) * size + 2 * i];
                    let p01 = avgs[(2 * j) * size + 2 * i + 1];
                    let p10 = avgs[(2 * j + 1) * size + 2 * i];
                    let p11 = avgs[(2 * j + 1) * size + 2 * i + 1];
                    next[j * half + i] = (p00 + p01 + p10 + p11) * 0.25;
                    lh[j * half + i] = (p00 - p01 + p10 - p11) * 0.25;
                    lv[j * half + i] = (p00 + p01 - p10 - p11) * 0.25;
                    ld[j * half + i] = (p00 - p01 - p10 + p11) * 0.25;
                }
            }
            levels.push(HaarLevel {
                size: half,
                h: lh,
                v: lv,
                d: ld,
            });
            avgs = next;
            size = half;
        }
        levels.reverse();
        Self {
            root: avgs[0],
            levels,
        }
    }

    /// Quadtree descent writing the reconstructed occupancy; a subtree with
    /// no detail anywhere below is emitted as one uniform block.
    fn synthesize(&self, out: &mut [f64]) {
        let grid = self.levels.last().map_or(1, |l| l.size * 2);
        self.descend(out, grid, 0, 0, 0, self.root);
    }

    fn subtree_uniform(&self, level: usize, i: usize, j: usize) -> bool {
        let mut span = 1usize;
        for l in &self.levels[level..] {
            let (i0, j0) = (i * span, j * span);
            for jj in j0..j0 + span {
                for ii in i0..i0 + span {
                    let idx = jj * l.size + ii;
                    if l.h[idx].abs() > DETAIL_EPSILON
                        || l.v[idx].abs() > DETAIL_EPSILON
                        || l.d[idx].abs() > DETAIL_EPSILON
                    {
                        return false;
                    }
                }
            }
            span *= 2;
        }
        true
    }

    fn descend(&self, out: &mut [f64], grid: usize, level: usize, i: usize, j: usize, avg: f64) {
        if level == self.levels.len() {
            out[j * grid + i] = avg;
            return;
        }
        if self.subtree_uniform(level, i, j) {
            let block = grid >> level;
            for jj in j * block..(j + 1) * block {
                for ii in i * block..(i + 1) * block {
                    out[jj * grid + ii] = avg;
                }
            }
            return;
        }
        let l = &self.levels[level];
        let idx = j * l.size + i;
        let (h, v, d) = (l.h[idx], l.v[idx], l.d[idx]);
        self.descend(out, grid, level + 1, 2 * i, 2 * j, avg + h + v + d);
        self.descend(out, grid, level + 1, 2 * i + 1, 2 * j, avg - h + v - d);
        self.descend(out, grid, level + 1, 2 * i, 2 * j + 1, avg + h - v - d);
        self.descend(out, grid, level + 1, 2 * i + 1, 2 * j + 1, avg - h - v + d);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: u32 = 0xFFFFFFFF;
    const BLACK: u32 = 0xFF000000;

    #[test]
    fn test_clipped_area_full_containment() {
        let quad = [
            PointD::new(1.0, 1.0),
            PointD::new(3.0, 1.0),
            PointD::new(3.0, 3.0),
            PointD::new(1.0, 3.0),
        ];
        let mut w = Vec::new();
        let mut t = Vec::new();
        // Cell contains the polygon entirely.
        let a = clipped_area(&quad, 0.0, 0.0, 4.0, 4.0, &mut w, &mut t);
        assert!((a.abs() - 4.0).abs() < 1e-9);
        // Cell covers the lower-left quadrant of the polygon.
        let a = clipped_area(&quad, 0.0, 0.0, 2.0, 2.0, &mut w, &mut t);
        assert!((a.abs() - 1.0).abs() < 1e-9);
        // Cell disjoint from the polygon.
        let a = clipped_area(&quad, 10.0, 10.0, 12.0, 12.0, &mut w, &mut t);
        assert_eq!(a, 0.0);
    }

    #[test]
    fn test_haar_roundtrip() {
        // Analysis followed by synthesis reproduces the grid exactly.
        let grid = 8;
        let mut psi = vec![0.0; grid * grid];
        for (k, v) in psi.iter_mut().enumerate() {
            *v = ((k * 37) % 11) as f64 / 10.0;
        }
        let p = HaarPyramid::analyze(&psi, grid);
        let mut out = vec![0.0; grid * grid];
        p.synthesize(&mut out);
        for (a, b) in psi.iter().zip(&out) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_haar_uniform_early_out() {
        let grid = 16;
        let psi = vec![1.0; grid * grid];
        let p = HaarPyramid::analyze(&psi, grid);
        assert!(p.subtree_uniform(0, 0, 0));
        let mut out = vec![0.0; grid * grid];
        p.synthesize(&mut out);
        assert!(out.iter().all(|v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_filled_quad() {
        let mut r = WaveletRasterizer::new(16, 16).unwrap();
        r.clear(BLACK);
        r.draw_polygon(
            &[2.0, 2.0, 14.0, 2.0, 14.0, 14.0, 2.0, 14.0],
            WHITE,
            FillingRule::NonZero,
            None,
        );
        assert_eq!(r.buffer().pixel(8, 8), WHITE);
        assert_eq!(r.buffer().pixel(0, 0), BLACK);
        // Boundary cells carry fractional occupancy.
        let edge = (r.buffer().pixel(2, 8) >> 16) & 0xFF;
        assert!(edge > 0, "edge {}", edge);
    }

    #[test]
    fn test_even_odd_overlap_cancels() {
        // Two coincident quads: winding 2 folds to empty under even-odd.
        let verts = [
            4.0, 4.0, 12.0, 4.0, 12.0, 12.0, 4.0, 12.0, //
            4.0, 4.0, 12.0, 4.0, 12.0, 12.0, 4.0, 12.0,
        ];
        let mut r = WaveletRasterizer::new(16, 16).unwrap();
        r.clear(BLACK);
        r.draw_polygon(&verts, WHITE, FillingRule::EvenOdd, Some(&[4, 4]));
        assert_eq!(r.buffer().pixel(8, 8), BLACK);
    }
}
