//! Quantized coverage-signature rasterizer.
//!
//! Each pixel is probed on a 3 x 2 sample grid: two sub-scanlines at
//! y + 0.25 and y + 0.75, three subpixels at x + 1/6, 3/6, 5/6. Walking a
//! sub-scanline left to right, the winding (or even-odd parity) state is
//! prefix-integrated across the sorted edge crossings, so each sample costs
//! an advance of one crossing pointer. The six inside bits form a signature
//! indexing a 64-entry intensity table.

use crate::basics::FillingRule;
use crate::comp_op::{apply_coverage, blend_src_over};
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::raster::{
    clipped_pixel_bounds, collect_edges, scanline_crossings, Edge, PolygonFill,
};

const SUBPIXEL_X: [f64; 3] = [1.0 / 6.0, 3.0 / 6.0, 5.0 / 6.0];
const SUB_SCANLINES: [f64; 2] = [0.25, 0.75];

// ============================================================================
// SignatureRasterizer
// ============================================================================

pub struct SignatureRasterizer {
    fb: Framebuffer,
    lut: [u8; 64],
}

impl SignatureRasterizer {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        let mut lut = [0u8; 64];
        for (sig, e) in lut.iter_mut().enumerate() {
            *e = ((sig.count_ones() * 255 + 3) / 6) as u8;
        }
        Ok(Self {
            fb: Framebuffer::new(width, height)?,
            lut,
        })
    }
}

/// Set the inside bits for one sub-scanline into `sigs`, walking the
/// sorted crossings once.
fn integrate_subline(
    crossings: &[(f64, i32)],
    fill_rule: FillingRule,
    x0: i32,
    x1: i32,
    bit_base: u32,
    sigs: &mut [u8],
) {
    let mut winding = 0_i32;
    let mut next = 0_usize;
    for x in x0..=x1 {
        for (s, ox) in SUBPIXEL_X.iter().enumerate() {
            let sx = x as f64 + ox;
            while next < crossings.len() && crossings[next].0 < sx {
                winding += crossings[next].1;
                next += 1;
            }
            if fill_rule.is_inside(winding) {
                sigs[(x - x0) as usize] |= 1 << (bit_base + s as u32);
            }
        }
    }
}

impl PolygonFill for SignatureRasterizer {
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
        let Some((x0, y0, x1, y1)) =
            clipped_pixel_bounds(vertices, self.fb.width(), self.fb.height())
        else {
            return;
        };

        let mut sigs = vec![0u8; (x1 - x0 + 1) as usize];
        let mut crossings = Vec::new();

        for y in y0..=y1 {
            sigs.fill(0);
            for (row, oy) in SUB_SCANLINES.iter().enumerate() {
                scanline_crossings(&edges, y as f64 + oy, &mut crossings);
                integrate_subline(&crossings, fill_rule, x0, x1, row as u32 * 3, &mut sigs);
            }
            for (i, &sig) in sigs.iter().enumerate() {
                if sig == 0 {
                    continue;
                }
                let alpha = self.lut[sig as usize] as u32;
                let src = apply_coverage(color, alpha);
                let (px, py) = ((x0 + i as i32) as usize, y as usize);
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
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: u32 = 0xFFFFFFFF;
    const BLACK: u32 = 0xFF000000;

    #[test]
    fn test_lut_endpoints() {
        let r = SignatureRasterizer::new(2, 2).unwrap();
        assert_eq!(r.lut[0], 0);
        assert_eq!(r.lut[63], 255);
        // Half the samples set: about half intensity.
        assert_eq!(r.lut[0b000111], ((3u32 * 255 + 3) / 6) as u8);
    }

    #[test]
    fn test_full_frame_quad() {
        let mut r = SignatureRasterizer::new(4, 4).unwrap();
        r.clear(BLACK);
        r.draw_polygon(
            &[0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0],
            WHITE,
            FillingRule::NonZero,
            None,
        );
        for px in r.buffer().data() {
            assert_eq!(*px, WHITE);
        }
    }

    #[test]
    fn test_half_covered_column() {
        let mut r = SignatureRasterizer::new(4, 4).unwrap();
        r.clear(BLACK);
        r.draw_polygon(
            &[0.0, 0.0, 2.5, 0.0, 2.5, 4.0, 0.0, 4.0],
            WHITE,
            FillingRule::NonZero,
            None,
        );
        // Samples at 2+1/6 and 2+1/2 are inside, 2+5/6 is not: 4 of 6 bits.
        let ch = (r.buffer().pixel(2, 1) >> 16) & 0xFF;
        assert_eq!(ch, ((4 * 255 + 3) / 6));
    }

    #[test]
    fn test_even_odd_star_hole() {
        let mut star = Vec::new();
        let (cx, cy, rad) = (16.0, 16.0, 14.0);
        for i in 0..5 {
            let a = -std::f64::consts::FRAC_PI_2 + i as f64 * 4.0 * std::f64::consts::PI / 5.0;
            star.push(cx + rad * a.cos());
            star.push(cy + rad * a.sin());
        }
        let mut eo = SignatureRasterizer::new(32, 32).unwrap();
        eo.clear(BLACK);
        eo.draw_polygon(&star, WHITE, FillingRule::EvenOdd, Some(&[5]));
        assert_eq!(eo.buffer().pixel(16, 16), BLACK);

        let mut nz = SignatureRasterizer::new(32, 32).unwrap();
        nz.clear(BLACK);
        nz.draw_polygon(&star, WHITE, FillingRule::NonZero, Some(&[5]));
        assert_eq!(nz.buffer().pixel(16, 16), WHITE);
    }
}
