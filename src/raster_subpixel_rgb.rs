//! Distance-based subpixel rasterizer.
//!
//! Anti-aliases each color channel independently using the horizontal
//! subpixel layout of an LCD stripe: R is sampled at x + 1/6, G at
//! x + 3/6, B at x + 5/6 (all at y + 0.5). Each sample takes the signed
//! distance to the nearest edge segment (negative outside, by the filling
//! rule) and maps it through a 256-entry smoothstep table to a per-channel
//! alpha. The pixel's output alpha follows the center (G) sample.

use crate::basics::FillingRule;
use crate::color::mul_255;
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::math::calc_segment_point_sq_distance;
use crate::raster::{clipped_pixel_bounds, collect_edges, point_inside, Edge, PolygonFill};

/// Subpixel sample offsets for R, G, B.
const SUBPIXEL_X: [f64; 3] = [1.0 / 6.0, 3.0 / 6.0, 5.0 / 6.0];

/// Distance range mapped by the smoothstep table, in pixels.
const DISTANCE_RANGE: f64 = 1.0;

// ============================================================================
// SubpixelDistanceRasterizer
// ============================================================================

pub struct SubpixelDistanceRasterizer {
    fb: Framebuffer,
    lut: [u8; 256],
}

impl SubpixelDistanceRasterizer {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        let mut lut = [0u8; 256];
        for (i, e) in lut.iter_mut().enumerate() {
            let t = i as f64 / 255.0;
            let s = t * t * (3.0 - 2.0 * t);
            *e = (s * 255.0 + 0.5) as u8;
        }
        Ok(Self {
            fb: Framebuffer::new(width, height)?,
            lut,
        })
    }

    /// Signed distance at a sample point: positive inside, clamped to the
    /// table range, then smoothstep alpha.
    fn sample_alpha(&self, edges: &[Edge], x: f64, y: f64, fill_rule: FillingRule) -> u32 {
        let mut best_sq = f64::MAX;
        for e in edges {
            let d = calc_segment_point_sq_distance(e.x0, e.y0, e.x1, e.y1, x, y);
            if d < best_sq {
                best_sq = d;
            }
        }
        let mut dist = best_sq.sqrt().min(DISTANCE_RANGE);
        if !point_inside(edges, x, y, fill_rule) {
            dist = -dist;
        }
        let idx = ((dist / DISTANCE_RANGE + 1.0) * 127.5).clamp(0.0, 255.0) as usize;
        self.lut[idx] as u32
    }
}

impl PolygonFill for SubpixelDistanceRasterizer {
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

        let src_a = color >> 24;
        let src = [
            (color >> 16) & 0xFF,
            (color >> 8) & 0xFF,
            color & 0xFF,
        ];

        for y in y0..=y1 {
            let py = y as f64 + 0.5;
            for x in x0..=x1 {
                let alphas: Vec<u32> = SUBPIXEL_X
                    .iter()
                    .map(|ox| self.sample_alpha(&edges, x as f64 + ox, py, fill_rule))
                    .collect();
                if alphas.iter().all(|&a| a == 0) {
                    continue;
                }
                let dst = self.fb.pixel(x as usize, y as usize);
                let mut out = 0u32;
                // Channel-independent blend; output alpha follows G.
                for (i, shift) in [16u32, 8, 0].iter().enumerate() {
                    let a = mul_255(alphas[i], src_a);
                    let d = (dst >> shift) & 0xFF;
                    let c = (src[i] * a + d * (255 - a) + 127) / 255;
                    out |= c << shift;
                }
                let a_mid = mul_255(alphas[1], src_a);
                let da = dst >> 24;
                let oa = a_mid + mul_255(da, 255 - a_mid);
                out |= oa << 24;
                self.fb.set_pixel(x as usize, y as usize, out);
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
    fn test_deep_interior_and_exterior() {
        let mut r = SubpixelDistanceRasterizer::new(16, 16).unwrap();
        r.clear(BLACK);
        r.draw_polygon(
            &[2.0, 2.0, 14.0, 2.0, 14.0, 14.0, 2.0, 14.0],
            WHITE,
            FillingRule::NonZero,
            None,
        );
        assert_eq!(r.buffer().pixel(8, 8), WHITE);
        assert_eq!(r.buffer().pixel(0, 0), BLACK);
    }

    #[test]
    fn test_edge_pixels_are_intermediate() {
        let mut r = SubpixelDistanceRasterizer::new(16, 16).unwrap();
        r.clear(BLACK);
        r.draw_polygon(
            &[2.5, 2.0, 13.5, 2.0, 13.5, 14.0, 2.5, 14.0],
            WHITE,
            FillingRule::NonZero,
            None,
        );
        let p = r.buffer().pixel(2, 8);
        let ch = (p >> 16) & 0xFF;
        assert!(ch > 0 && ch < 255, "channel {}", ch);
    }

    #[test]
    fn test_subpixel_channels_differ_on_vertical_edge() {
        // A vertical edge at x = 8.5 splits the R/G/B taps of pixel 8.
        let mut r = SubpixelDistanceRasterizer::new(16, 16).unwrap();
        r.clear(BLACK);
        r.draw_polygon(
            &[2.0, 2.0, 8.5, 2.0, 8.5, 14.0, 2.0, 14.0],
            WHITE,
            FillingRule::NonZero,
            None,
        );
        let p = r.buffer().pixel(8, 8);
        let red = (p >> 16) & 0xFF;
        let blue = p & 0xFF;
        // The R tap (x=8.17) sits deeper inside than the B tap (x=8.83).
        assert!(red > blue, "r={} b={}", red, blue);
    }

    #[test]
    fn test_respects_even_odd_hole() {
        let verts = [
            2.0, 2.0, 14.0, 2.0, 14.0, 14.0, 2.0, 14.0, //
            5.0, 5.0, 11.0, 5.0, 11.0, 11.0, 5.0, 11.0,
        ];
        let mut r = SubpixelDistanceRasterizer::new(16, 16).unwrap();
        r.clear(BLACK);
        r.draw_polygon(&verts, WHITE, FillingRule::EvenOdd, Some(&[4, 4]));
        assert_eq!(r.buffer().pixel(8, 8), BLACK);
        assert_eq!(r.buffer().pixel(3, 8), WHITE);
    }
}
