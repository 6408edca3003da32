//! Gradient paint fetchers.
//!
//! Linear, radial (two-circle), and conic gradients. Each precomputes what
//! it can at construction, maps the pixel sample center to a parameter `t`,
//! applies the extend mode, and indexes a 256-entry color LUT.

use crate::basics::{PointD, PI};
use crate::gradient_lut::{ColorLut, GradientStop};
use crate::paint::{Extend, Fetch};

const DEGENERATE_EPSILON: f64 = 1e-12;

// ============================================================================
// LinearGradient
// ============================================================================

/// Gradient along the segment p0 -> p1.
#[derive(Debug, Clone)]
pub struct LinearGradient {
    p0: PointD,
    d: PointD,
    inv_len_sq: f64,
    degenerate: bool,
    extend: Extend,
    lut: ColorLut,
}

impl LinearGradient {
    pub fn new(p0: PointD, p1: PointD, stops: &[GradientStop], extend: Extend) -> Self {
        let d = PointD::new(p1.x - p0.x, p1.y - p0.y);
        let len_sq = d.x * d.x + d.y * d.y;
        let degenerate = len_sq < DEGENERATE_EPSILON;
        Self {
            p0,
            d,
            inv_len_sq: if degenerate { 0.0 } else { 1.0 / len_sq },
            degenerate,
            extend,
            lut: ColorLut::build(stops),
        }
    }
}

impl Fetch for LinearGradient {
    fn fetch(&mut self, x: i32, y: i32) -> u32 {
        if self.degenerate {
            // Coincident endpoints: the first stop everywhere.
            return self.lut.get(0);
        }
        let px = x as f64 + 0.5 - self.p0.x;
        let py = y as f64 + 0.5 - self.p0.y;
        let t = (px * self.d.x + py * self.d.y) * self.inv_len_sq;
        self.lut.at(self.extend.apply_unit(t))
    }
}

// ============================================================================
// RadialGradient
// ============================================================================

/// Two-circle radial gradient from (c0, r0) to (c1, r1).
///
/// Solves `|p - (c0 + t*(c1-c0))| = r0 + t*(r1-r0)` for t per pixel. When
/// the quadratic degenerates it falls back to the linear root, and a
/// near-focal configuration nudges the center delta to keep the divisions
/// well-conditioned.
#[derive(Debug, Clone)]
pub struct RadialGradient {
    c0: PointD,
    r0: f64,
    dc: PointD,
    dr: f64,
    a: f64,
    linear_fallback: bool,
    extend: Extend,
    lut: ColorLut,
}

impl RadialGradient {
    pub fn new(
        c0: PointD,
        r0: f64,
        c1: PointD,
        r1: f64,
        stops: &[GradientStop],
        extend: Extend,
    ) -> Self {
        let mut dc = PointD::new(c1.x - c0.x, c1.y - c0.y);
        let dr = r1 - r0;

        // Near-focal: the end circle's edge passes (almost) through the
        // start center. Nudge the center delta off the singularity.
        let dist = (dc.x * dc.x + dc.y * dc.y).sqrt();
        if (dist - dr).abs() < 0.5 {
            dc.x *= 1.0 + 1e-6;
            dc.y *= 1.0 + 1e-6;
        }

        let a = dc.x * dc.x + dc.y * dc.y - dr * dr;
        Self {
            c0,
            r0,
            dc,
            dr,
            a,
            linear_fallback: a.abs() < DEGENERATE_EPSILON,
            extend,
            lut: ColorLut::build(stops),
        }
    }
}

impl Fetch for RadialGradient {
    fn fetch(&mut self, x: i32, y: i32) -> u32 {
        let px = x as f64 + 0.5 - self.c0.x;
        let py = y as f64 + 0.5 - self.c0.y;

        let b = px * self.dc.x + py * self.dc.y + self.r0 * self.dr;
        let c = px * px + py * py - self.r0 * self.r0;

        let t = if self.linear_fallback {
            if b.abs() < DEGENERATE_EPSILON {
                0.0
            } else {
                c / (2.0 * b)
            }
        } else {
            let disc = b * b - self.a * c;
            let root = disc.max(0.0).sqrt();
            if self.a >= 0.0 {
                (b + root) / self.a
            } else {
                (b - root) / self.a
            }
        };
        self.lut.at(self.extend.apply_unit(t))
    }
}

// ============================================================================
// ConicGradient
// ============================================================================

/// Sweep gradient around a center, starting at `angle` radians.
#[derive(Debug, Clone)]
pub struct ConicGradient {
    center: PointD,
    angle: f64,
    extend: Extend,
    lut: ColorLut,
}

impl ConicGradient {
    pub fn new(center: PointD, angle: f64, stops: &[GradientStop], extend: Extend) -> Self {
        Self {
            center,
            angle,
            extend,
            lut: ColorLut::build(stops),
        }
    }
}

impl Fetch for ConicGradient {
    fn fetch(&mut self, x: i32, y: i32) -> u32 {
        let px = x as f64 + 0.5 - self.center.x;
        let py = y as f64 + 0.5 - self.center.y;
        let mut t = (py.atan2(px) - self.angle) / (2.0 * PI);
        t -= t.floor();
        self.lut.at(self.extend.apply_unit(t))
    }
}

// ============================================================================
// Tests
// ============================================================================
