//! Stroke expansion.
//!
//! Converts a flattened path into the polygonal outline of its stroke by
//! offsetting every contour on both sides by half the stroke width along
//! the unit left normal of each segment. Open contours produce one closed
//! outline with caps at both ends; closed contours produce two polygons
//! with opposite winding whose non-zero fill is the annular stroke.
//!
//! Joins are resolved per vertex from the inbound and outbound segment
//! normals: the concave side always takes the miter intersection, the
//! convex side takes the configured join, falling back from miter when
//! the miter length exceeds the limit. Degenerate segments inherit the
//! previous valid normal; opposed normals (a U-turn) insert the two
//! offset vertices directly.

use crate::basics::{PointD, PI};
use crate::path_storage::PathStorage;

const NORMAL_EPSILON: f64 = 1e-12;
/// Round joins and caps are subdivided to roughly this angle per step.
const ARC_STEP: f64 = PI / 4.0;

// ============================================================================
// Options
// ============================================================================

/// Line cap style for open contour endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Square,
    Round,
    RoundRev,
    Triangle,
    TriangleRev,
}

/// Line join style at path corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Bevel,
    #[default]
    MiterBevel,
    MiterRound,
    MiterClip,
    Round,
}

/// Stroke expansion parameters.
#[derive(Debug, Clone, Copy)]
pub struct StrokeOptions {
    pub width: f64,
    pub start_cap: LineCap,
    pub end_cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            start_cap: LineCap::Butt,
            end_cap: LineCap::Butt,
            join: LineJoin::MiterBevel,
            miter_limit: 4.0,
        }
    }
}

// ============================================================================
// Stroker
// ============================================================================

/// Expands paths into stroke outline polygons.
#[derive(Debug, Clone)]
pub struct Stroker {
    options: StrokeOptions,
}

impl Stroker {
    pub fn new(options: StrokeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StrokeOptions {
        &self.options
    }

    /// Produce the stroke outline of `path`. A non-positive width yields an
    /// empty path.
    pub fn stroke(&self, path: &PathStorage) -> PathStorage {
        let mut out = PathStorage::new();
        if self.options.width <= 0.0 {
            return out;
        }
        let hw = self.options.width * 0.5;
        for contour in path.contours() {
            if contour.closed && contour.points.len() >= 3 {
                self.stroke_closed(contour.points, hw, &mut out);
            } else if contour.points.len() >= 2 {
                self.stroke_open(contour.points, hw, &mut out);
            }
        }
        out
    }

    // ========================================================================
    // Contour walks
    // ========================================================================

    fn stroke_open(&self, pts: &[PointD], hw: f64, out: &mut PathStorage) {
        let Some(normals) = segment_normals(pts, false) else {
            return;
        };
        let n = pts.len();

        // Forward side.
        let first = offset(pts[0], normals[0], hw);
        out.move_to(first.x, first.y);
        for i in 1..n - 1 {
            self.emit_join(out, pts[i], normals[i - 1], normals[i], hw);
        }
        emit(out, offset(pts[n - 1], normals[n - 2], hw));

        // End cap.
        let t_end = tangent_of(normals[n - 2]);
        self.emit_cap(out, self.options.end_cap, pts[n - 1], normals[n - 2], t_end, hw);

        // Backward side: the reversed chain with recomputed (negated) normals.
        let rev: Vec<PointD> = pts.iter().rev().copied().collect();
        let Some(rev_normals) = segment_normals(&rev, false) else {
            out.close();
            return;
        };
        emit(out, offset(rev[0], rev_normals[0], hw));
        for i in 1..n - 1 {
            self.emit_join(out, rev[i], rev_normals[i - 1], rev_normals[i], hw);
        }
        emit(out, offset(rev[n - 1], rev_normals[n - 2], hw));

        // Start cap, leading back to the outline's first vertex.
        let t_start = tangent_of(rev_normals[n - 2]);
        self.emit_cap(
            out,
            self.options.start_cap,
            pts[0],
            rev_normals[n - 2],
            t_start,
            hw,
        );
        out.close();
    }

    fn stroke_closed(&self, pts: &[PointD], hw: f64, out: &mut PathStorage) {
        self.stroke_ring(pts, hw, out);
        let rev: Vec<PointD> = pts.iter().rev().copied().collect();
        self.stroke_ring(&rev, hw, out);
    }

    /// One side of a closed contour: a join at every vertex, wrapped.
    fn stroke_ring(&self, pts: &[PointD], hw: f64, out: &mut PathStorage) {
        let Some(normals) = segment_normals(pts, true) else {
            return;
        };
        let n = pts.len();
        let mut started = false;
        for i in 0..n {
            let np = normals[(i + n - 1) % n];
            let nn = normals[i];
            let mut pts_out = Vec::new();
            self.join_points(&mut pts_out, pts[i], np, nn, hw);
            for p in pts_out {
                if !started {
                    out.move_to(p.x, p.y);
                    started = true;
                } else {
                    out.line_to(p.x, p.y);
                }
            }
        }
        out.close();
    }

    // ========================================================================
    // Joins
    // ========================================================================

    fn emit_join(&self, out: &mut PathStorage, v: PointD, np: PointD, nn: PointD, hw: f64) {
        let mut pts = Vec::new();
        self.join_points(&mut pts, v, np, nn, hw);
        for p in pts {
            emit(out, p);
        }
    }

    /// Join vertices at `v` between inbound normal `np` and outbound `nn`,
    /// both pointing toward the side being walked.
    fn join_points(&self, pts: &mut Vec<PointD>, v: PointD, np: PointD, nn: PointD, hw: f64) {
        let cross = np.x * nn.y - np.y * nn.x;
        let sx = np.x + nn.x;
        let sy = np.y + nn.y;
        let sum_sq = sx * sx + sy * sy;

        if sum_sq < NORMAL_EPSILON {
            // Opposed normals: a U-turn. Insert both offset vertices, with a
            // half-circle between them for round joins.
            if self.options.join == LineJoin::Round {
                self.arc_points(pts, v, np, nn, hw, cross >= 0.0);
            } else {
                pts.push(offset(v, np, hw));
                pts.push(offset(v, nn, hw));
            }
            return;
        }

        // Offset-line intersection: k . np = k . nn = hw.
        let kx = 2.0 * sx * hw / sum_sq;
        let ky = 2.0 * sy * hw / sum_sq;

        if cross >= 0.0 {
            // Concave on this side: always the miter intersection.
            pts.push(PointD::new(v.x + kx, v.y + ky));
            return;
        }

        // Convex side.
        let limit = self.options.miter_limit.max(1.0) * hw;
        let miter_ok = kx * kx + ky * ky <= limit * limit;

        match self.options.join {
            LineJoin::Round => {
                self.arc_points(pts, v, np, nn, hw, false);
            }
            LineJoin::Bevel => {
                pts.push(offset(v, np, hw));
                pts.push(offset(v, nn, hw));
            }
            LineJoin::MiterBevel => {
                if miter_ok {
                    pts.push(PointD::new(v.x + kx, v.y + ky));
                } else {
                    pts.push(offset(v, np, hw));
                    pts.push(offset(v, nn, hw));
                }
            }
            LineJoin::MiterRound => {
                if miter_ok {
                    pts.push(PointD::new(v.x + kx, v.y + ky));
                } else {
                    self.arc_points(pts, v, np, nn, hw, false);
                }
            }
            LineJoin::MiterClip => {
                if miter_ok {
                    pts.push(PointD::new(v.x + kx, v.y + ky));
                } else {
                    self.clip_points(pts, v, np, nn, kx, ky, hw, limit);
                }
            }
        }
    }

    /// Miter clipped at the limit: the two offset lines are cut by the line
    /// perpendicular to the miter direction at the limit distance.
    #[allow(clippy::too_many_arguments)]
    fn clip_points(
        &self,
        pts: &mut Vec<PointD>,
        v: PointD,
        np: PointD,
        nn: PointD,
        kx: f64,
        ky: f64,
        hw: f64,
        limit: f64,
    ) {
        let k_len = (kx * kx + ky * ky).sqrt();
        let mx = kx / k_len;
        let my = ky / k_len;
        let p1 = offset(v, np, hw);
        let p2 = offset(v, nn, hw);
        let tip = PointD::new(v.x + kx, v.y + ky);

        let clip_toward = |from: PointD| -> PointD {
            let d_from = (from.x - v.x) * mx + (from.y - v.y) * my;
            let d_tip = k_len;
            let span = d_tip - d_from;
            if span.abs() < NORMAL_EPSILON {
                return from;
            }
            let u = ((limit - d_from) / span).clamp(0.0, 1.0);
            PointD::new(from.x + u * (tip.x - from.x), from.y + u * (tip.y - from.y))
        };

        pts.push(p1);
        pts.push(clip_toward(p1));
        pts.push(clip_toward(p2));
        pts.push(p2);
    }

    /// Arc from the `np` offset to the `nn` offset around `v`, subdivided to
    /// about 45 degrees per step.
    fn arc_points(
        &self,
        pts: &mut Vec<PointD>,
        v: PointD,
        np: PointD,
        nn: PointD,
        hw: f64,
        ccw: bool,
    ) {
        let a1 = np.y.atan2(np.x);
        let a2 = nn.y.atan2(nn.x);
        let mut sweep = a2 - a1;
        if ccw {
            while sweep <= 0.0 {
                sweep += 2.0 * PI;
            }
        } else {
            while sweep >= 0.0 {
                sweep -= 2.0 * PI;
            }
        }
        let steps = (sweep.abs() / ARC_STEP).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let a = a1 + sweep * i as f64 / steps as f64;
            pts.push(PointD::new(v.x + hw * a.cos(), v.y + hw * a.sin()));
        }
    }

    // ========================================================================
    // Caps
    // ========================================================================

    /// Cap at endpoint `v`: runs from `v + hw*n` to `v - hw*n`, with `t` the
    /// outward unit tangent.
    fn emit_cap(
        &self,
        out: &mut PathStorage,
        cap: LineCap,
        v: PointD,
        n: PointD,
        t: PointD,
        hw: f64,
    ) {
        let a = offset(v, n, hw);
        let b = PointD::new(v.x - n.x * hw, v.y - n.y * hw);
        match cap {
            LineCap::Butt => {
                emit(out, a);
                emit(out, b);
            }
            LineCap::Square => {
                emit(out, PointD::new(a.x + t.x * hw, a.y + t.y * hw));
                emit(out, PointD::new(b.x + t.x * hw, b.y + t.y * hw));
            }
            LineCap::Round | LineCap::RoundRev => {
                // With t the clockwise rotation of n, the clockwise sweep
                // passes through v + hw*t (the outward apex); the reverse
                // cap sweeps the other way, notching inward through -t.
                let ccw = cap == LineCap::RoundRev;
                let mut pts = Vec::new();
                self.arc_points(&mut pts, v, n, PointD::new(-n.x, -n.y), hw, ccw);
                for p in pts {
                    emit(out, p);
                }
            }
            LineCap::Triangle => {
                emit(out, a);
                emit(out, PointD::new(v.x + t.x * hw, v.y + t.y * hw));
                emit(out, b);
            }
            LineCap::TriangleRev => {
                emit(out, a);
                emit(out, PointD::new(v.x - t.x * hw, v.y - t.y * hw));
                emit(out, b);
            }
        }
    }
}

// ============================================================================
// Geometry helpers
// ============================================================================

#[inline]
fn offset(v: PointD, n: PointD, hw: f64) -> PointD {
    PointD::new(v.x + n.x * hw, v.y + n.y * hw)
}

#[inline]
fn emit(out: &mut PathStorage, p: PointD) {
    out.line_to(p.x, p.y);
}

/// Segment direction reconstructed from its left normal.
#[inline]
fn tangent_of(n: PointD) -> PointD {
    // Left normal of direction (dx, dy) is (-dy, dx); invert the rotation.
    PointD::new(n.y, -n.x)
}

/// Unit left normals per segment. Degenerate segments inherit the previous
/// valid normal (or the first valid one, for a degenerate prefix). Returns
/// `None` when every segment is degenerate.
fn segment_normals(pts: &[PointD], closed: bool) -> Option<Vec<PointD>> {
    let nseg = if closed { pts.len() } else { pts.len() - 1 };
    let mut normals = vec![None::<PointD>; nseg];
    let mut any = false;
    for i in 0..nseg {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq > NORMAL_EPSILON {
            let len = len_sq.sqrt();
            normals[i] = Some(PointD::new(-dy / len, dx / len));
            any = true;
        }
    }
    if !any {
        return None;
    }
    let first_valid = normals.iter().flatten().next().copied().unwrap();
    let mut out = Vec::with_capacity(nseg);
    let mut prev = first_valid;
    for n in normals {
        let n = n.unwrap_or(prev);
        out.push(n);
        prev = n;
    }
    Some(out)
}

// ============================================================================
// Tests
// ============================================================================
