//! Path container and builder.
//!
//! A path is a flat vertex array grouped into contours, each with a vertex
//! count and a closed/open flag. The builder surface (`move_to`, `line_to`,
//! `quad_to`, `cubic_to`, `close`) maintains two invariants on insertion:
//! consecutive duplicate points are collapsed, and contours that end up with
//! fewer than two points are dropped.
//!
//! Curves are flattened at insertion time through [`crate::curves`]; the
//! squared flatness tolerance is configurable per path.

use crate::basics::{PointD, RectD};
use crate::curves::{flatten_cubic, flatten_quad, DEFAULT_FLATNESS_SQ};

// ============================================================================
// ContourRef
// ============================================================================

/// Borrowed view of one contour: its points and whether it is closed.
#[derive(Debug, Clone, Copy)]
pub struct ContourRef<'a> {
    pub points: &'a [PointD],
    pub closed: bool,
}

// ============================================================================
// PathStorage
// ============================================================================

/// Mutable container of 2D vertices grouped into contours.
#[derive(Debug, Clone)]
pub struct PathStorage {
    points: Vec<PointD>,
    counts: Vec<usize>,
    closed: Vec<bool>,
    contour_start: usize,
    in_contour: bool,
    tolerance_sq: f64,
}

impl PathStorage {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            counts: Vec::new(),
            closed: Vec::new(),
            contour_start: 0,
            in_contour: false,
            tolerance_sq: DEFAULT_FLATNESS_SQ,
        }
    }

    /// Set the squared flatness tolerance used when flattening curves.
    pub fn set_approximation_tolerance(&mut self, tolerance_sq: f64) {
        self.tolerance_sq = tolerance_sq;
    }

    pub fn approximation_tolerance(&self) -> f64 {
        self.tolerance_sq
    }

    /// Remove all contours and vertices.
    pub fn remove_all(&mut self) {
        self.points.clear();
        self.counts.clear();
        self.closed.clear();
        self.contour_start = 0;
        self.in_contour = false;
    }

    // ========================================================================
    // Builder surface
    // ========================================================================

    /// Start a new contour at (x, y).
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.finish_contour(false);
        self.contour_start = self.points.len();
        self.in_contour = true;
        self.points.push(PointD::new(x, y));
    }

    /// Append a vertex to the current contour. Exact duplicates of the last
    /// point are discarded. Without a current contour this starts one.
    pub fn line_to(&mut self, x: f64, y: f64) {
        if !self.in_contour {
            self.move_to(x, y);
            return;
        }
        if let Some(last) = self.points.last() {
            if last.x == x && last.y == y {
                return;
            }
        }
        self.points.push(PointD::new(x, y));
    }

    /// Append a quadratic Bezier from the current point, flattened to line
    /// segments. Without a current contour this degenerates to `move_to`
    /// of the end point.
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        if !self.in_contour {
            self.move_to(x, y);
            return;
        }
        let p0 = self.points[self.points.len() - 1];
        let tol = self.tolerance_sq;
        let mut pts = Vec::new();
        flatten_quad(p0.x, p0.y, cx, cy, x, y, tol, &mut |px, py| {
            pts.push((px, py))
        });
        for (px, py) in pts {
            self.line_to(px, py);
        }
    }

    /// Append a cubic Bezier from the current point, flattened to line
    /// segments. Without a current contour this degenerates to `move_to`
    /// of the end point.
    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        if !self.in_contour {
            self.move_to(x, y);
            return;
        }
        let p0 = self.points[self.points.len() - 1];
        let tol = self.tolerance_sq;
        let mut pts = Vec::new();
        flatten_cubic(p0.x, p0.y, c1x, c1y, c2x, c2y, x, y, tol, &mut |px, py| {
            pts.push((px, py))
        });
        for (px, py) in pts {
            self.line_to(px, py);
        }
    }

    /// Mark the current contour closed and finish it. Contours with fewer
    /// than two points are dropped.
    pub fn close(&mut self) {
        self.finish_contour(true);
    }

    fn finish_contour(&mut self, close: bool) {
        if !self.in_contour {
            return;
        }
        let count = self.points.len() - self.contour_start;
        if count < 2 {
            self.points.truncate(self.contour_start);
        } else {
            self.counts.push(count);
            self.closed.push(close);
        }
        self.in_contour = false;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Total number of stored vertices, including the in-progress contour.
    pub fn total_vertices(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contour_count() == 0
    }

    /// Number of contours, counting an in-progress contour with >= 2 points.
    pub fn contour_count(&self) -> usize {
        self.counts.len() + self.pending_len().min(1)
    }

    fn pending_len(&self) -> usize {
        if self.in_contour && self.points.len() - self.contour_start >= 2 {
            1
        } else {
            0
        }
    }

    /// Iterate over all contours. An in-progress contour with >= 2 points is
    /// included as open.
    pub fn contours(&self) -> impl Iterator<Item = ContourRef<'_>> {
        let mut out = Vec::with_capacity(self.counts.len() + 1);
        let mut start = 0usize;
        for (i, &n) in self.counts.iter().enumerate() {
            out.push(ContourRef {
                points: &self.points[start..start + n],
                closed: self.closed[i],
            });
            start += n;
        }
        if self.pending_len() > 0 {
            out.push(ContourRef {
                points: &self.points[self.contour_start..],
                closed: false,
            });
        }
        out.into_iter()
    }

    /// Flatten into the polygon-fill input form: a flat `[x0,y0, x1,y1, ...]`
    /// array plus per-contour vertex counts.
    pub fn to_polygon(&self) -> (Vec<f64>, Vec<usize>) {
        let mut verts = Vec::with_capacity(self.points.len() * 2);
        let mut counts = Vec::with_capacity(self.counts.len() + 1);
        for c in self.contours() {
            counts.push(c.points.len());
            for p in c.points {
                verts.push(p.x);
                verts.push(p.y);
            }
        }
        (verts, counts)
    }

    /// Axis-aligned bounds over all contour vertices.
    pub fn bounding_rect(&self) -> Option<RectD> {
        let mut it = self.contours().flat_map(|c| c.points.iter().copied());
        let first = it.next()?;
        let mut r = RectD::new(first.x, first.y, first.x, first.y);
        for p in it {
            if p.x < r.x1 {
                r.x1 = p.x;
            }
            if p.y < r.y1 {
                r.y1 = p.y;
            }
            if p.x > r.x2 {
                r.x2 = p.x;
            }
            if p.y > r.y2 {
                r.y2 = p.y;
            }
        }
        Some(r)
    }
}

impl Default for PathStorage {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
