//! Dash pattern expansion.
//!
//! Walks each contour of a flattened path against an alternating
//! dash/gap pattern and emits the in-dash pieces as new open contours.
//! Even pattern indices are dashes, odd are gaps. The dash offset is
//! reduced modulo the pattern length to find the starting state; every
//! contour restarts from that state.

use crate::basics::PointD;
use crate::path_storage::PathStorage;

const LENGTH_EPSILON: f64 = 1e-12;

// ============================================================================
// Dasher
// ============================================================================

/// Expands paths into dashed paths.
#[derive(Debug, Clone)]
pub struct Dasher {
    pattern: Vec<f64>,
    offset: f64,
}

impl Dasher {
    pub fn new(pattern: &[f64], offset: f64) -> Self {
        Self {
            pattern: pattern.to_vec(),
            offset,
        }
    }

    fn pattern_length(&self) -> f64 {
        self.pattern.iter().map(|d| d.abs()).sum()
    }

    /// Initial (dash index, remaining length in that dash) for the offset.
    fn start_state(&self) -> (usize, f64) {
        let total = self.pattern_length();
        let mut rem = self.offset % total;
        if rem < 0.0 {
            rem += total;
        }
        let mut idx = 0;
        while rem >= self.pattern[idx].abs() && rem > 0.0 {
            rem -= self.pattern[idx].abs();
            idx = (idx + 1) % self.pattern.len();
        }
        (idx, self.pattern[idx].abs() - rem)
    }

    /// Produce the dashed form of `path`. An empty or zero-length pattern
    /// returns the input unchanged.
    pub fn dash(&self, path: &PathStorage) -> PathStorage {
        if self.pattern.is_empty() || self.pattern_length() <= LENGTH_EPSILON {
            return path.clone();
        }
        let mut out = PathStorage::new();
        for contour in path.contours() {
            // A closed contour is walked with its wrap segment appended.
            let mut pts: Vec<PointD> = contour.points.to_vec();
            if contour.closed {
                pts.push(pts[0]);
            }
            self.dash_contour(&pts, &mut out);
        }
        out
    }

    fn dash_contour(&self, pts: &[PointD], out: &mut PathStorage) {
        if pts.len() < 2 {
            return;
        }
        let (mut idx, mut remaining) = self.start_state();
        let mut in_dash = idx % 2 == 0;
        let mut emitting = false;

        for seg in pts.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let seg_len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
            if seg_len <= LENGTH_EPSILON {
                continue;
            }
            let mut pos = 0.0;
            while pos < seg_len - LENGTH_EPSILON {
                let take = remaining.min(seg_len - pos);
                if in_dash {
                    let t0 = pos / seg_len;
                    let t1 = (pos + take) / seg_len;
                    if !emitting {
                        out.move_to(a.x + (b.x - a.x) * t0, a.y + (b.y - a.y) * t0);
                        emitting = true;
                    }
                    out.line_to(a.x + (b.x - a.x) * t1, a.y + (b.y - a.y) * t1);
                }
                pos += take;
                remaining -= take;
                if remaining <= LENGTH_EPSILON {
                    // Advance to the next pattern entry; leaving a dash
                    // terminates the current sub-path.
                    idx = (idx + 1) % self.pattern.len();
                    remaining = self.pattern[idx].abs();
                    in_dash = idx % 2 == 0;
                    if !in_dash {
                        emitting = false;
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
