//! Geometric math utilities.
//!
//! Distances, cross products, point/segment queries, and line intersection —
//! the helpers shared by the stroker and the distance-based fill engines.

// ============================================================================
// Constants
// ============================================================================

/// Coinciding points maximal distance (epsilon).
pub const VERTEX_DIST_EPSILON: f64 = 1e-14;

// ============================================================================
// Cross product and point-in-triangle
// ============================================================================

/// Cross product of vectors (x2-x1, y2-y1) and (x-x2, y-y2).
/// The sign indicates which side of the line (x1,y1)→(x2,y2) the point (x,y) is on.
#[inline]
pub fn cross_product(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    (x - x2) * (y2 - y1) - (y - y2) * (x2 - x1)
}

/// Test if point (x, y) is inside triangle (x1,y1), (x2,y2), (x3,y3).
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn point_in_triangle(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    x: f64,
    y: f64,
) -> bool {
    let cp1 = cross_product(x1, y1, x2, y2, x, y) < 0.0;
    let cp2 = cross_product(x2, y2, x3, y3, x, y) < 0.0;
    let cp3 = cross_product(x3, y3, x1, y1, x, y) < 0.0;
    cp1 == cp2 && cp2 == cp3 && cp3 == cp1
}

// ============================================================================
// Distance calculations
// ============================================================================

/// Squared distance between two points.
#[inline]
pub fn calc_sq_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy
}

/// Projection parameter of point (x, y) onto segment (x1,y1)→(x2,y2).
///
/// 0 at the segment start, 1 at the end; outside [0,1] when the projection
/// falls beyond an endpoint. Returns 0 for a degenerate segment.
#[inline]
pub fn calc_segment_point_u(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len_sq = dx * dx + dy * dy;
    if len_sq < VERTEX_DIST_EPSILON {
        return 0.0;
    }
    ((x - x1) * dx + (y - y1) * dy) / len_sq
}

/// Squared distance from point (x, y) to segment (x1,y1)→(x2,y2),
/// using a precomputed projection parameter `u`.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn calc_segment_point_sq_distance_with_u(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x: f64,
    y: f64,
    u: f64,
) -> f64 {
    if u <= 0.0 {
        calc_sq_distance(x, y, x1, y1)
    } else if u >= 1.0 {
        calc_sq_distance(x, y, x2, y2)
    } else {
        calc_sq_distance(x, y, x1 + u * (x2 - x1), y1 + u * (y2 - y1))
    }
}

/// Squared distance from point (x, y) to segment (x1,y1)→(x2,y2).
#[inline]
pub fn calc_segment_point_sq_distance(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    let u = calc_segment_point_u(x1, y1, x2, y2, x, y);
    calc_segment_point_sq_distance_with_u(x1, y1, x2, y2, x, y, u)
}

// ============================================================================
// Polygon area
// ============================================================================

/// Signed area of a polygon given as (x, y) pairs (shoelace formula).
/// Positive when the vertex order is counter-clockwise in a y-up frame.
pub fn calc_polygon_area(pts: &[crate::basics::PointD]) -> f64 {
    if pts.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut xp = pts[pts.len() - 1].x;
    let mut yp = pts[pts.len() - 1].y;
    for p in pts {
        sum += xp * p.y - yp * p.x;
        xp = p.x;
        yp = p.y;
    }
    sum * 0.5
}

// ============================================================================
// Tests
// ============================================================================
