//! Pure geometry helpers for quadrilateral shapes.
//!
//! Everything in this module is a stateless function over `kurbo` points;
//! derived shape fields (sides, angles, area) are computed from these and
//! never stored authoritatively.

use kurbo::{Point, Rect};
use std::f64::consts::PI;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Interior angle at `vertex` formed with its two neighbours, via the law of
/// cosines. The cosine argument is clamped to `[-1, 1]` so floating-point
/// overshoot from near-collinear input never produces a domain error. A
/// zero-length adjacent side yields an angle of 0.
pub fn interior_angle(prev: Point, vertex: Point, next: Point) -> f64 {
    let ab = distance(vertex, prev);
    let bc = distance(vertex, next);
    let ac = distance(prev, next);
    let denom = 2.0 * ab * bc;
    if denom <= f64::EPSILON {
        return 0.0;
    }
    let val = (ab * ab + bc * bc - ac * ac) / denom;
    val.clamp(-1.0, 1.0).acos()
}

/// Signed shoelace area of a polygon. Positive for counter-clockwise winding
/// in a y-up frame (negative for the canvas y-down frame).
///
/// Wraps around the vertex list, so it accepts both open rings and rings
/// closed with a duplicated endpoint (the duplicate pair contributes zero).
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        area += p.x * q.y - q.x * p.y;
    }
    area / 2.0
}

/// Polygon area: absolute shoelace value, rounded to the nearest unit.
pub fn polygon_area(points: &[Point]) -> f64 {
    signed_area(points).abs().round()
}

/// Axis-aligned bounding box of a point list.
pub fn bounds(points: &[Point]) -> Rect {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if points.is_empty() {
        return Rect::ZERO;
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Centroid used for label placement: the center of the bounding box.
pub fn label_centroid(points: &[Point]) -> Point {
    bounds(points).center()
}

/// Format an angle in radians as a multiple of π.
///
/// Snaps to the recognizable values `π`, `π/2` and `2π` (within 0.001 on the
/// π-ratio), otherwise renders as e.g. `0.75π`.
pub fn format_radian(rad: f64) -> String {
    let ratio = rad / PI;
    if (ratio - 1.0).abs() < 0.001 {
        return "π".to_string();
    }
    if (ratio - 0.5).abs() < 0.001 {
        return "π/2".to_string();
    }
    if (ratio - 2.0).abs() < 0.001 {
        return "2π".to_string();
    }
    format!("{:.2}π", ratio)
}

/// Anchor position for a side label: the side midpoint pushed `offset` units
/// along the outward-facing normal. The normal sign is chosen by a
/// dot-product test against the centroid so the label always sits outside
/// the polygon.
pub fn side_label_pos(a: Point, b: Point, centroid: Point, offset: f64) -> Point {
    let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    let mut nx = -(b.y - a.y);
    let mut ny = b.x - a.x;
    if nx * (mid.x - centroid.x) + ny * (mid.y - centroid.y) < 0.0 {
        nx = -nx;
        ny = -ny;
    }
    let len = (nx * nx + ny * ny).sqrt();
    let scale = if len > 0.0 { offset / len } else { 0.0 };
    Point::new(mid.x + nx * scale, mid.y + ny * scale)
}

/// Label offset for a side: larger for near-vertical sides, where the label
/// text would otherwise overlap the edge.
pub fn side_label_offset(a: Point, b: Point) -> f64 {
    if (b.y - a.y).abs() > (b.x - a.x).abs() {
        35.0
    } else {
        20.0
    }
}

/// Anchor position for a vertex label: the vertex pushed `offset` units
/// along the centroid→vertex direction. A positive offset places the label
/// outside the polygon, a negative one inside (the degree and radian labels
/// sit on opposite sides of the vertex).
pub fn vertex_label_pos(vertex: Point, centroid: Point, offset: f64) -> Point {
    let dx = vertex.x - centroid.x;
    let dy = vertex.y - centroid.y;
    let len = (dx * dx + dy * dy).sqrt();
    let scale = if len > 0.0 { offset / len } else { 0.0 };
    Point::new(vertex.x + dx * scale, vertex.y + dy * scale)
}

/// Point-in-polygon test (ray casting). Used for hit testing against the
/// shape outline; boundary points count as inside.
pub fn polygon_contains(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let pi = points[i];
        let pj = points[j];
        if (pi.y > p.y) != (pj.y > p.y)
            && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
