//! Pairwise polygon intersection engine.
//!
//! Winding normalization and ring flattening happen here; the raw overlap
//! rings come from the `geo` boolean-ops primitive. Everything is computed
//! fresh from the current shape set on every call; intersections are never
//! stored or patched.

use crate::geometry;
use crate::shape::{Intersection, Shape};
use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};
use kurbo::Point;

/// Normalize a polygon into a closed ring with counter-clockwise winding:
/// append the first point if the ring is open, reverse the order if the
/// signed area is negative.
pub fn normalize_ring(points: &[Point]) -> Vec<Point> {
    let mut ring = points.to_vec();
    if !ring.is_empty() && ring.first() != ring.last() {
        let first = ring[0];
        ring.push(first);
    }
    if geometry::signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    ring
}

fn to_polygon(ring: &[Point]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = ring.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    Polygon::new(LineString::from(coords), vec![])
}

/// Intersect two polygons given as point rings in the same coordinate
/// frame. Returns zero or more overlap rings (open, closing duplicate
/// stripped); an empty result means no overlap and is a normal outcome.
pub fn intersect_pair(a: &[Point], b: &[Point]) -> Vec<Vec<Point>> {
    if a.len() < 3 || b.len() < 3 {
        return Vec::new();
    }
    let poly_a = to_polygon(&normalize_ring(a));
    let poly_b = to_polygon(&normalize_ring(b));
    let result: MultiPolygon<f64> = poly_a.intersection(&poly_b);

    let mut rings = Vec::new();
    for polygon in result {
        let mut points: Vec<Point> = polygon
            .exterior()
            .coords()
            .map(|c| Point::new(c.x, c.y))
            .collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() >= 3 {
            rings.push(points);
        }
    }
    rings
}

/// Compute the overlap entities for every unordered shape pair, over
/// canvas-absolute coordinates. One [`Intersection`] per returned ring;
/// non-convex overlap configurations may yield several disjoint rings for a
/// single pair.
///
/// O(n²) pair enumeration, fine for the tens of shapes an interactive
/// canvas holds.
pub fn all_intersections(shapes: &[Shape]) -> Vec<Intersection> {
    let mut results = Vec::new();
    for i in 0..shapes.len() {
        for j in (i + 1)..shapes.len() {
            let a = &shapes[i];
            let b = &shapes[j];
            let rings = intersect_pair(&a.absolute_points(), &b.absolute_points());
            for (ring_index, ring) in rings.into_iter().enumerate() {
                results.push(Intersection::from_ring(a, b, ring_index, ring));
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use std::f64::consts::PI;

    fn shape_at(x: f64, y: f64, w: f64, h: f64, label: &str) -> Shape {
        Shape::from_gesture(Rect::new(x, y, x + w, y + h), label.to_string())
    }

    #[test]
    fn test_normalize_closes_and_orients() {
        let open = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ];
        let ring = normalize_ring(&open);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert!(geometry::signed_area(&ring) > 0.0);
    }

    #[test]
    fn test_normalize_keeps_ccw_ring() {
        let ccw = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ];
        let ring = normalize_ring(&ccw);
        assert_eq!(ring, ccw);
    }

    #[test]
    fn test_disjoint_shapes_no_overlap() {
        let shapes = vec![
            shape_at(0.0, 0.0, 50.0, 50.0, "A"),
            shape_at(200.0, 200.0, 50.0, 50.0, "B"),
        ];
        assert!(all_intersections(&shapes).is_empty());
    }

    #[test]
    fn test_offset_squares_overlap() {
        // Rectangle A at origin 100×100, rectangle B at (50,50) 100×100:
        // one 50×50 overlap square, area 2500, four right angles.
        let shapes = vec![
            shape_at(0.0, 0.0, 100.0, 100.0, "A"),
            shape_at(50.0, 50.0, 100.0, 100.0, "B"),
        ];
        let overlaps = all_intersections(&shapes);
        assert_eq!(overlaps.len(), 1);

        let overlap = &overlaps[0];
        assert_eq!(overlap.label, "Overlap A&B");
        assert_eq!(overlap.area, 2500.0);
        assert!(overlap.is_intersection);
        assert_eq!(overlap.points.len(), 4);

        let angles = overlap.angles.as_ref().unwrap();
        for ang in [angles.a, angles.b, angles.c, angles.d] {
            assert!((ang - PI / 2.0).abs() < 1e-6);
        }
        let sides = overlap.sides.as_ref().unwrap();
        assert_eq!(sides.ab, 50.0);
        assert_eq!(sides.cd, 50.0);

        let b = geometry::bounds(&overlap.points);
        assert_eq!(b, Rect::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_pair_symmetry() {
        let a = shape_at(0.0, 0.0, 100.0, 100.0, "A").absolute_points();
        let b = shape_at(30.0, 40.0, 100.0, 100.0, "B").absolute_points();

        let ab = intersect_pair(&a, &b);
        let ba = intersect_pair(&b, &a);
        assert_eq!(ab.len(), ba.len());
        for (r1, r2) in ab.iter().zip(ba.iter()) {
            assert_eq!(r1.len(), r2.len());
            let area1 = geometry::polygon_area(r1);
            let area2 = geometry::polygon_area(r2);
            assert!((area1 - area2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_idempotent_recompute() {
        let shapes = vec![
            shape_at(0.0, 0.0, 100.0, 100.0, "A"),
            shape_at(50.0, 50.0, 100.0, 100.0, "B"),
            shape_at(80.0, 10.0, 60.0, 120.0, "C"),
        ];
        let first = all_intersections(&shapes);
        let second = all_intersections(&shapes);
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            assert_eq!(x.points, y.points);
            assert_eq!(x.area, y.area);
            assert_eq!(x.label, y.label);
        }
    }

    #[test]
    fn test_position_offset_feeds_absolute_coordinates() {
        // Two shapes whose local points are identical only overlap because
        // their positions differ by less than their extent.
        let mut a = shape_at(0.0, 0.0, 100.0, 100.0, "A");
        let mut b = shape_at(0.0, 0.0, 100.0, 100.0, "B");
        a.position = Point::new(0.0, 0.0);
        b.position = Point::new(90.0, 0.0);
        let overlaps = all_intersections(&[a, b]);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].area, 1000.0);
    }

    #[test]
    fn test_shared_edge_only_is_not_an_overlap() {
        let shapes = vec![
            shape_at(0.0, 0.0, 50.0, 50.0, "A"),
            shape_at(50.0, 0.0, 50.0, 50.0, "B"),
        ];
        let overlaps = all_intersections(&shapes);
        // A degenerate zero-area sliver may or may not come back from the
        // primitive; any returned ring must have (rounded) zero area.
        for overlap in overlaps {
            assert_eq!(overlap.area, 0.0);
        }
    }

    #[test]
    fn test_entity_ids_are_unique_across_pairs() {
        let shapes = vec![
            shape_at(0.0, 0.0, 100.0, 100.0, "A"),
            shape_at(50.0, 50.0, 100.0, 100.0, "B"),
            shape_at(60.0, 60.0, 100.0, 100.0, "C"),
        ];
        let overlaps = all_intersections(&shapes);
        assert!(overlaps.len() >= 3);
        let mut ids: Vec<&str> = overlaps.iter().map(|o| o.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), overlaps.len());
    }
}
