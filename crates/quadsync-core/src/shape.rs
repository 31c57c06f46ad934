//! Shape data model and wire format.
//!
//! A [`Shape`] is a four-vertex polygon created by a draw gesture; an
//! [`Intersection`] is the derived overlap polygon of two shapes. Both
//! serialize with the camelCase field names and flat point arrays of the
//! canvas wire format, so local cache, remote store and server all speak the
//! same records.

use crate::geometry;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use uuid::Uuid;

/// Unique identifier for source shapes.
pub type ShapeId = Uuid;

/// The four vertices of a quadrilateral, in A,B,C,D order, in a frame
/// relative to the shape's `position`.
pub type Quad = [Point; 4];

/// Serialize a point list as the flat `[x0, y0, x1, y1, ...]` wire array.
mod flat_points {
    use kurbo::Point;
    use serde::de::Error;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize_slice<S: Serializer>(points: &[Point], ser: S) -> Result<S::Ok, S::Error> {
        let mut seq = ser.serialize_seq(Some(points.len() * 2))?;
        for p in points {
            seq.serialize_element(&p.x)?;
            seq.serialize_element(&p.y)?;
        }
        seq.end()
    }

    pub fn deserialize_vec<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Point>, D::Error> {
        let nums = Vec::<f64>::deserialize(de)?;
        if nums.len() % 2 != 0 {
            return Err(D::Error::custom(format!(
                "flat point array has odd length {}",
                nums.len()
            )));
        }
        if nums.iter().any(|n| !n.is_finite()) {
            return Err(D::Error::custom("flat point array contains a non-finite value"));
        }
        Ok(nums.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect())
    }

    pub mod quad {
        use kurbo::Point;
        use serde::de::Error;
        use serde::{Deserializer, Serializer};

        pub fn serialize<S: Serializer>(points: &[Point; 4], ser: S) -> Result<S::Ok, S::Error> {
            super::serialize_slice(points, ser)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<[Point; 4], D::Error> {
            let points = super::deserialize_vec(de)?;
            <[Point; 4]>::try_from(points)
                .map_err(|v: Vec<Point>| D::Error::custom(format!("expected 4 vertices, got {}", v.len())))
        }
    }

    pub mod ring {
        use kurbo::Point;
        use serde::{Deserializer, Serializer};

        pub fn serialize<S: Serializer>(points: &Vec<Point>, ser: S) -> Result<S::Ok, S::Error> {
            super::serialize_slice(points, ser)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Point>, D::Error> {
            super::deserialize_vec(de)
        }
    }
}

/// The four side lengths of a quadrilateral, rounded to the nearest pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideLengths {
    pub ab: f64,
    pub bc: f64,
    pub cd: f64,
    pub da: f64,
}

/// The four interior angles in radians plus a human-readable radian label
/// for each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteriorAngles {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub a_rad_str: String,
    pub b_rad_str: String,
    pub c_rad_str: String,
    pub d_rad_str: String,
}

impl InteriorAngles {
    /// Sum of the four interior angles in radians.
    pub fn total(&self) -> f64 {
        self.a + self.b + self.c + self.d
    }
}

/// Derive side lengths from a quadrilateral's vertices.
pub fn side_lengths(points: &Quad) -> SideLengths {
    let [a, b, c, d] = *points;
    SideLengths {
        ab: geometry::distance(a, b).round(),
        bc: geometry::distance(b, c).round(),
        cd: geometry::distance(c, d).round(),
        da: geometry::distance(d, a).round(),
    }
}

/// Derive interior angles from a quadrilateral's vertices.
pub fn interior_angles(points: &Quad) -> InteriorAngles {
    let [a, b, c, d] = *points;
    let ang_a = geometry::interior_angle(d, a, b);
    let ang_b = geometry::interior_angle(a, b, c);
    let ang_c = geometry::interior_angle(b, c, d);
    let ang_d = geometry::interior_angle(c, d, a);
    InteriorAngles {
        a: ang_a,
        b: ang_b,
        c: ang_c,
        d: ang_d,
        a_rad_str: geometry::format_radian(ang_a),
        b_rad_str: geometry::format_radian(ang_b),
        c_rad_str: geometry::format_radian(ang_c),
        d_rad_str: geometry::format_radian(ang_d),
    }
}

/// Generate a hue for new shape fills.
/// Uses a counter + hash approach (splitmix32-like) so it needs no RNG
/// dependency and stays unique across rapid shape creation.
fn generate_hue() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static HUE_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = HUE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x % 360
}

/// A random hue-based fill tag. Opaque to the engine; the renderer
/// interprets it.
pub fn random_fill_color() -> String {
    format!("hsl({}, 70%, 50%)", generate_hue())
}

/// Display letter for the `count`-th shape: cycles A–Z and repeats past 26
/// shapes (accepted scale limit).
pub fn next_label(count: usize) -> String {
    let letter = (b'A' + (count % 26) as u8) as char;
    letter.to_string()
}

/// A persisted polygon entity created by a user draw gesture.
///
/// `sides`, `angles`, `area` and the total-angle summary are derived from
/// `points` and recomputed on every mutation; they are carried on the record
/// for the persistence layer but are never independently authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    /// Display letter, cycling A–Z.
    pub label: String,
    /// Translation offset applied to all points, in canvas coordinates.
    pub position: Point,
    /// Vertices in a frame relative to `position`.
    #[serde(with = "flat_points::quad")]
    pub points: Quad,
    pub sides: SideLengths,
    pub angles: InteriorAngles,
    pub area: f64,
    pub total_angle_deg: f64,
    pub total_angle_rad_str: String,
    /// Visual tag, semantically opaque to the engine.
    pub fill_color: String,
}

impl Shape {
    /// Create a shape from a committed draw gesture rectangle (canvas
    /// coordinates). The shape is anchored at the rectangle's minimum
    /// corner with axis-aligned rectangular points.
    pub fn from_gesture(rect: Rect, label: String) -> Self {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(rect.width(), 0.0),
            Point::new(rect.width(), rect.height()),
            Point::new(0.0, rect.height()),
        ];
        let mut shape = Self {
            id: Uuid::new_v4(),
            label,
            position: Point::new(rect.min_x(), rect.min_y()),
            points,
            sides: side_lengths(&points),
            angles: interior_angles(&points),
            area: 0.0,
            total_angle_deg: 0.0,
            total_angle_rad_str: String::new(),
            fill_color: random_fill_color(),
        };
        shape.recompute();
        shape
    }

    /// Recompute every derived field from `points`. Called after each
    /// mutation so the derived fields can never drift.
    pub fn recompute(&mut self) {
        self.sides = side_lengths(&self.points);
        self.angles = interior_angles(&self.points);
        self.area = geometry::polygon_area(&self.points);
        let total = self.angles.total();
        self.total_angle_deg = (total * 180.0 / PI).round();
        self.total_angle_rad_str = geometry::format_radian(total);
    }

    /// Replace one vertex's local coordinates and recompute derived fields.
    pub fn set_vertex(&mut self, index: usize, local: Point) {
        self.points[index] = local;
        self.recompute();
    }

    /// Vertices translated into canvas-absolute coordinates.
    pub fn absolute_points(&self) -> Quad {
        self.points
            .map(|p| Point::new(p.x + self.position.x, p.y + self.position.y))
    }

    /// Bounding box of the local points.
    pub fn local_bounds(&self) -> Rect {
        geometry::bounds(&self.points)
    }

    /// Bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        geometry::bounds(&self.absolute_points())
    }
}

/// A derived, non-persisted-independently overlap polygon of two shapes.
///
/// Computed fresh from the current shape set on every read; deleting or
/// editing a source shape simply changes the next recomputation's output.
/// Rings with fewer than four vertices (triangular overlaps) carry no
/// side/angle metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intersection {
    pub id: String,
    /// Composite label: `Overlap <labelA>&<labelB>`.
    pub label: String,
    /// Overlap ring in canvas-absolute coordinates, closing duplicate
    /// stripped.
    #[serde(with = "flat_points::ring")]
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<SideLengths>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angles: Option<InteriorAngles>,
    pub area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_angle_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_angle_rad_str: Option<String>,
    pub fill_color: String,
    /// Always `true`; discriminates intersection records on the wire.
    pub is_intersection: bool,
}

impl Intersection {
    /// Build an intersection entity from one overlap ring of the pair
    /// `(a, b)`. `ring_index` disambiguates multiple disjoint rings from
    /// non-convex overlap configurations.
    pub fn from_ring(a: &Shape, b: &Shape, ring_index: usize, ring: Vec<Point>) -> Self {
        let quad: Option<Quad> = (ring.len() >= 4).then(|| [ring[0], ring[1], ring[2], ring[3]]);
        let sides = quad.as_ref().map(side_lengths);
        let angles = quad.as_ref().map(interior_angles);
        let total = angles.as_ref().map(InteriorAngles::total);
        Self {
            id: format!("intersection-{}-{}-{}", a.id, b.id, ring_index),
            label: format!("Overlap {}&{}", a.label, b.label),
            area: geometry::polygon_area(&ring),
            points: ring,
            sides,
            angles,
            total_angle_deg: total.map(|t| (t * 180.0 / PI).round()),
            total_angle_rad_str: total.map(geometry::format_radian),
            fill_color: "red".to_string(),
            is_intersection: true,
        }
    }
}

/// One record of the remote canvas payload: either a source shape or a
/// derived intersection. The required `isIntersection` field discriminates,
/// so the `Intersection` variant must be tried first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyncRecord {
    Intersection(Intersection),
    Shape(Shape),
}

impl SyncRecord {
    /// The source shape, if this record is one.
    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            SyncRecord::Shape(s) => Some(s),
            SyncRecord::Intersection(_) => None,
        }
    }
}
