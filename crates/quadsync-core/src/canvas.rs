//! Shape store: the authoritative shape list and its edit operations.

use crate::geometry;
use crate::intersection::all_intersections;
use crate::shape::{next_label, Intersection, Shape, ShapeId};
use kurbo::{Point, Rect, Size};

/// Default canvas extent.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(1000.0, 400.0);

/// The currently selected entity. At most one shape or intersection is
/// selected at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionTarget {
    Shape(ShapeId),
    /// Intersection entities are derived, so selection holds their
    /// composite id; the entity itself may vanish on the next recompute.
    Intersection(String),
}

/// Owns the authoritative shape list, the canvas extent used for clamping,
/// and the selection. Derived intersections are recomputed on every read,
/// never stored.
#[derive(Debug, Clone)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    selection: Option<SelectionTarget>,
    canvas_size: Size,
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::with_size(DEFAULT_CANVAS_SIZE)
    }

    pub fn with_size(canvas_size: Size) -> Self {
        Self {
            shapes: Vec::new(),
            selection: None,
            canvas_size,
        }
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas_size = size;
    }

    /// The source shapes, in creation order (also z-order, back to front).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Derived overlap entities for the current shape set. Pure recompute
    /// on every call.
    pub fn intersections(&self) -> Vec<Intersection> {
        all_intersections(&self.shapes)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Replace the whole working set (initial sync adoption). Clears
    /// selection.
    pub fn set_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.selection = None;
    }

    /// Append a shape from a committed draw gesture. The label cycles A–Z
    /// keyed by the current shape count. Returns the new shape's id.
    pub fn commit_gesture(&mut self, rect: Rect) -> ShapeId {
        let shape = Shape::from_gesture(rect, next_label(self.shapes.len()));
        let id = shape.id;
        self.shapes.push(shape);
        id
    }

    /// Move a shape to `position`, clamped so its absolute bounding box
    /// stays within the canvas extent. Returns false for an unknown id.
    pub fn translate(&mut self, id: ShapeId, position: Point) -> bool {
        let size = self.canvas_size;
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        let b = shape.local_bounds();
        // Lower bound wins when the shape is wider than the canvas.
        let x = position.x.min(size.width - b.x1).max(-b.x0);
        let y = position.y.min(size.height - b.y1).max(-b.y0);
        shape.position = Point::new(x, y);
        true
    }

    /// Replace one vertex of a shape with the pointer position (canvas
    /// coordinates, clamped to the canvas extent) and recompute that
    /// shape's derived geometry. Returns false for an unknown id or vertex.
    pub fn reshape_vertex(&mut self, id: ShapeId, vertex: usize, pos: Point) -> bool {
        if vertex >= 4 {
            return false;
        }
        let size = self.canvas_size;
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        let abs = Point::new(
            pos.x.clamp(0.0, size.width),
            pos.y.clamp(0.0, size.height),
        );
        let local = Point::new(abs.x - shape.position.x, abs.y - shape.position.y);
        shape.set_vertex(vertex, local);
        true
    }

    /// Remove a shape by identity. Clears the selection when it referenced
    /// the deleted shape, directly or through a derived intersection.
    /// Returns false for an unknown id.
    pub fn delete(&mut self, id: ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        if self.shapes.len() == before {
            return false;
        }
        let clear = match &self.selection {
            Some(SelectionTarget::Shape(sel)) => *sel == id,
            Some(SelectionTarget::Intersection(sel)) => sel.contains(&id.to_string()),
            None => false,
        };
        if clear {
            self.selection = None;
        }
        true
    }

    /// Remove all shapes and clear the selection.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selection = None;
    }

    /// Select a shape. Returns false (leaving the selection untouched) for
    /// an unknown id.
    pub fn select_shape(&mut self, id: ShapeId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selection = Some(SelectionTarget::Shape(id));
        true
    }

    /// Select a derived intersection by its composite id.
    pub fn select_intersection(&mut self, id: String) {
        self.selection = Some(SelectionTarget::Intersection(id));
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&SelectionTarget> {
        self.selection.as_ref()
    }

    /// The selected source shape, if the selection is one.
    pub fn selected_shape(&self) -> Option<&Shape> {
        match &self.selection {
            Some(SelectionTarget::Shape(id)) => self.get(*id),
            _ => None,
        }
    }

    /// Topmost shape under a canvas-coordinate point, if any. Later shapes
    /// draw on top, so iterate front to back.
    pub fn shape_at(&self, pos: Point) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| geometry::polygon_contains(&s.absolute_points(), pos))
            .map(|s| s.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_square(x: f64, y: f64, size: f64) -> (ShapeStore, ShapeId) {
        let mut store = ShapeStore::new();
        let id = store.commit_gesture(Rect::new(x, y, x + size, y + size));
        (store, id)
    }

    #[test]
    fn test_commit_assigns_cycling_labels() {
        let mut store = ShapeStore::new();
        for _ in 0..27 {
            store.commit_gesture(Rect::new(0.0, 0.0, 10.0, 10.0));
        }
        assert_eq!(store.shapes()[0].label, "A");
        assert_eq!(store.shapes()[1].label, "B");
        assert_eq!(store.shapes()[25].label, "Z");
        assert_eq!(store.shapes()[26].label, "A");
    }

    #[test]
    fn test_translate_moves_position_only() {
        let (mut store, id) = store_with_square(0.0, 0.0, 100.0);
        let points_before = store.get(id).unwrap().points;
        assert!(store.translate(id, Point::new(200.0, 150.0)));
        let shape = store.get(id).unwrap();
        assert_eq!(shape.position, Point::new(200.0, 150.0));
        assert_eq!(shape.points, points_before);
    }

    #[test]
    fn test_translate_clamps_to_canvas() {
        let (mut store, id) = store_with_square(0.0, 0.0, 100.0);
        store.translate(id, Point::new(5000.0, -50.0));
        let shape = store.get(id).unwrap();
        // Canvas is 1000×400; a 100×100 shape clamps to [0,900]×[0,300].
        assert_eq!(shape.position, Point::new(900.0, 0.0));
        store.translate(id, Point::new(-20.0, 5000.0));
        assert_eq!(store.get(id).unwrap().position, Point::new(0.0, 300.0));
    }

    #[test]
    fn test_reshape_vertex_recomputes_one_shape() {
        let mut store = ShapeStore::new();
        let id_a = store.commit_gesture(Rect::new(0.0, 0.0, 100.0, 100.0));
        let id_b = store.commit_gesture(Rect::new(200.0, 200.0, 300.0, 300.0));
        let b_before = store.get(id_b).unwrap().clone();

        assert!(store.reshape_vertex(id_a, 2, Point::new(150.0, 120.0)));
        let a = store.get(id_a).unwrap();
        assert_eq!(a.points[2], Point::new(150.0, 120.0));
        assert_ne!(a.sides.bc, 100.0);
        assert_eq!(store.get(id_b).unwrap(), &b_before);
    }

    #[test]
    fn test_reshape_clamps_pointer_to_canvas() {
        let (mut store, id) = store_with_square(0.0, 0.0, 100.0);
        store.reshape_vertex(id, 1, Point::new(2000.0, -10.0));
        assert_eq!(store.get(id).unwrap().points[1], Point::new(1000.0, 0.0));
    }

    #[test]
    fn test_reshape_rejects_bad_vertex() {
        let (mut store, id) = store_with_square(0.0, 0.0, 100.0);
        assert!(!store.reshape_vertex(id, 4, Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_delete_clears_selection_of_deleted_shape() {
        let (mut store, id) = store_with_square(0.0, 0.0, 100.0);
        store.select_shape(id);
        assert!(store.selected_shape().is_some());
        assert!(store.delete(id));
        assert!(store.selection().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_keeps_unrelated_selection() {
        let mut store = ShapeStore::new();
        let id_a = store.commit_gesture(Rect::new(0.0, 0.0, 100.0, 100.0));
        let id_b = store.commit_gesture(Rect::new(200.0, 200.0, 300.0, 300.0));
        store.select_shape(id_a);
        store.delete(id_b);
        assert_eq!(store.selection(), Some(&SelectionTarget::Shape(id_a)));
    }

    #[test]
    fn test_delete_clears_selection_of_derived_intersection() {
        let mut store = ShapeStore::new();
        let id_a = store.commit_gesture(Rect::new(0.0, 0.0, 100.0, 100.0));
        store.commit_gesture(Rect::new(50.0, 50.0, 150.0, 150.0));
        let overlap_id = store.intersections()[0].id.clone();
        store.select_intersection(overlap_id);
        store.delete(id_a);
        assert!(store.selection().is_none());
        assert!(store.intersections().is_empty());
    }

    #[test]
    fn test_clear_empties_everything() {
        let (mut store, id) = store_with_square(0.0, 0.0, 100.0);
        store.select_shape(id);
        store.clear();
        assert!(store.is_empty());
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_shape_at_prefers_topmost() {
        let mut store = ShapeStore::new();
        let bottom = store.commit_gesture(Rect::new(0.0, 0.0, 100.0, 100.0));
        let top = store.commit_gesture(Rect::new(50.0, 50.0, 150.0, 150.0));
        assert_eq!(store.shape_at(Point::new(75.0, 75.0)), Some(top));
        assert_eq!(store.shape_at(Point::new(25.0, 25.0)), Some(bottom));
        assert_eq!(store.shape_at(Point::new(500.0, 300.0)), None);
    }

    #[test]
    fn test_intersections_follow_edits() {
        let mut store = ShapeStore::new();
        let id = store.commit_gesture(Rect::new(0.0, 0.0, 100.0, 100.0));
        store.commit_gesture(Rect::new(200.0, 0.0, 300.0, 100.0));
        assert!(store.intersections().is_empty());

        // Dragging the first shape under the second surfaces an overlap.
        store.translate(id, Point::new(150.0, 0.0));
        let overlaps = store.intersections();
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].area, 5000.0);
    }
}
