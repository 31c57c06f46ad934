//! Draw-gesture state machine.
//!
//! Pointer events are dispatched as explicit [`DrawEvent`]s into a pure
//! reducer, so every transition is unit-testable without an interaction
//! layer. [`DrawTool`] is the thin stateful wrapper the interaction layer
//! drives.

use kurbo::{Point, Rect};

/// Minimum provisional-rectangle extent, per axis, for a gesture to commit.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// State of the draw gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture is in progress: `start` is the fixed corner, `current`
    /// tracks the pointer.
    Drawing { start: Point, current: Point },
}

/// A discrete pointer event fed to the reducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawEvent {
    /// Pointer pressed. `on_shape` is true when the press landed on an
    /// existing shape or one of its handles; `primary` is true for the
    /// primary button.
    PointerDown { pos: Point, on_shape: bool, primary: bool },
    /// Pointer moved.
    PointerMove { pos: Point },
    /// Pointer released.
    PointerUp,
}

/// What a transition produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOutcome {
    /// The event did not apply in the current state.
    Ignored,
    /// A new gesture started; the interaction layer clears any selection.
    Started,
    /// The provisional rectangle changed.
    Preview(Rect),
    /// The gesture committed: create a shape from this rectangle.
    Committed(Rect),
    /// The gesture ended below the minimum size; no shape is created.
    Discarded,
}

/// Pure transition function: `(state, event) -> (next state, outcome)`.
pub fn reduce(state: DrawState, event: DrawEvent) -> (DrawState, DrawOutcome) {
    match (state, event) {
        (DrawState::Idle, DrawEvent::PointerDown { pos, on_shape, primary }) => {
            if on_shape || !primary {
                (DrawState::Idle, DrawOutcome::Ignored)
            } else {
                (
                    DrawState::Drawing { start: pos, current: pos },
                    DrawOutcome::Started,
                )
            }
        }
        (DrawState::Drawing { start, .. }, DrawEvent::PointerMove { pos }) => (
            DrawState::Drawing { start, current: pos },
            DrawOutcome::Preview(Rect::from_points(start, pos)),
        ),
        (DrawState::Drawing { start, current }, DrawEvent::PointerUp) => {
            let rect = Rect::from_points(start, current);
            if rect.width() < MIN_SHAPE_SIZE || rect.height() < MIN_SHAPE_SIZE {
                (DrawState::Idle, DrawOutcome::Discarded)
            } else {
                (DrawState::Idle, DrawOutcome::Committed(rect))
            }
        }
        _ => (state, DrawOutcome::Ignored),
    }
}

/// Stateful wrapper over the reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawTool {
    state: DrawState,
}

impl DrawTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch an event and return what it produced.
    pub fn handle(&mut self, event: DrawEvent) -> DrawOutcome {
        let (next, outcome) = reduce(self.state, event);
        self.state = next;
        outcome
    }

    /// Cancel the gesture in progress, if any.
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// The provisional rectangle while drawing.
    pub fn preview_rect(&self) -> Option<Rect> {
        match self.state {
            DrawState::Drawing { start, current } => Some(Rect::from_points(start, current)),
            DrawState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> DrawEvent {
        DrawEvent::PointerDown {
            pos: Point::new(x, y),
            on_shape: false,
            primary: true,
        }
    }

    fn mv(x: f64, y: f64) -> DrawEvent {
        DrawEvent::PointerMove { pos: Point::new(x, y) }
    }

    #[test]
    fn test_full_gesture_commits() {
        let mut tool = DrawTool::new();
        assert_eq!(tool.handle(down(10.0, 10.0)), DrawOutcome::Started);
        assert!(tool.is_drawing());

        let outcome = tool.handle(mv(110.0, 60.0));
        assert_eq!(outcome, DrawOutcome::Preview(Rect::new(10.0, 10.0, 110.0, 60.0)));
        assert_eq!(tool.preview_rect(), Some(Rect::new(10.0, 10.0, 110.0, 60.0)));

        let outcome = tool.handle(DrawEvent::PointerUp);
        assert_eq!(outcome, DrawOutcome::Committed(Rect::new(10.0, 10.0, 110.0, 60.0)));
        assert!(!tool.is_drawing());
        assert_eq!(tool.preview_rect(), None);
    }

    #[test]
    fn test_reverse_drag_normalizes_rect() {
        let mut tool = DrawTool::new();
        tool.handle(down(100.0, 100.0));
        tool.handle(mv(20.0, 30.0));
        let outcome = tool.handle(DrawEvent::PointerUp);
        assert_eq!(outcome, DrawOutcome::Committed(Rect::new(20.0, 30.0, 100.0, 100.0)));
    }

    #[test]
    fn test_small_gesture_discards() {
        // 4×4: both axes under the threshold.
        let mut tool = DrawTool::new();
        tool.handle(down(0.0, 0.0));
        tool.handle(mv(4.0, 4.0));
        assert_eq!(tool.handle(DrawEvent::PointerUp), DrawOutcome::Discarded);
    }

    #[test]
    fn test_one_flat_axis_discards() {
        // 5×0: each axis must independently clear the threshold.
        let mut tool = DrawTool::new();
        tool.handle(down(0.0, 0.0));
        tool.handle(mv(5.0, 0.0));
        assert_eq!(tool.handle(DrawEvent::PointerUp), DrawOutcome::Discarded);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tool = DrawTool::new();
        tool.handle(down(0.0, 0.0));
        tool.handle(mv(5.0, 5.0));
        assert_eq!(
            tool.handle(DrawEvent::PointerUp),
            DrawOutcome::Committed(Rect::new(0.0, 0.0, 5.0, 5.0))
        );
    }

    #[test]
    fn test_press_on_shape_is_ignored() {
        let mut tool = DrawTool::new();
        let outcome = tool.handle(DrawEvent::PointerDown {
            pos: Point::new(10.0, 10.0),
            on_shape: true,
            primary: true,
        });
        assert_eq!(outcome, DrawOutcome::Ignored);
        assert!(!tool.is_drawing());
    }

    #[test]
    fn test_secondary_button_is_ignored() {
        let mut tool = DrawTool::new();
        let outcome = tool.handle(DrawEvent::PointerDown {
            pos: Point::new(10.0, 10.0),
            on_shape: false,
            primary: false,
        });
        assert_eq!(outcome, DrawOutcome::Ignored);
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut tool = DrawTool::new();
        assert_eq!(tool.handle(mv(50.0, 50.0)), DrawOutcome::Ignored);
        assert_eq!(tool.handle(DrawEvent::PointerUp), DrawOutcome::Ignored);
    }

    #[test]
    fn test_cancel_resets() {
        let mut tool = DrawTool::new();
        tool.handle(down(0.0, 0.0));
        tool.cancel();
        assert!(!tool.is_drawing());
        assert_eq!(tool.handle(DrawEvent::PointerUp), DrawOutcome::Ignored);
    }
}
