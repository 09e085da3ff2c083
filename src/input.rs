//! Input model: pointer sources and the drawing gesture state machine.
//!
//! `PointerSource` says where an event came from so the host knows whether
//! default browser gestures must be suppressed. `InputState` is the gesture
//! tracked between pointer-down and pointer-up: `Idle` or `Drawing` with the
//! samples recorded so far.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::viewport::Point;

/// Which kind of device produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerSource {
    /// Mouse (default).
    #[default]
    Mouse,
    /// Stylus reported through pointer events. Pressure and tilt are ignored.
    Pen,
    /// Finger on a touch screen; uses the first touch point.
    Touch,
}

impl PointerSource {
    /// Map a DOM `PointerEvent.pointerType`. Unknown types draw like a mouse.
    #[must_use]
    pub fn from_pointer_type(kind: &str) -> Self {
        match kind {
            "pen" => Self::Pen,
            "touch" => Self::Touch,
            _ => Self::Mouse,
        }
    }

    /// Whether the browser's default scroll/zoom gesture must be cancelled
    /// while this source draws on the canvas.
    #[must_use]
    pub fn suppresses_scroll(self) -> bool {
        matches!(self, Self::Touch)
    }
}

/// Gesture state machine: `Idle -> Drawing -> Idle`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A stroke is being drawn.
    Drawing {
        /// Samples recorded since pointer-down, in buffer coordinates.
        points: Vec<Point>,
    },
}

impl InputState {
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// Samples of the in-progress stroke; empty when idle.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Idle => &[],
            Self::Drawing { points } => points,
        }
    }

    /// Start a new gesture at `at`, abandoning any gesture still open.
    pub fn begin(&mut self, at: Point) {
        *self = Self::Drawing { points: vec![at] };
    }

    /// Record a sample. Returns `false` (and records nothing) when idle.
    pub fn extend(&mut self, at: Point) -> bool {
        match self {
            Self::Idle => false,
            Self::Drawing { points } => {
                points.push(at);
                true
            }
        }
    }

    /// End the gesture, returning its samples. `None` when idle.
    pub fn finish(&mut self) -> Option<Vec<Point>> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Drawing { points } => Some(points),
        }
    }

    /// Drop any gesture in progress.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
