//! Stroke model: committed ink gestures, the history that owns them, and the
//! curve plan used to draw a point sequence smoothly.
//!
//! A [`Stroke`] is one pointer-down-to-pointer-up gesture. [`StrokeHistory`]
//! only grows by appending strokes with at least
//! [`MIN_STROKE_POINTS`](crate::consts::MIN_STROKE_POINTS) samples and is only
//! ever emptied as a whole. The renderer reads strokes in insertion order,
//! which is also paint order.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use crate::consts::MIN_STROKE_POINTS;
use crate::viewport::Point;

/// One step of a smoothed stroke outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start the path at a point.
    MoveTo(Point),
    /// Quadratic curve through `ctrl` ending at `to`.
    QuadTo { ctrl: Point, to: Point },
}

/// A committed ink gesture in backing-buffer coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Build a stroke from a finished gesture.
    ///
    /// Returns `None` when the gesture is too short to leave a mark.
    #[must_use]
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        if points.len() < MIN_STROKE_POINTS {
            return None;
        }
        Some(Self { points })
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn first(&self) -> Point {
        self.points[0]
    }

    #[must_use]
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// The curve plan for this stroke.
    #[must_use]
    pub fn path(&self) -> Vec<PathCommand> {
        smooth_path(&self.points)
    }
}

/// Ordered, append-only list of committed strokes.
#[derive(Debug, Clone, Default)]
pub struct StrokeHistory {
    strokes: Vec<Stroke>,
}

impl StrokeHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a finished gesture. Returns `true` if a stroke was appended.
    pub fn commit(&mut self, points: Vec<Point>) -> bool {
        match Stroke::from_points(points) {
            Some(stroke) => {
                self.strokes.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Drop every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Strokes in drawing (and paint) order.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }
}

/// Plan a smoothed path through `points`.
///
/// Each interior sample becomes the control point of a quadratic curve that
/// ends at the midpoint to the following sample; a final curve through the
/// second-to-last sample ends exactly on the last one. Fewer than two points
/// yield an empty plan.
#[must_use]
pub fn smooth_path(points: &[Point]) -> Vec<PathCommand> {
    if points.len() < MIN_STROKE_POINTS {
        return Vec::new();
    }

    let last = points.len() - 1;
    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo(points[0]));

    for i in 1..last.saturating_sub(1) {
        commands.push(PathCommand::QuadTo { ctrl: points[i], to: points[i].midpoint(points[i + 1]) });
    }

    commands.push(PathCommand::QuadTo { ctrl: points[last - 1], to: points[last] });
    commands
}
