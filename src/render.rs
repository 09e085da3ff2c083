//! Rendering: repaints the whole backing buffer from the authoritative state.
//!
//! Every call recomputes the picture from scratch. It receives read-only
//! views of the stroke history, the in-progress samples and the optional
//! background and produces pixels; it does not mutate drawing state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use tiny_skia::Pixmap;

use crate::raster::{Ink, Raster};
use crate::stroke::{StrokeHistory, smooth_path};
use crate::viewport::Point;

/// Read-only view of everything that ends up on the buffer.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub history: &'a StrokeHistory,
    pub in_progress: &'a [Point],
    pub background: Option<&'a Pixmap>,
}

impl Scene<'_> {
    /// The saved signature is shown only while nothing has been drawn this
    /// session: no committed strokes and no samples in progress.
    #[must_use]
    pub fn shows_background(&self) -> bool {
        self.background.is_some() && self.history.is_empty() && self.in_progress.is_empty()
    }
}

/// Draw the full scene.
///
/// Layers, bottom first: cleared buffer, background, committed strokes in
/// insertion order, in-progress stroke.
pub fn draw(raster: &mut Raster, scene: &Scene<'_>, ink: &Ink) {
    // Layer 1: clear.
    raster.clear();

    // Layer 2: saved signature.
    if scene.shows_background() {
        if let Some(image) = scene.background {
            raster.draw_image(image);
        }
    }

    // Layer 3: committed strokes.
    for stroke in scene.history.iter() {
        raster.stroke_path(&stroke.path(), ink);
    }

    // Layer 4: stroke under the pointer.
    if !scene.in_progress.is_empty() {
        raster.stroke_path(&smooth_path(scene.in_progress), ink);
    }
}
