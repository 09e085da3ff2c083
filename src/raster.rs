//! Backing buffer: the fixed-resolution RGBA pixel store and the drawing
//! primitives the renderer needs.
//!
//! This module owns all path stroking and blitting. Pixels are kept
//! premultiplied, as tiny-skia stores them; [`crate::snapshot`] converts at
//! the encoding boundary.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use tiny_skia::{
    Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, PremultipliedColorU8, Stroke, Transform,
};

use crate::config::{ConfigError, InkStyle, parse_color};
use crate::consts::{INK_RGBA, INK_SHADOW_BLUR, INK_SHADOW_RGBA, INK_WIDTH};
use crate::stroke::PathCommand;
use crate::viewport::Point;

/// Ink resolved into rasterizer colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ink {
    pub width: f32,
    pub color: Color,
    pub shadow_blur: f32,
    pub shadow_color: Color,
}

impl Ink {
    /// Resolve an [`InkStyle`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Color`] if either colour fails to parse.
    pub fn from_style(style: &InkStyle) -> Result<Self, ConfigError> {
        Ok(Self {
            width: style.width,
            color: parse_color(&style.color)?,
            shadow_blur: style.shadow_blur.max(0.0),
            shadow_color: parse_color(&style.shadow_color)?,
        })
    }
}

impl Default for Ink {
    fn default() -> Self {
        Self {
            width: INK_WIDTH,
            color: rgba(INK_RGBA),
            shadow_blur: INK_SHADOW_BLUR,
            shadow_color: rgba(INK_SHADOW_RGBA),
        }
    }
}

/// The canvas backing buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixmap: Pixmap,
}

impl Raster {
    /// Allocate a transparent buffer. `None` if the size cannot be allocated.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Premultiplied pixel at `(x, y)`, `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.pixel(x, y)
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Composite `image` at the origin at its natural size.
    pub fn draw_image(&mut self, image: &Pixmap) {
        if image.width() == self.width() && image.height() == self.height() && self.is_blank() {
            // Source-over onto a transparent buffer is a plain copy.
            self.pixmap.data_mut().copy_from_slice(image.data());
            return;
        }
        self.pixmap.draw_pixmap(0, 0, image.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }

    /// Stroke a planned path with the ink, soft edge first.
    ///
    /// Empty or degenerate plans draw nothing.
    pub fn stroke_path(&mut self, commands: &[PathCommand], ink: &Ink) {
        let Some(path) = build_path(commands) else {
            return;
        };

        if ink.shadow_blur > 0.0 {
            let shadow = ink_stroke(ink.width + ink.shadow_blur * 2.0);
            self.pixmap.stroke_path(&path, &solid(ink.shadow_color), &shadow, Transform::identity(), None);
        }
        self.pixmap.stroke_path(&path, &solid(ink.color), &ink_stroke(ink.width), Transform::identity(), None);
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn rgba([r, g, b, a]: [u8; 4]) -> Color {
    Color::from_rgba8(r, g, b, a)
}

fn ink_stroke(width: f32) -> Stroke {
    Stroke { width, line_cap: LineCap::Round, line_join: LineJoin::Round, ..Stroke::default() }
}

#[allow(clippy::cast_possible_truncation)]
fn to_f32(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

fn build_path(commands: &[PathCommand]) -> Option<tiny_skia::Path> {
    if commands.is_empty() {
        return None;
    }
    let mut pb = PathBuilder::new();
    for command in commands {
        match *command {
            PathCommand::MoveTo(p) => {
                let (x, y) = to_f32(p);
                pb.move_to(x, y);
            }
            PathCommand::QuadTo { ctrl, to } => {
                let (cx, cy) = to_f32(ctrl);
                let (x, y) = to_f32(to);
                pb.quad_to(cx, cy, x, y);
            }
        }
    }
    pb.finish()
}
