#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

/// A point in either client (viewport CSS) or backing-buffer space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point { x: (self.x + other.x) / 2.0, y: (self.y + other.y) / 2.0 }
    }
}

/// Where the canvas element currently sits on screen, in CSS pixels.
///
/// Mirrors `getBoundingClientRect()`: `left` / `top` are relative to the
/// viewport, `width` / `height` are the displayed size, which is often not
/// the backing buffer size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// A rect at the origin displayed at exactly the buffer size.
    #[must_use]
    pub fn unscaled(buffer_w: u32, buffer_h: u32) -> Self {
        Self::new(0.0, 0.0, f64::from(buffer_w), f64::from(buffer_h))
    }

    /// Buffer pixels per displayed CSS pixel, per axis.
    ///
    /// A collapsed display axis (width or height <= 0) maps 1:1.
    #[must_use]
    pub fn scale(&self, buffer_w: u32, buffer_h: u32) -> (f64, f64) {
        let sx = if self.width > 0.0 { f64::from(buffer_w) / self.width } else { 1.0 };
        let sy = if self.height > 0.0 { f64::from(buffer_h) / self.height } else { 1.0 };
        (sx, sy)
    }

    /// Convert a client-space point to backing-buffer coordinates.
    #[must_use]
    pub fn client_to_buffer(&self, client: Point, buffer_w: u32, buffer_h: u32) -> Point {
        let (sx, sy) = self.scale(buffer_w, buffer_h);
        Point { x: (client.x - self.left) * sx, y: (client.y - self.top) * sy }
    }

    /// Convert a backing-buffer point back to client space.
    #[must_use]
    pub fn buffer_to_client(&self, buffer: Point, buffer_w: u32, buffer_h: u32) -> Point {
        let (sx, sy) = self.scale(buffer_w, buffer_h);
        Point { x: buffer.x / sx + self.left, y: buffer.y / sy + self.top }
    }
}
