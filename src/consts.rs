//! Shared constants for the signature surface.

// ── Backing buffer ──────────────────────────────────────────────

/// Logical width of the backing buffer in pixels.
pub const BUFFER_WIDTH: u32 = 600;

/// Logical height of the backing buffer in pixels.
pub const BUFFER_HEIGHT: u32 = 220;

// ── Ink ─────────────────────────────────────────────────────────

/// Ink line width in buffer pixels.
pub const INK_WIDTH: f32 = 3.5;

/// Ink colour (slate-800, `#1e293b`), straight RGBA.
pub const INK_RGBA: [u8; 4] = [0x1e, 0x29, 0x3b, 0xff];

/// Blur radius of the soft edge drawn beneath every stroke.
pub const INK_SHADOW_BLUR: f32 = 0.5;

/// Colour of the soft edge, the ink colour at 20% opacity.
pub const INK_SHADOW_RGBA: [u8; 4] = [0x1e, 0x29, 0x3b, 51];

// ── Strokes ─────────────────────────────────────────────────────

/// A gesture with fewer samples than this leaves no mark and is discarded.
pub const MIN_STROKE_POINTS: usize = 2;

// ── Snapshot ────────────────────────────────────────────────────

/// Data URL prefix of every encoded snapshot.
pub const SNAPSHOT_PREFIX: &str = "data:image/png;base64,";

/// Sentinel snapshot meaning "no signature present".
pub const EMPTY_SNAPSHOT: &str = "";
