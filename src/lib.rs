//! Freehand signature capture and rendering.
//!
//! The crate owns a signature surface end to end: translating pointer and
//! touch input into ink strokes, repainting the fixed-resolution backing
//! buffer with smoothed curves, restoring a previously saved signature as a
//! base layer, and serializing the buffer to a PNG data URL snapshot. The
//! host page only wires DOM events to the surface and stores the snapshots it
//! reports.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::Surface`] and the testable [`engine::SurfaceCore`] |
//! | [`stroke`] | Strokes, the stroke history, and the smoothed curve plan |
//! | [`input`] | Pointer sources and the drawing gesture state machine |
//! | [`viewport`] | Points and display-to-buffer coordinate mapping |
//! | [`render`] | Full repaint of the backing buffer |
//! | [`raster`] | The backing buffer and ink primitives |
//! | [`snapshot`] | PNG data URL encoding and decoding |
//! | [`config`] | Buffer resolution and ink configuration |
//! | [`consts`] | Shared constants (buffer size, ink, snapshot prefix) |
//! | `web` | Browser binding (`wasm32` only) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod input;
pub mod raster;
pub mod render;
pub mod snapshot;
pub mod stroke;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
pub mod web;
