//! Surface configuration: buffer resolution and ink presentation.
//!
//! Every field has a default taken from [`crate::consts`], so hosts only
//! override what they need. Configuration arrives either as a Rust value or as
//! a JSON document handed over by the page (`SurfaceConfig::from_json`).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{BUFFER_HEIGHT, BUFFER_WIDTH, INK_RGBA, INK_SHADOW_BLUR, INK_SHADOW_RGBA, INK_WIDTH};

/// Largest buffer edge accepted by the rasterizer.
pub const MAX_BUFFER_EDGE: u32 = 8192;

/// Error returned when a configuration cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document did not match the configuration shape.
    #[error("invalid surface config json: {0}")]
    Json(#[from] serde_json::Error),
    /// A colour string is not a CSS colour.
    #[error("invalid colour {value:?}: {reason}")]
    Color { value: String, reason: String },
    /// Buffer dimensions are zero or exceed [`MAX_BUFFER_EDGE`].
    #[error("invalid buffer dimensions {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}

/// Ink presentation. Shared by every stroke; never varies per stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkStyle {
    /// Line width in buffer pixels.
    pub width: f32,
    /// CSS colour of the ink.
    pub color: String,
    /// Radius of the soft under-stroke; `0` disables it.
    pub shadow_blur: f32,
    /// CSS colour of the soft under-stroke.
    pub shadow_color: String,
}

impl Default for InkStyle {
    fn default() -> Self {
        Self {
            width: INK_WIDTH,
            color: css_color(INK_RGBA),
            shadow_blur: INK_SHADOW_BLUR,
            shadow_color: css_color(INK_SHADOW_RGBA),
        }
    }
}

/// Full surface configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Backing buffer width in pixels.
    pub width: u32,
    /// Backing buffer height in pixels.
    pub height: u32,
    /// Ink presentation.
    pub ink: InkStyle,
    /// Styling token for the host (e.g. a border colour class). Not used for drawing.
    pub accent: Option<String>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self { width: BUFFER_WIDTH, height: BUFFER_HEIGHT, ink: InkStyle::default(), accent: None }
    }
}

impl SurfaceConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed documents and the
    /// [`SurfaceConfig::validate`] errors for unusable values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check dimensions and colours.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dimensions`] or [`ConfigError::Color`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 || self.width > MAX_BUFFER_EDGE || self.height > MAX_BUFFER_EDGE {
            return Err(ConfigError::Dimensions { width: self.width, height: self.height });
        }
        parse_color(&self.ink.color)?;
        parse_color(&self.ink.shadow_color)?;
        Ok(())
    }
}

/// Format straight RGBA as CSS: `#rrggbb` when opaque, `rgba(..)` otherwise.
#[must_use]
pub fn css_color([r, g, b, a]: [u8; 4]) -> String {
    if a == u8::MAX {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("rgba({r}, {g}, {b}, {})", f32::from(a) / 255.0)
    }
}

/// Parse a CSS colour string into a rasterizer colour.
///
/// # Errors
///
/// Returns [`ConfigError::Color`] when the string is not a CSS colour.
pub fn parse_color(value: &str) -> Result<tiny_skia::Color, ConfigError> {
    let parsed = csscolorparser::parse(value)
        .map_err(|e| ConfigError::Color { value: value.to_owned(), reason: e.to_string() })?;
    let [r, g, b, a] = parsed.to_rgba8();
    Ok(tiny_skia::Color::from_rgba8(r, g, b, a))
}
