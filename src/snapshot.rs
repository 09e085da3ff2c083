//! Snapshot codec: the backing buffer as a `data:image/png;base64,...` URL.
//!
//! A snapshot is the only artifact the surface exchanges with the surrounding
//! form. The empty string is the "no signature" sentinel and is never produced
//! by [`encode`]; a blank buffer still encodes to a (transparent) PNG.
//!
//! PNG is lossless and stores straight alpha. The buffer is premultiplied, so
//! [`encode`] demultiplies and [`decode`] premultiplies again; both round to
//! nearest, which makes `decode(encode(x)) == x` for every premultiplied pixel.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tiny_skia::{ColorU8, Pixmap};

use crate::consts::{EMPTY_SNAPSHOT, SNAPSHOT_PREFIX};

/// Error returned by [`encode`] and [`decode`].
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The value is the empty "no signature" sentinel.
    #[error("snapshot is empty")]
    Empty,
    /// The value is not a `data:` URL.
    #[error("snapshot is not a data url")]
    NotDataUrl,
    /// The data URL carries something other than a PNG.
    #[error("unsupported snapshot media type: {0}")]
    UnsupportedMediaType(String),
    /// The data URL payload is not base64-encoded.
    #[error("snapshot payload is not base64")]
    NotBase64,
    /// The base64 payload is malformed.
    #[error("invalid snapshot base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The PNG stream could not be decoded.
    #[error("invalid snapshot png: {0}")]
    PngDecode(#[from] png::DecodingError),
    /// The PNG stream could not be written.
    #[error("failed to encode snapshot png: {0}")]
    PngEncode(#[from] png::EncodingError),
    /// The PNG decoded to a pixel layout with an unexpected channel count.
    #[error("unsupported snapshot pixel layout: {0} channels")]
    PixelLayout(usize),
    /// The decoded image cannot be held in a buffer.
    #[error("unsupported snapshot dimensions {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}

/// Whether `snapshot` represents a signature (anything but the sentinel).
#[must_use]
pub fn is_present(snapshot: &str) -> bool {
    !snapshot.trim().is_empty()
}

/// Encode a buffer as a PNG data URL.
///
/// # Errors
///
/// Returns [`SnapshotError::PngEncode`] if the PNG writer fails.
pub fn encode(pixmap: &Pixmap) -> Result<String, SnapshotError> {
    let png = encode_png(pixmap)?;
    let mut url = String::with_capacity(SNAPSHOT_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(SNAPSHOT_PREFIX);
    B64.encode_string(&png, &mut url);
    Ok(url)
}

/// Decode a data URL produced by [`encode`] (or any PNG data URL).
///
/// # Errors
///
/// Returns a [`SnapshotError`] describing the first malformed layer: the
/// sentinel, the URL, the base64 payload, or the PNG stream.
pub fn decode(snapshot: &str) -> Result<Pixmap, SnapshotError> {
    let png = png_bytes(snapshot)?;
    decode_png(&png)
}

/// Straight-alpha RGBA8 bytes of `pixmap`.
#[must_use]
pub fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    data
}

fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, SnapshotError> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&straight_rgba(pixmap))?;
        writer.finish()?;
    }
    Ok(buf)
}

fn png_bytes(snapshot: &str) -> Result<Vec<u8>, SnapshotError> {
    let snapshot = snapshot.trim();
    if snapshot == EMPTY_SNAPSHOT {
        return Err(SnapshotError::Empty);
    }

    let rest = snapshot.strip_prefix("data:").ok_or(SnapshotError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(SnapshotError::NotDataUrl)?;

    let mut params = header.split(';');
    let media_type = params.next().unwrap_or_default().trim();
    if !media_type.eq_ignore_ascii_case("image/png") {
        return Err(SnapshotError::UnsupportedMediaType(media_type.to_owned()));
    }
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(SnapshotError::NotBase64);
    }

    Ok(B64.decode(payload.trim())?)
}

fn decode_png(bytes: &[u8]) -> Result<Pixmap, SnapshotError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    let (width, height) = (info.width, info.height);
    let mut pixmap = Pixmap::new(width, height).ok_or(SnapshotError::Dimensions { width, height })?;

    let channels = info.color_type.samples();
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(data.chunks_exact(channels)) {
        let straight = match *src {
            [r, g, b, a] => ColorU8::from_rgba(r, g, b, a),
            [r, g, b] => ColorU8::from_rgba(r, g, b, u8::MAX),
            [v, a] => ColorU8::from_rgba(v, v, v, a),
            [v] => ColorU8::from_rgba(v, v, v, u8::MAX),
            _ => return Err(SnapshotError::PixelLayout(channels)),
        };
        *dst = straight.premultiply();
    }
    Ok(pixmap)
}
