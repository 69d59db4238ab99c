//! Encoded image bytes to [`PixelBuffer`].

use base64::Engine;
use chart_scan::PixelBuffer;

use crate::error::DecodeError;

/// Default ceiling on encoded image size.
pub const DEFAULT_MAX_BYTES: usize = 50 * 1024 * 1024;

/// Decode PNG or JPEG bytes into RGBA samples.
pub fn decode_image(bytes: &[u8], max_bytes: usize) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(DecodeError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| DecodeError::Corrupt(e.to_string()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();

    PixelBuffer::from_rgba(width as usize, height as usize, decoded.into_raw())
        .map_err(|e| DecodeError::Corrupt(e.to_string()))
}

/// Decode a base64 payload, accepting an optional `data:` URL prefix.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, DecodeError> {
    let payload = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| DecodeError::Base64(e.to_string()))
}
