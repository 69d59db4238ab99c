//! Luminance projection of RGBA into a single intensity channel.

use crate::buffer::{GrayBuffer, PixelBuffer, Rgba};

/// ITU-R BT.601 luma of one pixel, rounded to the nearest integer.
///
/// Alpha is ignored.
#[inline]
pub fn luma(p: Rgba) -> u8 {
    let y = 0.299 * p.r as f64 + 0.587 * p.g as f64 + 0.114 * p.b as f64;
    y.round().min(255.0) as u8
}

/// Convert an RGBA buffer to grayscale.
pub fn to_grayscale(source: &PixelBuffer) -> GrayBuffer {
    let data = source
        .samples()
        .chunks_exact(4)
        .map(|s| {
            luma(Rgba {
                r: s[0],
                g: s[1],
                b: s[2],
                a: s[3],
            })
        })
        .collect();
    GrayBuffer::new(source.width(), source.height(), data)
}
