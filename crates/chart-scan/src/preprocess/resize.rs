//! Lanczos3 resampling to the working resolution.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::api::ExtractError;
use crate::buffer::PixelBuffer;

/// Resample `source` to `width` x `height` with a Lanczos3 filter.
///
/// Returns a copy of the input unchanged when the dimensions already match.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidInput`] if either target dimension is zero.
pub fn resample(
    source: &PixelBuffer,
    width: u32,
    height: u32,
) -> Result<PixelBuffer, ExtractError> {
    if width == 0 || height == 0 {
        return Err(ExtractError::InvalidInput {
            width: width as usize,
            height: height as usize,
            samples: 0,
        });
    }
    if source.width() == width as usize && source.height() == height as usize {
        return Ok(source.clone());
    }

    let invalid = || ExtractError::InvalidInput {
        width: source.width(),
        height: source.height(),
        samples: source.samples().len(),
    };
    let src_w = u32::try_from(source.width()).map_err(|_| invalid())?;
    let src_h = u32::try_from(source.height()).map_err(|_| invalid())?;
    let img = RgbaImage::from_raw(src_w, src_h, source.samples().to_vec()).ok_or_else(invalid)?;

    let resized = imageops::resize(&img, width, height, FilterType::Lanczos3);
    PixelBuffer::from_rgba(width as usize, height as usize, resized.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgba;

    #[test]
    fn test_same_size_is_copy() {
        let input = PixelBuffer::from_fn(8, 4, |x, y| Rgba::rgb(x as u8 * 10, y as u8 * 10, 0));
        let output = resample(&input, 8, 4).unwrap();
        assert_eq!(output, input, "Matching dimensions should return the input unchanged");
    }

    #[test]
    fn test_downscale_dimensions() {
        let input = PixelBuffer::filled(100, 40, Rgba::rgb(90, 90, 90));
        let output = resample(&input, 50, 20).unwrap();
        assert_eq!(output.width(), 50);
        assert_eq!(output.height(), 20);
        // Solid input stays solid under a normalized filter.
        let p = output.pixel(25, 10);
        assert!(
            (p.r as i32 - 90).abs() <= 1,
            "Solid color should survive resampling, got {p:?}"
        );
    }

    #[test]
    fn test_zero_target_rejected() {
        let input = PixelBuffer::filled(4, 4, Rgba::WHITE);
        assert!(matches!(
            resample(&input, 0, 4),
            Err(ExtractError::InvalidInput { .. })
        ));
    }
}
