//! Preprocessing driver.

use std::borrow::Cow;

use crate::api::ExtractError;
use crate::buffer::{GrayBuffer, PixelBuffer};

use super::contrast::enhance_contrast;
use super::edges::sobel_edges;
use super::grayscale::to_grayscale;
use super::options::PreprocessOptions;
use super::resize::resample;

/// Factor mapping working-buffer coordinates back to the source buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.x == 1.0 && self.y == 1.0
    }
}

/// Every plane derived from one source buffer.
#[derive(Debug, Clone)]
pub struct Prepared<'a> {
    /// Source resampled to the working size, or borrowed as-is.
    pub working: Cow<'a, PixelBuffer>,
    /// Luma of `working`.
    pub gray: GrayBuffer,
    /// Contrast-enhanced luma.
    pub enhanced: GrayBuffer,
    /// Sobel magnitude of `enhanced`.
    pub edges: GrayBuffer,
    /// Working to source coordinate scale.
    pub scale: Scale,
}

impl Prepared<'_> {
    #[inline]
    pub fn width(&self) -> usize {
        self.working.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.working.height()
    }
}

/// Runs resample, grayscale, enhancement and edge detection in order.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    options: PreprocessOptions,
}

impl Preprocessor {
    pub fn new(options: PreprocessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    /// Derive every analysis plane from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidInput`] for a zero-area source.
    pub fn process<'a>(&self, source: &'a PixelBuffer) -> Result<Prepared<'a>, ExtractError> {
        if source.is_empty() {
            return Err(ExtractError::InvalidInput {
                width: source.width(),
                height: source.height(),
                samples: source.samples().len(),
            });
        }

        let (working, scale) = match self.options.working_size {
            Some((w, h)) if (w as usize, h as usize) != (source.width(), source.height()) => {
                let resized = resample(source, w, h)?;
                let scale = Scale {
                    x: source.width() as f64 / w as f64,
                    y: source.height() as f64 / h as f64,
                };
                (Cow::Owned(resized), scale)
            }
            _ => (Cow::Borrowed(source), Scale::IDENTITY),
        };

        let gray = to_grayscale(&working);
        let enhanced = enhance_contrast(&gray, &self.options);
        let edges = sobel_edges(&enhanced);

        Ok(Prepared {
            working,
            gray,
            enhanced,
            edges,
            scale,
        })
    }
}
