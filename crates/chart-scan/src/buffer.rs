//! Pixel containers passed between pipeline stages.
//!
//! [`PixelBuffer`] holds decoded RGBA samples exactly as the caller supplied
//! them. [`GrayBuffer`] is the single-channel plane used for the grayscale,
//! enhanced and edge-magnitude images. Every stage allocates its own output;
//! no buffer is mutated after construction.

use crate::api::ExtractError;

/// One RGBA sample, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque color from RGB channels.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
}

/// Decoded image: `width * height` RGBA samples, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA samples.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidInput`] if `samples.len()` is not
    /// `width * height * 4`.
    pub fn from_rgba(width: usize, height: usize, samples: Vec<u8>) -> Result<Self, ExtractError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(ExtractError::InvalidInput {
                width,
                height,
                samples: samples.len(),
            })?;
        if samples.len() != expected {
            return Err(ExtractError::InvalidInput {
                width,
                height,
                samples: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgba) -> Self {
        let mut samples = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                let p = f(x, y);
                samples.extend_from_slice(&[p.r, p.g, p.b, p.a]);
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    /// Solid-color buffer.
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA samples.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let i = (y * self.width + x) * 4;
        Rgba {
            r: self.samples[i],
            g: self.samples[i + 1],
            b: self.samples[i + 2],
            a: self.samples[i + 3],
        }
    }
}

/// Single-channel 8-bit plane (grayscale, enhanced or edge magnitude).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayBuffer {
    /// Wrap an intensity vector of length `width * height`.
    ///
    /// # Panics
    ///
    /// Panics if the length does not match the dimensions.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "gray plane length must equal width * height"
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Plane filled with a constant intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a plane by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// One row of intensities.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }
}
