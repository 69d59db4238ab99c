//! Contrast enhancement: min-max stretch, gamma, and adaptive sharpening.
//!
//! The enhanced plane is what the score-line strategies read. Bright
//! background (>= 128 after gamma) passes through untouched; darker pixels
//! are pulled to 0 wherever the adaptive threshold marks them as locally
//! darker than their surroundings, which sharpens thin strokes without
//! erasing faint ones.

use crate::buffer::GrayBuffer;

use super::options::PreprocessOptions;

/// Stretch intensities to the full 0..=255 range.
///
/// A flat image (min == max) is returned unchanged.
pub fn normalize(gray: &GrayBuffer) -> GrayBuffer {
    let (min, max) = gray
        .data()
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if gray.data().is_empty() || min == max {
        return gray.clone();
    }
    let range = (max - min) as f64;
    let data = gray
        .data()
        .iter()
        .map(|&v| ((v - min) as f64 * 255.0 / range).round() as u8)
        .collect();
    GrayBuffer::new(gray.width(), gray.height(), data)
}

/// Apply `255 * (v / 255)^gamma` through a lookup table.
pub fn gamma_correct(gray: &GrayBuffer, gamma: f64) -> GrayBuffer {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = (255.0 * (i as f64 / 255.0).powf(gamma)).round().clamp(0.0, 255.0) as u8;
    }
    let data = gray.data().iter().map(|&v| lut[v as usize]).collect();
    GrayBuffer::new(gray.width(), gray.height(), data)
}

/// Local-mean binarization.
///
/// Each output pixel is 0 when the input is more than `c` below the mean of
/// the `window` x `window` neighbourhood centred on it, 255 otherwise.
/// Windows are clipped at the borders and the mean uses the clipped count.
pub fn adaptive_threshold(gray: &GrayBuffer, window: usize, c: f64) -> GrayBuffer {
    let (w, h) = (gray.width(), gray.height());
    if w == 0 || h == 0 {
        return gray.clone();
    }
    let half = window.max(1) / 2;

    // Summed-area table with a zero border row and column.
    let stride = w + 1;
    let mut sat = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += gray.get(x, y) as u64;
            sat[(y + 1) * stride + x + 1] = sat[y * stride + x + 1] + row_sum;
        }
    }

    GrayBuffer::from_fn(w, h, |x, y| {
        let x0 = x.saturating_sub(half);
        let y0 = y.saturating_sub(half);
        let x1 = (x + half).min(w - 1) + 1;
        let y1 = (y + half).min(h - 1) + 1;
        let sum = sat[y1 * stride + x1] + sat[y0 * stride + x0]
            - sat[y0 * stride + x1]
            - sat[y1 * stride + x0];
        let count = ((x1 - x0) * (y1 - y0)) as f64;
        let mean = sum as f64 / count;
        if (gray.get(x, y) as f64) < mean - c {
            0
        } else {
            255
        }
    })
}

/// Full enhancement chain: normalize, gamma, then blend with the adaptive
/// threshold for pixels darker than mid-gray.
pub fn enhance_contrast(gray: &GrayBuffer, options: &PreprocessOptions) -> GrayBuffer {
    let corrected = gamma_correct(&normalize(gray), options.gamma);
    let threshold = adaptive_threshold(&corrected, options.adaptive_window, options.adaptive_c);
    let data = corrected
        .data()
        .iter()
        .zip(threshold.data())
        .map(|(&v, &t)| if v < 128 { v.min(t) } else { v })
        .collect();
    GrayBuffer::new(gray.width(), gray.height(), data)
}
