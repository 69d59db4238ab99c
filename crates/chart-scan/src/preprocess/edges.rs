//! Sobel gradient magnitude.

use crate::buffer::GrayBuffer;

/// 3x3 Sobel magnitude, `min(255, sqrt(gx^2 + gy^2))` for interior pixels.
///
/// The one-pixel border is left at 0. Images narrower or shorter than three
/// pixels produce an all-zero plane.
pub fn sobel_edges(gray: &GrayBuffer) -> GrayBuffer {
    let (w, h) = (gray.width(), gray.height());
    let mut out = vec![0u8; w * h];
    if w < 3 || h < 3 {
        return GrayBuffer::new(w, h, out);
    }

    for y in 1..h - 1 {
        let above = gray.row(y - 1);
        let here = gray.row(y);
        let below = gray.row(y + 1);
        for x in 1..w - 1 {
            let p = |row: &[u8], dx: usize| row[x + dx - 1] as i32;

            let gx = (p(above, 2) + 2 * p(here, 2) + p(below, 2))
                - (p(above, 0) + 2 * p(here, 0) + p(below, 0));
            let gy = (p(below, 0) + 2 * p(below, 1) + p(below, 2))
                - (p(above, 0) + 2 * p(above, 1) + p(above, 2));

            let mag = ((gx * gx + gy * gy) as f64).sqrt();
            out[y * w + x] = mag.min(255.0) as u8;
        }
    }
    GrayBuffer::new(w, h, out)
}
