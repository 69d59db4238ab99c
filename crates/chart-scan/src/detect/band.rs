//! Light-blue confidence band behind a score marker.
//!
//! Some chart renderings shade the score's confidence interval in pale
//! blue. The band is reported alongside the score but never changes it.

use crate::buffer::{PixelBuffer, Rgba};

use super::roi::Roi;

/// Rows `top..=bottom` covered by the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceBand {
    pub top: usize,
    pub bottom: usize,
}

#[inline]
fn is_band_pixel(p: Rgba) -> bool {
    let (r, g, b) = (p.r as u16, p.g as u16, p.b as u16);
    b >= 180 && b >= r + 30 && b >= g + 10 && r < 220
}

fn close_run(start: usize, end: usize, best: &mut Option<ConfidenceBand>) {
    let longer = best.map_or(true, |b| end - start > b.bottom - b.top);
    if longer {
        *best = Some(ConfidenceBand {
            top: start,
            bottom: end,
        });
    }
}

/// Longest run of rows where at least half the ROI is band-coloured.
pub fn detect_band(raw: &PixelBuffer, roi: &Roi) -> Option<ConfidenceBand> {
    let needed = roi.width().div_ceil(2);
    let mut best: Option<ConfidenceBand> = None;
    let mut run_start: Option<usize> = None;

    for y in roi.y_start..roi.y_end {
        let count = (roi.x_start..roi.x_end)
            .filter(|&x| is_band_pixel(raw.pixel(x, y)))
            .count();
        match (count >= needed, run_start) {
            (true, None) => run_start = Some(y),
            (false, Some(start)) => {
                close_run(start, y - 1, &mut best);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        close_run(start, roi.y_end - 1, &mut best);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roi() -> Roi {
        Roi {
            x_start: 10,
            x_end: 30,
            y_start: 0,
            y_end: 100,
            center_x: 20.0,
            half_width: 10.0,
        }
    }

    const PALE_BLUE: Rgba = Rgba::rgb(170, 200, 240);

    #[test]
    fn test_band_pixel_rule() {
        assert!(is_band_pixel(PALE_BLUE));
        assert!(!is_band_pixel(Rgba::WHITE), "White is not band-coloured");
        assert!(!is_band_pixel(Rgba::rgb(0, 0, 150)), "Too dark");
        assert!(!is_band_pixel(Rgba::rgb(230, 200, 255)), "Red too high");
    }

    #[test]
    fn test_longest_run_wins() {
        let raw = PixelBuffer::from_fn(40, 100, |_, y| {
            if (10..14).contains(&y) || (40..60).contains(&y) {
                PALE_BLUE
            } else {
                Rgba::WHITE
            }
        });
        assert_eq!(
            detect_band(&raw, &roi()),
            Some(ConfidenceBand {
                top: 40,
                bottom: 59
            })
        );
    }

    #[test]
    fn test_narrow_stripe_ignored() {
        // Only 5 of 20 ROI columns are blue.
        let raw = PixelBuffer::from_fn(40, 100, |x, _| {
            if (10..15).contains(&x) {
                PALE_BLUE
            } else {
                Rgba::WHITE
            }
        });
        assert_eq!(detect_band(&raw, &roi()), None);
    }

    #[test]
    fn test_run_to_roi_bottom() {
        let raw = PixelBuffer::from_fn(40, 100, |_, y| {
            if y >= 90 {
                PALE_BLUE
            } else {
                Rgba::WHITE
            }
        });
        assert_eq!(
            detect_band(&raw, &roi()),
            Some(ConfidenceBand {
                top: 90,
                bottom: 99
            })
        );
    }
}
