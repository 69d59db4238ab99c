//! The ordered score-line strategies.
//!
//! Each strategy inspects one topic's ROI and reports a [`Probe`]: the row
//! it would pick, the signal that row produced, and whether the signal
//! clears the strategy's acceptance threshold. The detector walks the list
//! in order and stops at the first accepted probe.

use std::fmt;

use crate::buffer::{GrayBuffer, PixelBuffer};
use crate::calibration::CalibrationPoints;

use super::options::DetectOptions;
use super::roi::Roi;

/// Identifies a strategy in results and debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    HundredMarker,
    DarkestLine,
    RedMarker,
    EdgeGradient,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::HundredMarker => "hundred-marker",
            StrategyKind::DarkestLine => "darkest-line",
            StrategyKind::RedMarker => "red-marker",
            StrategyKind::EdgeGradient => "edge-gradient",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one strategy saw in one ROI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub kind: StrategyKind,
    /// Best row, if the strategy had any row to evaluate.
    pub y: Option<usize>,
    /// Score of the best row, in the strategy's own units.
    pub signal: f64,
    pub accepted: bool,
}

impl Probe {
    fn empty(kind: StrategyKind) -> Self {
        Probe {
            kind,
            y: None,
            signal: 0.0,
            accepted: false,
        }
    }
}

/// Everything a strategy may read for one column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnContext<'a> {
    pub enhanced: &'a GrayBuffer,
    pub raw: &'a PixelBuffer,
    pub roi: Roi,
    pub calibration: &'a CalibrationPoints,
    pub options: &'a DetectOptions,
}

impl ColumnContext<'_> {
    /// True when `y` lies within the exclusion radius of a printed line.
    pub fn near_known_line(&self, y: usize) -> bool {
        let radius = self.options.line_exclusion as f64;
        self.calibration
            .known_lines()
            .any(|line| (y as f64 - line).abs() <= radius)
    }

    fn weighted_mean(&self, y: usize) -> f64 {
        let row = self.enhanced.row(y);
        let (sum, weights) = (self.roi.x_start..self.roi.x_end).fold((0.0, 0.0), |(s, w), x| {
            let weight = self.roi.weight(x);
            (s + weight * row[x] as f64, w + weight)
        });
        sum / weights
    }
}

/// One step of the detection pipeline.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn probe(&self, ctx: &ColumnContext<'_>) -> Probe;
}

/// Dark marker drawn at or just above the 100% line.
///
/// Scans `[y100 - hundred_above, y100 + hundred_below]` top-down and
/// accepts the first row whose centre-weighted darkness exceeds
/// `hundred_acceptance`. Only pixels darker than `dark_pixel_threshold`
/// contribute, so a light printed gridline does not trigger it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HundredMarker;

impl Strategy for HundredMarker {
    fn kind(&self) -> StrategyKind {
        StrategyKind::HundredMarker
    }

    fn probe(&self, ctx: &ColumnContext<'_>) -> Probe {
        let o = ctx.options;
        let y100 = ctx.calibration.y_hundred.round().max(0.0) as usize;
        let start = y100.saturating_sub(o.hundred_above).max(ctx.roi.y_start);
        let end = (y100 + o.hundred_below + 1).min(ctx.roi.y_end);

        let mut best = Probe::empty(self.kind());
        for y in start..end {
            let row = ctx.enhanced.row(y);
            let darkness: f64 = (ctx.roi.x_start..ctx.roi.x_end)
                .filter(|&x| row[x] < o.dark_pixel_threshold)
                .map(|x| ctx.roi.weight(x) * (255 - row[x]) as f64 / 255.0)
                .sum();
            if darkness > o.hundred_acceptance {
                return Probe {
                    kind: self.kind(),
                    y: Some(y),
                    signal: darkness,
                    accepted: true,
                };
            }
            if best.y.is_none() || darkness > best.signal {
                best.y = Some(y);
                best.signal = darkness;
            }
        }
        best
    }
}

/// Row with the lowest centre-weighted mean intensity.
#[derive(Debug, Clone, Copy, Default)]
pub struct DarkestLine;

impl Strategy for DarkestLine {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DarkestLine
    }

    fn probe(&self, ctx: &ColumnContext<'_>) -> Probe {
        let mut best = Probe::empty(self.kind());
        for y in ctx.roi.y_start..ctx.roi.y_end {
            if ctx.near_known_line(y) {
                continue;
            }
            let mean = ctx.weighted_mean(y);
            if best.y.is_none() || mean < best.signal {
                best.y = Some(y);
                best.signal = mean;
            }
        }
        best.accepted = best.y.is_some() && best.signal <= ctx.options.darkest_acceptance;
        best
    }
}

/// Row with the most red-dominant pixels, read from the raw colours.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedMarker;

impl Strategy for RedMarker {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RedMarker
    }

    fn probe(&self, ctx: &ColumnContext<'_>) -> Probe {
        let mut best = Probe::empty(self.kind());
        for y in ctx.roi.y_start..ctx.roi.y_end {
            let redness: f64 = (ctx.roi.x_start..ctx.roi.x_end)
                .map(|x| ctx.raw.pixel(x, y))
                .filter(|p| {
                    let (r, g, b) = (p.r as f64, p.g as f64, p.b as f64);
                    r > 100.0 && r > 1.5 * g && r > 1.5 * b
                })
                .map(|p| (p.r - p.g.max(p.b)) as f64 / 255.0)
                .sum();
            if redness > best.signal {
                best.y = Some(y);
                best.signal = redness;
            }
        }
        best.accepted = best.signal > ctx.options.red_acceptance;
        best
    }
}

/// Row with the strongest vertical intensity change.
///
/// A thin line produces equal maxima on the rows either side of it; the
/// reported row is then the line itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeGradient;

impl EdgeGradient {
    fn gradient(ctx: &ColumnContext<'_>, y: usize) -> f64 {
        let above = ctx.enhanced.row(y - 1);
        let below = ctx.enhanced.row(y + 1);
        let total: f64 = (ctx.roi.x_start..ctx.roi.x_end)
            .map(|x| (above[x] as f64 - below[x] as f64).abs())
            .sum();
        total / ctx.roi.width() as f64
    }
}

impl Strategy for EdgeGradient {
    fn kind(&self) -> StrategyKind {
        StrategyKind::EdgeGradient
    }

    fn probe(&self, ctx: &ColumnContext<'_>) -> Probe {
        let mut best = Probe::empty(self.kind());
        let start = (ctx.roi.y_start + 1).max(1);
        let end = (ctx.roi.y_end.saturating_sub(1)).min(ctx.enhanced.height().saturating_sub(1));

        let mut gradients = Vec::new();
        for y in start..end {
            let g = Self::gradient(ctx, y);
            gradients.push((y, g));
            if g > best.signal {
                best.y = Some(y);
                best.signal = g;
            }
        }

        if let Some(y) = best.y {
            let twin = gradients
                .iter()
                .any(|&(row, g)| row == y + 2 && g == best.signal);
            if twin {
                best.y = Some(y + 1);
            }
        }
        best.accepted = best.signal > ctx.options.edge_acceptance;
        best
    }
}

/// The default ordered strategy list.
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(HundredMarker),
        Box::new(DarkestLine),
        Box::new(RedMarker),
        Box::new(EdgeGradient),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgba;
    use crate::calibration::CalibrationSource;

    const W: usize = 100;
    const H: usize = 200;

    fn calibration() -> CalibrationPoints {
        CalibrationPoints::new(50.0, 150.0, vec![50.0; 10], CalibrationSource::Manual).unwrap()
    }

    fn run(strategy: &dyn Strategy, enhanced: &GrayBuffer, raw: &PixelBuffer) -> Probe {
        let calibration = calibration();
        let options = DetectOptions::default();
        let roi = Roi::around(50.0, &calibration, W, H, &options).unwrap();
        let ctx = ColumnContext {
            enhanced,
            raw,
            roi,
            calibration: &calibration,
            options: &options,
        };
        strategy.probe(&ctx)
    }

    fn white_raw() -> PixelBuffer {
        PixelBuffer::filled(W, H, Rgba::WHITE)
    }

    fn line_at(y_line: usize, value: u8) -> GrayBuffer {
        GrayBuffer::from_fn(W, H, |_, y| if y == y_line { value } else { 255 })
    }

    #[test]
    fn test_hundred_marker_accepts_dark_row_near_top() {
        let probe = run(&HundredMarker, &line_at(45, 0), &white_raw());
        assert!(probe.accepted);
        assert_eq!(probe.y, Some(45));
    }

    #[test]
    fn test_hundred_marker_ignores_light_gridline() {
        let probe = run(&HundredMarker, &line_at(50, 215), &white_raw());
        assert!(!probe.accepted, "Light gridline must not count: {probe:?}");
    }

    #[test]
    fn test_darkest_line_skips_calibration_rows() {
        let enhanced = GrayBuffer::from_fn(W, H, |_, y| match y {
            150 => 0,
            100 => 90,
            _ => 255,
        });
        let probe = run(&DarkestLine, &enhanced, &white_raw());
        assert_eq!(probe.y, Some(100), "Row on the 0% line is excluded");
        assert!(probe.accepted);
        assert!((probe.signal - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_darkest_line_rejects_faint_minimum() {
        let probe = run(&DarkestLine, &line_at(100, 200), &white_raw());
        assert!(!probe.accepted);
        assert_eq!(probe.y, Some(100), "Weak candidate still recorded");
    }

    #[test]
    fn test_red_marker_finds_red_row() {
        let raw = PixelBuffer::from_fn(W, H, |_, y| {
            if y == 120 {
                Rgba::rgb(220, 30, 30)
            } else {
                Rgba::WHITE
            }
        });
        let probe = run(&RedMarker, &GrayBuffer::filled(W, H, 255), &raw);
        assert!(probe.accepted);
        assert_eq!(probe.y, Some(120));
        assert!(probe.signal > 20.0);
    }

    #[test]
    fn test_red_marker_ignores_gray() {
        let raw = PixelBuffer::filled(W, H, Rgba::rgb(120, 120, 120));
        let probe = run(&RedMarker, &GrayBuffer::filled(W, H, 255), &raw);
        assert!(!probe.accepted);
        assert_eq!(probe.y, None);
    }

    #[test]
    fn test_edge_gradient_centres_thin_line() {
        let probe = run(&EdgeGradient, &line_at(90, 180), &white_raw());
        assert!(probe.accepted, "Step of 75 clears 15: {probe:?}");
        assert_eq!(probe.y, Some(90));
    }

    #[test]
    fn test_edge_gradient_reads_rows_on_calibration_lines() {
        let probe = run(&EdgeGradient, &line_at(150, 0), &white_raw());
        assert!(probe.accepted, "{probe:?}");
        assert_eq!(probe.y, Some(150));
    }

    #[test]
    fn test_edge_gradient_flat_rejected() {
        let probe = run(&EdgeGradient, &GrayBuffer::filled(W, H, 255), &white_raw());
        assert!(!probe.accepted);
        assert_eq!(probe.y, None);
    }
}
