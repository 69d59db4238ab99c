//! Debug overlay description.
//!
//! The overlay is a list of shapes in source-image coordinates. It is
//! derived from finished results and never feeds back into scoring;
//! rasterizing it is the caller's job.

use crate::calibration::CalibrationPoints;
use crate::topics::Topic;

use super::result::DebugPoint;

/// Semantic colour of an overlay shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayColor {
    /// 0% and 100% lines.
    Calibration,
    /// Auxiliary reference lines.
    Reference,
    /// Topic column positions.
    Column,
    /// Accepted score points.
    Score,
    /// Rejected low-confidence candidates.
    Candidate,
    /// Confidence band fill.
    Band,
    /// Score annotations.
    Text,
}

impl OverlayColor {
    /// Straight RGBA.
    pub fn rgba(self) -> [u8; 4] {
        match self {
            OverlayColor::Calibration => [0, 255, 0, 128],
            OverlayColor::Reference => [160, 32, 240, 160],
            OverlayColor::Column => [0, 0, 255, 255],
            OverlayColor::Score => [255, 0, 0, 255],
            OverlayColor::Candidate => [160, 32, 240, 255],
            OverlayColor::Band => [0, 120, 255, 64],
            OverlayColor::Text => [0, 0, 0, 255],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayShape {
    /// Full-width horizontal line.
    HorizontalLine {
        y: f64,
        thickness: f64,
        color: OverlayColor,
    },
    /// Full-height vertical bar starting at `x`.
    VerticalMarker {
        x: f64,
        thickness: f64,
        color: OverlayColor,
    },
    /// Filled circle.
    Point {
        x: f64,
        y: f64,
        radius: f64,
        color: OverlayColor,
    },
    /// Filled rectangle.
    Span {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        color: OverlayColor,
    },
    /// Text with its baseline starting at `(x, y)`.
    Label {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        color: OverlayColor,
    },
}

/// Topic names are cut to this many characters above their column.
const TOPIC_LABEL_CHARS: usize = 10;

/// Shapes to draw over a `width` x `height` copy of the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub width: usize,
    pub height: usize,
    pub shapes: Vec<OverlayShape>,
}

impl Overlay {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: OverlayShape) {
        self.shapes.push(shape);
    }

    /// Standard debug picture: bands underneath, then calibration and
    /// reference lines, column markers, candidates and accepted points,
    /// with text labels on top.
    pub fn build(
        width: usize,
        height: usize,
        calibration: &CalibrationPoints,
        points: &[DebugPoint],
        bands: &[[f64; 4]],
    ) -> Self {
        let mut overlay = Overlay::new(width, height);
        for &[left, top, right, bottom] in bands {
            overlay.push(OverlayShape::Span {
                left,
                top,
                right,
                bottom,
                color: OverlayColor::Band,
            });
        }
        for y in [calibration.y_hundred, calibration.y_zero] {
            overlay.push(OverlayShape::HorizontalLine {
                y,
                thickness: 2.0,
                color: OverlayColor::Calibration,
            });
        }
        for line in &calibration.reference_lines {
            overlay.push(OverlayShape::HorizontalLine {
                y: line.y,
                thickness: 1.0,
                color: OverlayColor::Reference,
            });
        }
        for &x in &calibration.x_positions {
            overlay.push(OverlayShape::VerticalMarker {
                x,
                thickness: 2.0,
                color: OverlayColor::Column,
            });
        }
        // Candidates first so accepted points draw on top.
        let (accepted, rejected): (Vec<&DebugPoint>, Vec<&DebugPoint>) =
            points.iter().partition(|p| p.accepted);
        for p in rejected.into_iter().chain(accepted) {
            overlay.push(OverlayShape::Point {
                x: p.x,
                y: p.y,
                radius: if p.accepted { 5.0 } else { 3.0 },
                color: if p.accepted {
                    OverlayColor::Score
                } else {
                    OverlayColor::Candidate
                },
            });
        }

        let size = label_size(height);
        for (text, y) in [("100%", calibration.y_hundred), ("0%", calibration.y_zero)] {
            overlay.push(OverlayShape::Label {
                x: 20.0,
                y,
                text: text.to_string(),
                size,
                color: OverlayColor::Calibration,
            });
        }
        for (topic, &x) in Topic::ALL.iter().zip(&calibration.x_positions) {
            overlay.push(OverlayShape::Label {
                x,
                y: size * 2.0,
                text: topic.label().chars().take(TOPIC_LABEL_CHARS).collect(),
                size,
                color: OverlayColor::Column,
            });
        }
        for p in points.iter().filter(|p| p.accepted) {
            if let Some(score) = p.score {
                overlay.push(OverlayShape::Label {
                    x: p.x + 10.0,
                    y: p.y,
                    text: format!("{score:.1}%"),
                    size,
                    color: OverlayColor::Text,
                });
            }
        }
        overlay
    }

    /// Text shapes only, in drawing order.
    pub fn labels(&self) -> impl Iterator<Item = &OverlayShape> {
        self.shapes
            .iter()
            .filter(|s| matches!(s, OverlayShape::Label { .. }))
    }
}

/// Font size that stays legible on full-resolution uploads.
fn label_size(height: usize) -> f64 {
    (height as f64 / 80.0).clamp(10.0, 48.0)
}
