//! Resolved calibration data.

use crate::topics::Topic;

use super::error::{validate_lines, CalibrationError};

/// Which strategy produced a [`CalibrationPoints`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationSource {
    /// Built-in or configured template, rescaled to the image.
    Template,
    /// Grid and reference lines located in the edge map.
    DetectedGrid,
    /// Grid search found too few peaks; the fractional rectangle was used.
    GridFallback,
    /// Caller-supplied calibration, rescaled to the image.
    Manual,
}

impl CalibrationSource {
    pub fn as_str(self) -> &'static str {
        match self {
            CalibrationSource::Template => "template",
            CalibrationSource::DetectedGrid => "detected-grid",
            CalibrationSource::GridFallback => "grid-fallback",
            CalibrationSource::Manual => "manual",
        }
    }
}

/// A y-coordinate known to represent `percentage`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLine {
    pub percentage: f64,
    pub y: f64,
}

/// A candidate horizontal line found inside the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedLine {
    pub y: f64,
    /// Mean edge magnitude of the grouped rows.
    pub strength: f64,
    /// Set once the line has been chosen as a reference.
    pub percentage: Option<f64>,
}

/// Plot area rectangle, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl GridRect {
    /// Fractional rectangle used when no grid is found: top 25%, height
    /// 50%, left 10%, width 80%.
    pub fn fallback(width: usize, height: usize) -> Self {
        let (w, h) = (width as f64, height as f64);
        GridRect {
            left: w * 0.10,
            top: h * 0.25,
            right: w * 0.90,
            bottom: h * 0.75,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Centres of `count` equal slots across the rectangle.
    pub fn column_centres(&self, count: usize) -> Vec<f64> {
        let slot = self.width() / count as f64;
        (0..count)
            .map(|i| self.left + (i as f64 + 0.5) * slot)
            .collect()
    }

    fn scaled(&self, sx: f64, sy: f64) -> Self {
        GridRect {
            left: self.left * sx,
            top: self.top * sy,
            right: self.right * sx,
            bottom: self.bottom * sy,
        }
    }
}

/// Vertical positions of 0% and 100%, one x-position per topic, and
/// whatever auxiliary lines the resolver found.
///
/// `y_hundred < y_zero` always holds; y grows downward.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationPoints {
    pub y_hundred: f64,
    pub y_zero: f64,
    /// One entry per topic in [`Topic::ALL`] order, non-decreasing.
    pub x_positions: Vec<f64>,
    pub reference_lines: Vec<ReferenceLine>,
    pub grid: Option<GridRect>,
    /// Every grouped line seen during reference search.
    pub candidates: Vec<DetectedLine>,
    pub source: CalibrationSource,
}

impl CalibrationPoints {
    /// Validated constructor.
    ///
    /// # Errors
    ///
    /// Fails unless `y_hundred < y_zero` and there are exactly ten
    /// non-decreasing column positions.
    pub fn new(
        y_hundred: f64,
        y_zero: f64,
        x_positions: Vec<f64>,
        source: CalibrationSource,
    ) -> Result<Self, CalibrationError> {
        validate_lines(y_hundred, y_zero, &x_positions)?;
        Ok(Self {
            y_hundred,
            y_zero,
            x_positions,
            reference_lines: Vec::new(),
            grid: None,
            candidates: Vec::new(),
            source,
        })
    }

    /// Column centre for `topic`.
    #[inline]
    pub fn x_position(&self, topic: Topic) -> f64 {
        self.x_positions[topic.index()]
    }

    /// Every y printed on the chart as a calibration or reference line.
    pub fn known_lines(&self) -> impl Iterator<Item = f64> + '_ {
        [self.y_hundred, self.y_zero]
            .into_iter()
            .chain(self.reference_lines.iter().map(|r| r.y))
    }

    /// Copy with every coordinate multiplied by `sx` horizontally and
    /// `sy` vertically.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        CalibrationPoints {
            y_hundred: self.y_hundred * sy,
            y_zero: self.y_zero * sy,
            x_positions: self.x_positions.iter().map(|x| x * sx).collect(),
            reference_lines: self
                .reference_lines
                .iter()
                .map(|r| ReferenceLine {
                    percentage: r.percentage,
                    y: r.y * sy,
                })
                .collect(),
            grid: self.grid.map(|g| g.scaled(sx, sy)),
            candidates: self
                .candidates
                .iter()
                .map(|c| DetectedLine { y: c.y * sy, ..*c })
                .collect(),
            source: self.source,
        }
    }
}
