use crate::api::ExtractError;
use crate::buffer::GrayBuffer;

use super::grid::{locate_grid, GridOptions};
use super::manual::ManualCalibration;
use super::points::{CalibrationPoints, CalibrationSource, GridRect};
use super::reference::calibrate_from_grid;
use super::template::CalibrationTemplate;

/// How the 0%/100% lines and column positions are obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationMode {
    /// Rescale a fixed coordinate table. Never fails.
    FixedScaled(CalibrationTemplate),
    /// Locate the grid and its reference lines in the edge map.
    ///
    /// With `strict` set, a missing grid is an error instead of falling
    /// back to the fractional rectangle.
    DetectedGrid { strict: bool },
    /// Rescale a caller-supplied record.
    Manual(ManualCalibration),
}

impl Default for CalibrationMode {
    fn default() -> Self {
        CalibrationMode::FixedScaled(CalibrationTemplate::default())
    }
}

impl CalibrationMode {
    pub fn name(&self) -> &'static str {
        match self {
            CalibrationMode::FixedScaled(_) => "fixed",
            CalibrationMode::DetectedGrid { strict: false } => "grid",
            CalibrationMode::DetectedGrid { strict: true } => "strict-grid",
            CalibrationMode::Manual(_) => "manual",
        }
    }
}

/// Turns a [`CalibrationMode`] into concrete [`CalibrationPoints`].
#[derive(Debug, Clone, Default)]
pub struct CalibrationResolver {
    options: GridOptions,
}

impl CalibrationResolver {
    pub fn new(options: GridOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Resolve calibration for an image whose edge map is `edges`.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::InvalidCalibration`] for a manual record that fails
    ///   validation
    /// - [`ExtractError::GridNotDetected`] in strict grid mode when either
    ///   axis has fewer than two profile peaks
    pub fn resolve(
        &self,
        edges: &GrayBuffer,
        mode: &CalibrationMode,
    ) -> Result<CalibrationPoints, ExtractError> {
        let (width, height) = (edges.width(), edges.height());
        match mode {
            CalibrationMode::FixedScaled(template) => Ok(template.scale_to(width, height)),
            CalibrationMode::Manual(manual) => Ok(manual.resolve(width, height)?),
            CalibrationMode::DetectedGrid { strict } => {
                let search = locate_grid(edges, &self.options);
                let (grid, source) = match search.rect {
                    Some(rect) => (rect, CalibrationSource::DetectedGrid),
                    None if *strict => {
                        return Err(ExtractError::GridNotDetected {
                            row_peaks: search.row_peaks.len(),
                            column_peaks: search.column_peaks.len(),
                        })
                    }
                    None => (GridRect::fallback(width, height), CalibrationSource::GridFallback),
                };
                Ok(calibrate_from_grid(edges, grid, source, &self.options))
            }
        }
    }
}
