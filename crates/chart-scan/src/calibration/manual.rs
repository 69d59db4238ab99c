//! Caller-supplied calibration.

use super::error::{validate_lines, CalibrationError};
use super::points::{CalibrationPoints, CalibrationSource};

/// Calibration measured by a person against an image of
/// `base_width` x `base_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualCalibration {
    pub y_zero_percent: f64,
    pub y_hundred_percent: f64,
    pub x_positions: Vec<f64>,
    pub base_width: u32,
    pub base_height: u32,
}

impl ManualCalibration {
    /// Check the record before any scanning happens.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.base_width == 0 || self.base_height == 0 {
            return Err(CalibrationError::NonPositiveBase {
                width: self.base_width,
                height: self.base_height,
            });
        }
        validate_lines(self.y_hundred_percent, self.y_zero_percent, &self.x_positions)
    }

    /// Validate, then rescale to a `width` x `height` image.
    pub fn resolve(
        &self,
        width: usize,
        height: usize,
    ) -> Result<CalibrationPoints, CalibrationError> {
        self.validate()?;
        let sx = width as f64 / self.base_width as f64;
        let sy = height as f64 / self.base_height as f64;
        CalibrationPoints::new(
            self.y_hundred_percent * sy,
            self.y_zero_percent * sy,
            self.x_positions.iter().map(|x| x * sx).collect(),
            CalibrationSource::Manual,
        )
    }
}
