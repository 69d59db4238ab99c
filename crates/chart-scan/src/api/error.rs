//! Unified error type for score extraction.

use std::fmt;

use crate::calibration::CalibrationError;

/// Errors that abort an analysis run.
///
/// A topic whose score could not be found is not an error; it is reported
/// as `percentage: None` in the result.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// Zero-area image, or a sample vector that does not hold
    /// `width * height` RGBA pixels.
    InvalidInput {
        width: usize,
        height: usize,
        samples: usize,
    },
    /// Strict grid mode found fewer than two gridline peaks on an axis.
    GridNotDetected {
        row_peaks: usize,
        column_peaks: usize,
    },
    /// Calibration record failed validation.
    InvalidCalibration(CalibrationError),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InvalidInput {
                width,
                height,
                samples,
            } => write!(
                f,
                "invalid pixel buffer: {}x{} with {} samples",
                width, height, samples
            ),
            ExtractError::GridNotDetected {
                row_peaks,
                column_peaks,
            } => write!(
                f,
                "chart grid not detected ({} row peaks, {} column peaks; need 2 each)",
                row_peaks, column_peaks
            ),
            ExtractError::InvalidCalibration(err) => write!(f, "invalid calibration: {}", err),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::InvalidCalibration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CalibrationError> for ExtractError {
    fn from(err: CalibrationError) -> Self {
        ExtractError::InvalidCalibration(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        let err = ExtractError::GridNotDetected {
            row_peaks: 1,
            column_peaks: 0,
        };
        assert_eq!(
            err.to_string(),
            "chart grid not detected (1 row peaks, 0 column peaks; need 2 each)"
        );
    }

    #[test]
    fn test_calibration_source_chain() {
        let err: ExtractError = CalibrationError::ColumnCount {
            expected: 10,
            actual: 2,
        }
        .into();
        assert!(err.to_string().starts_with("invalid calibration:"));
        assert!(err.source().is_some());
    }
}
