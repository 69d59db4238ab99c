use std::cmp::Ordering;
use std::fmt;

/// A calibration record that cannot describe a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Base width or height is zero.
    NonPositiveBase { width: u32, height: u32 },
    /// The 100% line is not strictly above the 0% line.
    InvertedLines { y_hundred: f64, y_zero: f64 },
    /// Wrong number of column positions.
    ColumnCount { expected: usize, actual: usize },
    /// Column position at `index` is left of its predecessor.
    NonMonotonicColumns { index: usize },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::NonPositiveBase { width, height } => {
                write!(f, "base dimensions must be positive, got {}x{}", width, height)
            }
            CalibrationError::InvertedLines { y_hundred, y_zero } => write!(
                f,
                "100% line (y={}) must lie above the 0% line (y={})",
                y_hundred, y_zero
            ),
            CalibrationError::ColumnCount { expected, actual } => write!(
                f,
                "expected {} column positions, got {}",
                expected, actual
            ),
            CalibrationError::NonMonotonicColumns { index } => write!(
                f,
                "column position {} is left of the previous column",
                index
            ),
        }
    }
}

impl std::error::Error for CalibrationError {}

/// Check the invariants every resolved calibration must hold.
pub(crate) fn validate_lines(
    y_hundred: f64,
    y_zero: f64,
    x_positions: &[f64],
) -> Result<(), CalibrationError> {
    if !(y_hundred.is_finite() && y_zero.is_finite()) || y_hundred >= y_zero {
        return Err(CalibrationError::InvertedLines { y_hundred, y_zero });
    }
    if x_positions.len() != crate::Topic::COUNT {
        return Err(CalibrationError::ColumnCount {
            expected: crate::Topic::COUNT,
            actual: x_positions.len(),
        });
    }
    if let Some(index) = x_positions
        .windows(2)
        .position(|pair| matches!(pair[1].partial_cmp(&pair[0]), None | Some(Ordering::Less)))
    {
        return Err(CalibrationError::NonMonotonicColumns { index: index + 1 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<f64> {
        (0..10).map(|i| 100.0 + 50.0 * i as f64).collect()
    }

    #[test]
    fn test_valid() {
        assert_eq!(validate_lines(10.0, 200.0, &columns()), Ok(()));
    }

    #[test]
    fn test_equal_lines_rejected() {
        assert_eq!(
            validate_lines(50.0, 50.0, &columns()),
            Err(CalibrationError::InvertedLines {
                y_hundred: 50.0,
                y_zero: 50.0
            })
        );
    }

    #[test]
    fn test_column_errors() {
        assert_eq!(
            validate_lines(0.0, 1.0, &columns()[..9]),
            Err(CalibrationError::ColumnCount {
                expected: 10,
                actual: 9
            })
        );
        let mut xs = columns();
        xs[4] = 10.0;
        assert_eq!(
            validate_lines(0.0, 1.0, &xs),
            Err(CalibrationError::NonMonotonicColumns { index: 4 })
        );
        let mut xs = columns();
        xs[7] = f64::NAN;
        assert!(validate_lines(0.0, 1.0, &xs).is_err(), "NaN column is not ordered");
    }

    #[test]
    fn test_display() {
        let err = CalibrationError::ColumnCount {
            expected: 10,
            actual: 3,
        };
        assert_eq!(err.to_string(), "expected 10 column positions, got 3");
    }
}
