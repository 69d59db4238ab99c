//! Pixel row to percentage conversion.

use crate::calibration::CalibrationPoints;

/// Linear map from y to a 0..=100 score, one decimal place.
///
/// Rows at or above the 100% line map to exactly 100, rows at or below the
/// 0% line to exactly 0. Monotonic non-increasing in `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentageMapper {
    y_hundred: f64,
    y_zero: f64,
}

impl PercentageMapper {
    /// Mapper for `y_hundred < y_zero`; the calibration types guarantee it.
    pub fn new(y_hundred: f64, y_zero: f64) -> Self {
        debug_assert!(y_hundred < y_zero, "100% line must lie above the 0% line");
        Self { y_hundred, y_zero }
    }

    pub fn percentage(&self, y: f64) -> f64 {
        if y <= self.y_hundred {
            return 100.0;
        }
        if y >= self.y_zero {
            return 0.0;
        }
        let fraction = (y - self.y_hundred) / (self.y_zero - self.y_hundred);
        round_tenth(100.0 - fraction * 100.0)
    }
}

impl From<&CalibrationPoints> for PercentageMapper {
    fn from(points: &CalibrationPoints) -> Self {
        Self::new(points.y_hundred, points.y_zero)
    }
}

#[inline]
fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let m = PercentageMapper::new(780.0, 1111.0);
        assert_eq!(m.percentage(780.0), 100.0);
        assert_eq!(m.percentage(1111.0), 0.0);
    }

    #[test]
    fn test_clamps_outside_range() {
        let m = PercentageMapper::new(100.0, 300.0);
        assert_eq!(m.percentage(-50.0), 100.0);
        assert_eq!(m.percentage(99.9), 100.0);
        assert_eq!(m.percentage(300.1), 0.0);
        assert_eq!(m.percentage(5000.0), 0.0);
    }

    #[test]
    fn test_linear_one_decimal() {
        let m = PercentageMapper::new(100.0, 300.0);
        assert_eq!(m.percentage(160.0), 70.0);
        assert_eq!(m.percentage(200.0), 50.0);
        let m = PercentageMapper::new(0.0, 3.0);
        assert_eq!(m.percentage(1.0), 66.7);
    }

    #[test]
    fn test_monotonic() {
        let m = PercentageMapper::new(37.0, 411.0);
        let mut last = f64::INFINITY;
        for y in 0..500 {
            let p = m.percentage(y as f64);
            assert!(p <= last, "percentage rose at y={y}");
            assert!((0.0..=100.0).contains(&p));
            last = p;
        }
    }
}
