//! Fixed calibration tables measured against a known base resolution.

use super::error::{validate_lines, CalibrationError};
use super::points::{CalibrationPoints, CalibrationSource};

/// Calibration coordinates measured on a reference rendering of the chart.
///
/// The table is configuration data: [`CalibrationTemplate::default`] carries
/// the coordinates of the standard 3000x1200 layout, and callers with other
/// layouts supply their own through [`CalibrationTemplate::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTemplate {
    base_width: u32,
    base_height: u32,
    y_zero: f64,
    y_hundred: f64,
    x_positions: Vec<f64>,
}

impl Default for CalibrationTemplate {
    fn default() -> Self {
        Self {
            base_width: 3000,
            base_height: 1200,
            y_zero: 1111.0,
            y_hundred: 780.0,
            x_positions: vec![
                434.0, 674.0, 1050.0, 1280.0, 1570.0, 1870.0, 2100.0, 2410.0, 2667.0, 2950.0,
            ],
        }
    }
}

impl CalibrationTemplate {
    /// Validated constructor.
    pub fn new(
        base_width: u32,
        base_height: u32,
        y_zero: f64,
        y_hundred: f64,
        x_positions: Vec<f64>,
    ) -> Result<Self, CalibrationError> {
        if base_width == 0 || base_height == 0 {
            return Err(CalibrationError::NonPositiveBase {
                width: base_width,
                height: base_height,
            });
        }
        validate_lines(y_hundred, y_zero, &x_positions)?;
        Ok(Self {
            base_width,
            base_height,
            y_zero,
            y_hundred,
            x_positions,
        })
    }

    pub fn base_width(&self) -> u32 {
        self.base_width
    }

    pub fn base_height(&self) -> u32 {
        self.base_height
    }

    pub fn y_zero(&self) -> f64 {
        self.y_zero
    }

    pub fn y_hundred(&self) -> f64 {
        self.y_hundred
    }

    pub fn x_positions(&self) -> &[f64] {
        &self.x_positions
    }

    /// Rescale to a `width` x `height` image, rounding to whole pixels.
    ///
    /// Never fails. If rounding collapses the two lines onto one row, the
    /// 0% line is placed one pixel below the 100% line.
    pub fn scale_to(&self, width: usize, height: usize) -> CalibrationPoints {
        let sx = width as f64 / self.base_width as f64;
        let sy = height as f64 / self.base_height as f64;

        let y_hundred = (self.y_hundred * sy).round();
        let mut y_zero = (self.y_zero * sy).round();
        if y_zero <= y_hundred {
            y_zero = y_hundred + 1.0;
        }

        CalibrationPoints {
            y_hundred,
            y_zero,
            x_positions: self.x_positions.iter().map(|x| (x * sx).round()).collect(),
            reference_lines: Vec::new(),
            grid: None,
            candidates: Vec::new(),
            source: CalibrationSource::Template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let t = CalibrationTemplate::default();
        let rebuilt = CalibrationTemplate::new(
            t.base_width(),
            t.base_height(),
            t.y_zero(),
            t.y_hundred(),
            t.x_positions().to_vec(),
        );
        assert_eq!(rebuilt, Ok(t));
    }

    #[test]
    fn test_identity_scale() {
        let p = CalibrationTemplate::default().scale_to(3000, 1200);
        assert_eq!(p.y_zero, 1111.0);
        assert_eq!(p.y_hundred, 780.0);
        assert_eq!(p.x_positions[0], 434.0);
        assert_eq!(p.source, CalibrationSource::Template);
    }

    #[test]
    fn test_half_scale_rounds() {
        let p = CalibrationTemplate::default().scale_to(1500, 600);
        assert_eq!(p.y_zero, 556.0, "555.5 rounds half away from zero");
        assert_eq!(p.y_hundred, 390.0);
        assert_eq!(p.x_positions[1], 337.0);
        assert_eq!(p.x_positions[9], 1475.0);
    }

    #[test]
    fn test_collapse_guard() {
        let p = CalibrationTemplate::default().scale_to(30, 1);
        assert!(p.y_hundred < p.y_zero, "Lines must stay ordered: {:?}", p);
    }

    #[test]
    fn test_new_rejects_zero_base() {
        assert_eq!(
            CalibrationTemplate::new(0, 10, 5.0, 1.0, vec![0.0; 10]),
            Err(CalibrationError::NonPositiveBase {
                width: 0,
                height: 10
            })
        );
    }
}
