use crate::calibration::CalibrationPoints;

use super::options::DetectOptions;

/// Search window for one topic: `[x_start, x_end) x [y_start, y_end)`,
/// always clipped to the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roi {
    pub x_start: usize,
    pub x_end: usize,
    pub y_start: usize,
    pub y_end: usize,
    pub center_x: f64,
    /// Distance from the centre at which the weight reaches one half.
    pub half_width: f64,
}

impl Roi {
    /// Window around column `center_x` covering the calibrated range plus
    /// margins. `None` when clipping leaves nothing to search.
    pub fn around(
        center_x: f64,
        calibration: &CalibrationPoints,
        width: usize,
        height: usize,
        options: &DetectOptions,
    ) -> Option<Roi> {
        let half_width = options.effective_roi_width() as f64 / 2.0;
        let clip = |v: f64, max: usize| (v.round().max(0.0) as usize).min(max);

        let x_start = clip(center_x - half_width, width);
        let x_end = clip(center_x + half_width, width);
        let y_start = clip(calibration.y_hundred - options.top_margin as f64, height);
        let y_end = clip(calibration.y_zero + options.bottom_margin as f64 + 1.0, height);

        (x_start < x_end && y_start < y_end).then_some(Roi {
            x_start,
            x_end,
            y_start,
            y_end,
            center_x,
            half_width,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.x_end - self.x_start
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y_end - self.y_start
    }

    /// Centre weighting: 1.0 on the column, falling linearly to 0.5 at
    /// the ROI edge and beyond.
    #[inline]
    pub fn weight(&self, x: usize) -> f64 {
        let d = (x as f64 - self.center_x).abs();
        1.0 - 0.5 * (d / self.half_width).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationSource;

    fn calibration() -> CalibrationPoints {
        CalibrationPoints::new(100.0, 300.0, vec![50.0; 10], CalibrationSource::Manual).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let roi =
            Roi::around(200.0, &calibration(), 1000, 1000, &DetectOptions::default()).unwrap();
        assert_eq!((roi.x_start, roi.x_end), (180, 220));
        assert_eq!((roi.y_start, roi.y_end), (60, 331));
        assert_eq!(roi.width(), 40);
    }

    #[test]
    fn test_clipped_to_buffer() {
        let roi = Roi::around(5.0, &calibration(), 400, 310, &DetectOptions::default()).unwrap();
        assert_eq!(roi.x_start, 0);
        assert_eq!(roi.x_end, 25);
        assert_eq!(roi.y_end, 310);
    }

    #[test]
    fn test_outside_buffer_is_none() {
        assert!(
            Roi::around(900.0, &calibration(), 400, 400, &DetectOptions::default()).is_none()
        );
    }

    #[test]
    fn test_weight_profile() {
        let roi =
            Roi::around(200.0, &calibration(), 1000, 1000, &DetectOptions::default()).unwrap();
        assert_eq!(roi.weight(200), 1.0);
        assert_eq!(roi.weight(210), 0.75);
        assert_eq!(roi.weight(180), 0.5);
        assert_eq!(roi.weight(0), 0.5);
    }
}
