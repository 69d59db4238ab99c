//! Score-line detection options.

/// Narrowest ROI the detector will search.
pub const MIN_ROI_WIDTH: usize = 30;

/// Tuning for the per-topic score search.
///
/// Pixel distances are measured in the working resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectOptions {
    /// ROI width centred on the column (never below [`MIN_ROI_WIDTH`]).
    pub roi_width: usize,
    /// Extra rows searched above the 100% line.
    pub top_margin: usize,
    /// Extra rows searched below the 0% line.
    pub bottom_margin: usize,
    /// Rows this close to a calibration or reference line are skipped.
    pub line_exclusion: usize,
    /// Hundred-marker window starts this far above the 100% line.
    pub hundred_above: usize,
    /// Hundred-marker window ends this far below the 100% line.
    pub hundred_below: usize,
    /// Only pixels darker than this add to the hundred-marker score.
    pub dark_pixel_threshold: u8,
    pub hundred_acceptance: f64,
    /// Darkest row is accepted when its weighted mean is at most this.
    pub darkest_acceptance: f64,
    pub red_acceptance: f64,
    pub edge_acceptance: f64,
    /// Track the light-blue confidence band.
    pub detect_band: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            roi_width: 40,
            top_margin: 40,
            bottom_margin: 30,
            line_exclusion: 5,
            hundred_above: 30,
            hundred_below: 10,
            dark_pixel_threshold: 100,
            hundred_acceptance: 5.0,
            darkest_acceptance: 150.0,
            red_acceptance: 3.0,
            edge_acceptance: 15.0,
            detect_band: true,
        }
    }
}

impl DetectOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ROI width, clamped to [`MIN_ROI_WIDTH`].
    #[inline]
    pub fn roi_width(mut self, width: usize) -> Self {
        self.roi_width = width.max(MIN_ROI_WIDTH);
        self
    }

    /// Set the vertical search margins around the calibration lines.
    #[inline]
    pub fn margins(mut self, top: usize, bottom: usize) -> Self {
        self.top_margin = top;
        self.bottom_margin = bottom;
        self
    }

    #[inline]
    pub fn line_exclusion(mut self, rows: usize) -> Self {
        self.line_exclusion = rows;
        self
    }

    #[inline]
    pub fn detect_band(mut self, enabled: bool) -> Self {
        self.detect_band = enabled;
        self
    }

    /// Effective ROI width after clamping.
    #[inline]
    pub fn effective_roi_width(&self) -> usize {
        self.roi_width.max(MIN_ROI_WIDTH)
    }
}
