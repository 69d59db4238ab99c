//! Preprocessing options.

/// Configuration for the preprocessing stage.
///
/// # Defaults
///
/// - Working size: none (keep the source resolution)
/// - Gamma: 0.7
/// - Adaptive threshold window: 15 px
/// - Adaptive threshold constant: 5.0
///
/// # Example
///
/// ```
/// use chart_scan::PreprocessOptions;
///
/// let options = PreprocessOptions::new()
///     .working_size(3000, 1200)
///     .gamma(0.8);
/// assert_eq!(options.working_size, Some((3000, 1200)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessOptions {
    /// Canonical resolution to resample to before analysis (None = keep).
    pub working_size: Option<(u32, u32)>,

    /// Exponent applied to normalized intensities.
    ///
    /// Values below 1.0 lift faint dark strokes away from pure black so the
    /// adaptive threshold can separate them from their neighbourhood.
    pub gamma: f64,

    /// Side length of the square adaptive-threshold window.
    pub adaptive_window: usize,

    /// How far below the local mean a pixel must be to count as foreground.
    pub adaptive_c: f64,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            working_size: None,
            gamma: 0.7,
            adaptive_window: 15,
            adaptive_c: 5.0,
        }
    }
}

impl PreprocessOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resample every input to `width` x `height` before analysis.
    #[inline]
    pub fn working_size(mut self, width: u32, height: u32) -> Self {
        self.working_size = Some((width, height));
        self
    }

    /// Set the gamma exponent.
    #[inline]
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the adaptive threshold window side (clamped to at least 1).
    #[inline]
    pub fn adaptive_window(mut self, window: usize) -> Self {
        self.adaptive_window = window.max(1);
        self
    }

    /// Set the adaptive threshold constant.
    #[inline]
    pub fn adaptive_c(mut self, c: f64) -> Self {
        self.adaptive_c = c;
        self
    }
}
