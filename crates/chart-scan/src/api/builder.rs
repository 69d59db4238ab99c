//! ScoreExtractor builder, the primary entry point of the crate.

use crate::buffer::PixelBuffer;
use crate::calibration::{CalibrationMode, CalibrationResolver, GridOptions};
use crate::detect::{DetectOptions, ScoreLineDetector};
use crate::output::{AnalysisResult, ResultAssembler};
use crate::preprocess::{PreprocessOptions, Preprocessor};

use super::error::ExtractError;

/// Configured score-extraction pipeline.
///
/// Configuration methods consume and return `self`;
/// [`extract()`](Self::extract) takes `&self`, so one extractor can analyse
/// any number of images, from any number of threads.
///
/// # Example
///
/// ```
/// use chart_scan::{CalibrationMode, PixelBuffer, Rgba, ScoreExtractor, Topic};
///
/// let image = PixelBuffer::filled(600, 240, Rgba::WHITE);
/// let result = ScoreExtractor::new(CalibrationMode::default())
///     .debug(true)
///     .extract(&image)
///     .unwrap();
///
/// assert_eq!(result.topics.len(), Topic::COUNT);
/// assert_eq!(result.get(Topic::Economics).percentage, None);
/// ```
#[derive(Debug)]
pub struct ScoreExtractor {
    mode: CalibrationMode,
    preprocess: PreprocessOptions,
    grid: GridOptions,
    detector: ScoreLineDetector,
    include_debug: bool,
}

impl ScoreExtractor {
    /// Extractor with default tuning for the given calibration mode.
    pub fn new(mode: CalibrationMode) -> Self {
        Self {
            mode,
            preprocess: PreprocessOptions::default(),
            grid: GridOptions::default(),
            detector: ScoreLineDetector::default(),
            include_debug: false,
        }
    }

    #[inline]
    pub fn preprocess(mut self, options: PreprocessOptions) -> Self {
        self.preprocess = options;
        self
    }

    #[inline]
    pub fn grid(mut self, options: GridOptions) -> Self {
        self.grid = options;
        self
    }

    /// Replace detection tuning, keeping the standard strategies.
    #[inline]
    pub fn detect(mut self, options: DetectOptions) -> Self {
        self.detector = ScoreLineDetector::new(options);
        self
    }

    /// Use a fully custom detector.
    #[inline]
    pub fn detector(mut self, detector: ScoreLineDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Collect debug points and an overlay.
    #[inline]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.include_debug = enabled;
        self
    }

    pub fn mode(&self) -> &CalibrationMode {
        &self.mode
    }

    /// Run the whole pipeline on `image`.
    ///
    /// Deterministic: the same image and configuration always produce the
    /// same result.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::InvalidInput`] for a zero-area image
    /// - [`ExtractError::InvalidCalibration`] for an invalid manual record
    /// - [`ExtractError::GridNotDetected`] in strict grid mode
    pub fn extract(&self, image: &PixelBuffer) -> Result<AnalysisResult, ExtractError> {
        if let CalibrationMode::Manual(manual) = &self.mode {
            manual.validate()?;
        }

        let prepared = Preprocessor::new(self.preprocess.clone()).process(image)?;
        let calibration =
            CalibrationResolver::new(self.grid.clone()).resolve(&prepared.edges, &self.mode)?;
        let scans = self
            .detector
            .detect_all(&prepared.enhanced, &prepared.working, &calibration);

        Ok(ResultAssembler::new(self.include_debug).assemble(
            scans,
            &calibration,
            image.width(),
            image.height(),
            prepared.scale,
        ))
    }
}
