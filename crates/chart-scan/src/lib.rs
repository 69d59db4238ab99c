//! chart-scan: score extraction from rendered exam-score charts
//!
//! Turns a decoded chart image into one percentage per topic by locating
//! the chart's 0% and 100% lines, then finding each topic's score marker.
//!
//! # Quick Start
//!
//! ```
//! use chart_scan::{CalibrationMode, PixelBuffer, Rgba, ScoreExtractor, Topic};
//!
//! // 3000x1200 chart with a dark score bar top at 70% in every column.
//! let image = PixelBuffer::from_fn(3000, 1200, |_, y| {
//!     if y == 879 { Rgba::BLACK } else { Rgba::WHITE }
//! });
//!
//! let result = ScoreExtractor::new(CalibrationMode::default())
//!     .extract(&image)
//!     .unwrap();
//!
//! for (topic, score) in result.scores() {
//!     println!("{topic}: {score:?}");
//! }
//! assert_eq!(result.get(Topic::Economics).percentage, Some(70.1));
//! ```
//!
//! # Pipeline
//!
//! 1. [`Preprocessor`]: optional resample, grayscale, contrast enhancement,
//!    Sobel edges
//! 2. [`CalibrationResolver`]: 0%/100% lines and column positions from a
//!    template, the detected grid, or a manual record
//! 3. [`ScoreLineDetector`]: ordered strategy search per topic column
//! 4. [`PercentageMapper`]: row to percentage
//! 5. [`ResultAssembler`]: ordered [`AnalysisResult`] plus optional debug
//!    overlay
//!
//! Every stage is synchronous and allocates its own output, so a
//! [`ScoreExtractor`] can be shared across threads and re-run freely.
//!
//! # Failure model
//!
//! Only structural problems abort a run ([`ExtractError`]): an empty
//! image, an invalid calibration record, or a missing grid in strict mode.
//! A topic with no visible marker is reported with `percentage: None`.

pub mod api;
pub mod buffer;
pub mod calibration;
pub mod detect;
pub mod mapping;
pub mod output;
pub mod preprocess;
pub mod topics;

pub use api::{ExtractError, ScoreExtractor};
pub use buffer::{GrayBuffer, PixelBuffer, Rgba};
pub use calibration::{
    CalibrationError, CalibrationMode, CalibrationPoints, CalibrationResolver, CalibrationSource,
    CalibrationTemplate, DetectedLine, GridOptions, GridRect, ManualCalibration, ReferenceLine,
};
pub use detect::{
    ColumnScan, ConfidenceBand, DetectOptions, Probe, Roi, ScoreLineDetector, Strategy,
    StrategyKind,
};
pub use mapping::PercentageMapper;
pub use output::{
    AnalysisResult, DebugData, DebugPoint, Overlay, OverlayColor, OverlayShape, ResultAssembler,
    TopicScore,
};
pub use preprocess::{PreprocessOptions, Prepared, Preprocessor};
pub use topics::Topic;

#[cfg(test)]
mod domain_tests;
