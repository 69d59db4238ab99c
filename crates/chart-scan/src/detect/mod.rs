//! Per-topic score-line detection.
//!
//! For every topic a [`Roi`] is cut around the column's x-position, spanning
//! the calibrated range plus margins. The ordered strategies then run until
//! one accepts:
//!
//! 1. [`HundredMarker`]: dark marker near the 100% line
//! 2. [`DarkestLine`]: darkest centre-weighted row, printed lines skipped
//! 3. [`RedMarker`]: red-dominant row in the raw colours
//! 4. [`EdgeGradient`]: strongest vertical intensity step
//!
//! A topic where nothing is accepted is undetected. That is a normal
//! outcome, never an error, and it does not affect other topics.

mod band;
mod detector;
mod options;
mod roi;
mod strategies;

pub use band::{detect_band, ConfidenceBand};
pub use detector::{ColumnScan, ScoreLineDetector};
pub use options::{DetectOptions, MIN_ROI_WIDTH};
pub use roi::Roi;
pub use strategies::{
    default_strategies, ColumnContext, DarkestLine, EdgeGradient, HundredMarker, Probe, RedMarker,
    Strategy, StrategyKind,
};
