//! Calibration resolution.
//!
//! Produces the y-coordinates of the 0% and 100% lines plus one column
//! x-position per topic. Three interchangeable strategies are selected by
//! [`CalibrationMode`]:
//!
//! - **FixedScaled**: a [`CalibrationTemplate`] measured at a base
//!   resolution, rescaled per axis
//! - **DetectedGrid**: projection-profile peaks locate the plot rectangle,
//!   then two reference lines inside it are extrapolated to 0% and 100%
//! - **Manual**: a caller-supplied [`ManualCalibration`], validated and
//!   rescaled
//!
//! Only strict grid mode and invalid manual input can fail.

mod error;
mod grid;
mod manual;
mod points;
mod reference;
mod resolver;
mod template;

pub use error::CalibrationError;
pub use grid::{
    column_profile, find_peaks, locate_grid, row_profile, smooth, GridOptions, GridSearch, Peak,
};
pub use manual::ManualCalibration;
pub use points::{CalibrationPoints, CalibrationSource, DetectedLine, GridRect, ReferenceLine};
pub use reference::{calibrate_from_grid, choose_references, extrapolate, find_line_candidates};
pub use resolver::{CalibrationMode, CalibrationResolver};
pub use template::CalibrationTemplate;
