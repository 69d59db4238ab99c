pub mod calibration;
pub mod config;
pub mod report;

pub use calibration::{ManualCalibrationConfig, ModeName};
pub use config::{
    AppConfig, DetectionConfig, GridConfig, PreprocessConfig, TemplateConfig, UploadConfig,
};
pub use report::{AnalysisReport, CalibrationReport, DebugPointReport, ScoreEntry};
