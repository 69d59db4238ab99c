use chart_scan::{
    CalibrationMode, CalibrationTemplate, DetectOptions, GridOptions, ManualCalibration,
    PreprocessOptions, ScoreExtractor,
};
use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::ModeName;

/// Application configuration loaded from a YAML file.
///
/// Every section and field is optional; omitted values fall back to the
/// extraction defaults.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Coordinate table for fixed calibration
    pub template: TemplateConfig,

    /// Score-line search tuning
    pub detection: DetectionConfig,

    /// Resampling and contrast tuning
    pub preprocess: PreprocessConfig,

    /// Grid and reference-line search tuning
    pub grid: GridConfig,

    /// Upload dimension policy
    pub upload: UploadConfig,
}

/// Fixed calibration table measured at `base_width` x `base_height`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TemplateConfig {
    pub base_width: u32,
    pub base_height: u32,
    pub y_zero: f64,
    pub y_hundred: f64,
    pub x_positions: Vec<f64>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        let t = CalibrationTemplate::default();
        Self {
            base_width: t.base_width(),
            base_height: t.base_height(),
            y_zero: t.y_zero(),
            y_hundred: t.y_hundred(),
            x_positions: t.x_positions().to_vec(),
        }
    }
}

impl TemplateConfig {
    /// Validated template; an invalid table logs a warning and falls back
    /// to the built-in one.
    pub fn resolve(&self) -> CalibrationTemplate {
        match CalibrationTemplate::new(
            self.base_width,
            self.base_height,
            self.y_zero,
            self.y_hundred,
            self.x_positions.clone(),
        ) {
            Ok(template) => template,
            Err(e) => {
                tracing::warn!(%e, "Invalid calibration template in config, using built-in table");
                CalibrationTemplate::default()
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    pub roi_width: usize,
    pub top_margin: usize,
    pub bottom_margin: usize,
    pub line_exclusion: usize,
    pub hundred_above: usize,
    pub hundred_below: usize,
    pub dark_pixel_threshold: u8,
    pub hundred_acceptance: f64,
    pub darkest_acceptance: f64,
    pub red_acceptance: f64,
    pub edge_acceptance: f64,
    pub detect_band: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let o = DetectOptions::default();
        Self {
            roi_width: o.roi_width,
            top_margin: o.top_margin,
            bottom_margin: o.bottom_margin,
            line_exclusion: o.line_exclusion,
            hundred_above: o.hundred_above,
            hundred_below: o.hundred_below,
            dark_pixel_threshold: o.dark_pixel_threshold,
            hundred_acceptance: o.hundred_acceptance,
            darkest_acceptance: o.darkest_acceptance,
            red_acceptance: o.red_acceptance,
            edge_acceptance: o.edge_acceptance,
            detect_band: o.detect_band,
        }
    }
}

impl From<&DetectionConfig> for DetectOptions {
    fn from(c: &DetectionConfig) -> Self {
        DetectOptions {
            hundred_above: c.hundred_above,
            hundred_below: c.hundred_below,
            dark_pixel_threshold: c.dark_pixel_threshold,
            hundred_acceptance: c.hundred_acceptance,
            darkest_acceptance: c.darkest_acceptance,
            red_acceptance: c.red_acceptance,
            edge_acceptance: c.edge_acceptance,
            ..DetectOptions::new()
        }
        .roi_width(c.roi_width)
        .margins(c.top_margin, c.bottom_margin)
        .line_exclusion(c.line_exclusion)
        .detect_band(c.detect_band)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Resample to this width (requires `working_height`)
    pub working_width: Option<u32>,
    pub working_height: Option<u32>,
    pub gamma: f64,
    pub adaptive_window: usize,
    pub adaptive_c: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        let o = PreprocessOptions::default();
        Self {
            working_width: None,
            working_height: None,
            gamma: o.gamma,
            adaptive_window: o.adaptive_window,
            adaptive_c: o.adaptive_c,
        }
    }
}

impl From<&PreprocessConfig> for PreprocessOptions {
    fn from(c: &PreprocessConfig) -> Self {
        let options = PreprocessOptions::new()
            .gamma(c.gamma)
            .adaptive_window(c.adaptive_window)
            .adaptive_c(c.adaptive_c);
        match (c.working_width, c.working_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => options.working_size(w, h),
            (None, None) => options,
            _ => {
                tracing::warn!(
                    width = ?c.working_width,
                    height = ?c.working_height,
                    "Incomplete working size in config, keeping source resolution"
                );
                options
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub edge_threshold: u8,
    pub smoothing_window: usize,
    pub peak_factor: f64,
    pub min_peak_separation: usize,
    pub upper_reference: f64,
    pub lower_reference: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        let o = GridOptions::default();
        Self {
            edge_threshold: o.edge_threshold,
            smoothing_window: o.smoothing_window,
            peak_factor: o.peak_factor,
            min_peak_separation: o.min_peak_separation,
            upper_reference: o.upper_reference,
            lower_reference: o.lower_reference,
        }
    }
}

impl From<&GridConfig> for GridOptions {
    fn from(c: &GridConfig) -> Self {
        GridOptions::new()
            .edge_threshold(c.edge_threshold)
            .smoothing_window(c.smoothing_window)
            .peak_factor(c.peak_factor)
            .min_peak_separation(c.min_peak_separation)
            .reference_percentages(c.upper_reference, c.lower_reference)
    }
}

/// Accepted upload sizes: the base size times one of the scale factors,
/// within a relative tolerance.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    pub base_width: u32,
    pub base_height: u32,
    pub tolerance_percent: f64,
    pub scale_factors: Vec<f64>,
    /// Reject mismatching uploads; unset leaves the choice to the caller
    pub enforce: Option<bool>,
    /// Largest encoded image accepted, in bytes
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_width: 5100,
            base_height: 3300,
            tolerance_percent: 5.0,
            scale_factors: vec![0.25, 0.5, 1.0, 1.5, 2.0],
            enforce: None,
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Read and parse a configuration file.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration, falling back to defaults when the file is
    /// missing or invalid.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    template_base = %format!(
                        "{}x{}",
                        config.template.base_width, config.template.base_height
                    ),
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from an optional path, else from `CONFIG_FILE`, else defaults.
    pub fn load_optional(path: Option<&Path>) -> Self {
        let from_env = std::env::var("CONFIG_FILE").ok();
        match path.or(from_env.as_deref().map(Path::new)) {
            Some(p) => Self::load(p),
            None => Self::default(),
        }
    }

    /// Resolve a mode name into a core calibration mode.
    ///
    /// `Manual` requires `manual`; the other modes ignore it.
    pub fn mode(
        &self,
        name: ModeName,
        manual: Option<ManualCalibration>,
    ) -> Result<CalibrationMode, ConfigError> {
        match name {
            ModeName::Fixed => Ok(CalibrationMode::FixedScaled(self.template.resolve())),
            ModeName::Grid => Ok(CalibrationMode::DetectedGrid { strict: false }),
            ModeName::StrictGrid => Ok(CalibrationMode::DetectedGrid { strict: true }),
            ModeName::Manual => manual
                .map(CalibrationMode::Manual)
                .ok_or(ConfigError::MissingCalibration),
        }
    }

    /// Extractor configured from this file for `mode`.
    pub fn extractor(&self, mode: CalibrationMode) -> ScoreExtractor {
        ScoreExtractor::new(mode)
            .preprocess((&self.preprocess).into())
            .grid((&self.grid).into())
            .detect((&self.detection).into())
    }
}
