use chart_scan::ManualCalibration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::ConfigError;

/// Calibration mode selected by name on the CLI or in an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ModeName {
    /// Rescaled fixed coordinate table
    #[default]
    Fixed,
    /// Detected grid, falling back to a fractional rectangle
    Grid,
    /// Detected grid, failing when none is found
    StrictGrid,
    /// Caller-supplied calibration
    Manual,
}

impl ModeName {
    pub fn as_str(self) -> &'static str {
        match self {
            ModeName::Fixed => "fixed",
            ModeName::Grid => "grid",
            ModeName::StrictGrid => "strict-grid",
            ModeName::Manual => "manual",
        }
    }
}

impl fmt::Display for ModeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "fixed-scaled" => Ok(ModeName::Fixed),
            "grid" | "detected-grid" => Ok(ModeName::Grid),
            "strict-grid" | "strict" => Ok(ModeName::StrictGrid),
            "manual" => Ok(ModeName::Manual),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

fn default_base_width() -> u32 {
    3000
}

fn default_base_height() -> u32 {
    1200
}

/// Manual calibration as stored in a file or sent over HTTP.
///
/// Field names accept both snake_case and the camelCase used by browser
/// clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ManualCalibrationConfig {
    /// Row of the 0% line in the base image
    #[serde(alias = "yZeroPercent", alias = "y0")]
    pub y_zero_percent: f64,

    /// Row of the 100% line in the base image
    #[serde(alias = "yHundredPercent", alias = "y100")]
    pub y_hundred_percent: f64,

    /// Topic column centres in the base image, left to right
    #[serde(alias = "xPositions")]
    pub x_positions: Vec<f64>,

    /// Width of the image the values were measured on
    #[serde(default = "default_base_width", alias = "baseWidth")]
    pub base_width: u32,

    /// Height of the image the values were measured on
    #[serde(default = "default_base_height", alias = "baseHeight")]
    pub base_height: u32,
}

impl Default for ManualCalibrationConfig {
    fn default() -> Self {
        Self {
            y_zero_percent: 911.0,
            y_hundred_percent: 580.0,
            x_positions: vec![
                500.0, 770.0, 1050.0, 1280.0, 1570.0, 1870.0, 2100.0, 2410.0, 2667.0, 2950.0,
            ],
            base_width: default_base_width(),
            base_height: default_base_height(),
        }
    }
}

impl ManualCalibrationConfig {
    /// Read a calibration file; `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }
}

impl From<ManualCalibrationConfig> for ManualCalibration {
    fn from(c: ManualCalibrationConfig) -> Self {
        ManualCalibration {
            y_zero_percent: c.y_zero_percent,
            y_hundred_percent: c.y_hundred_percent,
            x_positions: c.x_positions,
            base_width: c.base_width,
            base_height: c.base_height,
        }
    }
}
