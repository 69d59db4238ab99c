//! Upload size policy.
//!
//! Charts are exported at a fixed base size and commonly rescaled by a
//! handful of factors. An upload passes when both dimensions are within
//! the relative tolerance of one of those sizes.

use crate::error::DimensionError;
use crate::models::UploadConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionPolicy {
    pub base_width: u32,
    pub base_height: u32,
    pub tolerance_percent: f64,
    pub scale_factors: Vec<f64>,
}

impl Default for DimensionPolicy {
    fn default() -> Self {
        Self::from(&UploadConfig::default())
    }
}

impl From<&UploadConfig> for DimensionPolicy {
    fn from(c: &UploadConfig) -> Self {
        Self {
            base_width: c.base_width,
            base_height: c.base_height,
            tolerance_percent: c.tolerance_percent,
            scale_factors: c.scale_factors.clone(),
        }
    }
}

impl DimensionPolicy {
    /// Target sizes, one per scale factor.
    pub fn accepted_sizes(&self) -> Vec<(u32, u32)> {
        self.scale_factors
            .iter()
            .map(|s| {
                (
                    (self.base_width as f64 * s).round() as u32,
                    (self.base_height as f64 * s).round() as u32,
                )
            })
            .collect()
    }

    /// Scale factor the image matches.
    ///
    /// # Errors
    ///
    /// [`DimensionError::Mismatch`] listing the accepted sizes.
    pub fn check(&self, width: u32, height: u32) -> Result<f64, DimensionError> {
        let tolerance = self.tolerance_percent / 100.0;
        let within = |actual: u32, target: u32| {
            let target = target as f64;
            let actual = actual as f64;
            actual >= target * (1.0 - tolerance) && actual <= target * (1.0 + tolerance)
        };

        self.scale_factors
            .iter()
            .zip(self.accepted_sizes())
            .find(|(_, (w, h))| within(width, *w) && within(height, *h))
            .map(|(&scale, _)| scale)
            .ok_or_else(|| DimensionError::Mismatch {
                width,
                height,
                tolerance_percent: self.tolerance_percent,
                accepted: self
                    .accepted_sizes()
                    .iter()
                    .map(|(w, h)| format!("{w}×{h}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
