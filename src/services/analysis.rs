//! Decode, validate, extract and render in one place.
//!
//! Shared by the CLI and the HTTP handlers. Extraction is CPU-bound, so
//! async callers go through [`AnalysisService::analyze_async`], which runs
//! the work on tokio's blocking pool.

use std::sync::Arc;
use std::time::Instant;

use chart_scan::{CalibrationMode, CalibrationSource, PixelBuffer};

use crate::error::AnalyzeError;
use crate::models::{AnalysisReport, AppConfig};
use crate::rendering::render_overlay;

use super::decoder::decode_image;
use super::dimensions::DimensionPolicy;

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub mode: CalibrationMode,
    /// Render the debug overlay to PNG
    pub include_debug_image: bool,
    /// Reject images outside the upload policy instead of warning
    pub enforce_dimensions: bool,
}

pub struct AnalysisService {
    config: AppConfig,
    policy: DimensionPolicy,
}

impl AnalysisService {
    pub fn new(config: AppConfig) -> Self {
        let policy = DimensionPolicy::from(&config.upload);
        Self { config, policy }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn policy(&self) -> &DimensionPolicy {
        &self.policy
    }

    /// Whether to enforce the upload policy when the caller did not say;
    /// the config file wins over `fallback`.
    pub fn enforce_dimensions(&self, requested: Option<bool>, fallback: bool) -> bool {
        requested.or(self.config.upload.enforce).unwrap_or(fallback)
    }

    /// Run the whole analysis on encoded image bytes.
    pub fn analyze_blocking(
        &self,
        bytes: &[u8],
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let image = decode_image(bytes, self.config.upload.max_bytes)?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            bytes = bytes.len(),
            "Decoded image"
        );
        self.analyze_image(&image, request)
    }

    /// Run the analysis on an already decoded image.
    pub fn analyze_image(
        &self,
        image: &PixelBuffer,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let start = Instant::now();
        let width = u32::try_from(image.width()).unwrap_or(u32::MAX);
        let height = u32::try_from(image.height()).unwrap_or(u32::MAX);

        let scale_factor = match self.policy.check(width, height) {
            Ok(scale) => Some(scale),
            Err(e) if request.enforce_dimensions => return Err(e.into()),
            Err(e) => {
                tracing::warn!(%e, "Continuing with unexpected image dimensions");
                None
            }
        };

        let extractor = self
            .config
            .extractor(request.mode.clone())
            .debug(request.include_debug_image);
        let result = extractor.extract(image)?;

        if result.calibration.source == CalibrationSource::GridFallback {
            tracing::warn!(
                width,
                height,
                "Chart grid not found, using fractional grid estimate"
            );
        }

        for score in &result.topics {
            tracing::debug!(
                topic = %score.topic,
                percentage = ?score.percentage,
                y = ?score.y,
                strategy = ?score.strategy.map(|s| s.as_str()),
                "Topic scanned"
            );
        }

        let mut report = AnalysisReport::from_result(&result, request.mode.name(), scale_factor);
        if let Some(debug) = &result.debug {
            report.debug_image_png = Some(render_overlay(image, &debug.overlay)?);
        }

        tracing::info!(
            mode = request.mode.name(),
            calibration = result.calibration.source.as_str(),
            detected = report.detected,
            total = report.scores.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Analysis complete"
        );

        Ok(report)
    }

    /// [`analyze_blocking`](Self::analyze_blocking) on the blocking pool.
    pub async fn analyze_async(
        self: Arc<Self>,
        bytes: Vec<u8>,
        request: AnalysisRequest,
    ) -> Result<AnalysisReport, AnalyzeError> {
        tokio::task::spawn_blocking(move || self.analyze_blocking(&bytes, &request))
            .await
            .map_err(|e| AnalyzeError::Task(e.to_string()))?
    }
}
