use std::sync::Arc;

use axum::{extract::State, Json};
use base64::Engine;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{AnalysisReport, ManualCalibrationConfig, ModeName};
use crate::services::{decode_base64, AnalysisRequest, AnalysisService};

/// Request body for chart analysis
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// PNG or JPEG bytes, base64-encoded (a `data:` URL prefix is accepted)
    pub image: String,

    /// Calibration mode (default: fixed)
    #[serde(default)]
    pub mode: ModeName,

    /// Manual calibration, required for `manual` mode
    #[serde(default)]
    pub calibration: Option<ManualCalibrationConfig>,

    /// Return the debug overlay as base64 PNG
    #[serde(default)]
    pub include_debug_image: bool,

    /// Reject images outside the accepted upload sizes (default: true)
    #[serde(default)]
    pub enforce_dimensions: Option<bool>,
}

/// Analysis result
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub report: AnalysisReport,

    /// Debug overlay PNG, base64-encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_image: Option<String>,
}

impl From<AnalysisReport> for AnalyzeResponse {
    fn from(mut report: AnalysisReport) -> Self {
        let debug_image = report
            .debug_image_png
            .take()
            .map(|png| base64::engine::general_purpose::STANDARD.encode(png));
        Self {
            report,
            debug_image,
        }
    }
}

/// Extract topic scores from a chart image
///
/// Locates the 0% and 100% lines with the selected calibration mode and
/// reports one score per topic. Undetected topics have a null percentage.
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Scores extracted", body = AnalyzeResponse),
        (status = 400, description = "Malformed request or undecodable image"),
        (status = 422, description = "Dimension mismatch, invalid calibration or grid not found"),
        (status = 500, description = "Internal error")
    ),
    tag = "Analysis"
)]
pub async fn handle_analyze(
    State(service): State<Arc<AnalysisService>>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let bytes = decode_base64(&body.image).map_err(crate::error::AnalyzeError::from)?;
    let manual = body.calibration.map(Into::into);
    let mode = service.config().mode(body.mode, manual)?;

    let request = AnalysisRequest {
        mode,
        include_debug_image: body.include_debug_image,
        enforce_dimensions: service.enforce_dimensions(body.enforce_dimensions, true),
    };

    tracing::info!(
        mode = %body.mode,
        bytes = bytes.len(),
        debug_image = request.include_debug_image,
        enforce_dimensions = request.enforce_dimensions,
        "Analyze request"
    );

    let report = service.analyze_async(bytes, request).await?;
    Ok(Json(report.into()))
}
