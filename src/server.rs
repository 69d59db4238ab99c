//! Shared server setup.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api;
use crate::error::ApiError;
use crate::models::{self, AppConfig};
use crate::services::AnalysisService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<AnalysisService>,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> AppState {
    AppState {
        analysis: Arc::new(AnalysisService::new(config)),
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chartscore API",
        description = "Per-topic score extraction from exam-score chart images",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_analyze),
    components(schemas(
        api::AnalyzeRequest,
        api::AnalyzeResponse,
        models::AnalysisReport,
        models::ScoreEntry,
        models::CalibrationReport,
        models::DebugPointReport,
        models::report::ReferenceLineReport,
        models::report::GridReport,
        models::ManualCalibrationConfig,
        models::ModeName,
    )),
    tags(
        (name = "Analysis", description = "Chart score extraction")
    )
)]
pub struct ApiDoc;

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = request_body_limit(state.analysis.config().upload.max_bytes);

    Router::new()
        .route("/api/analyze", post(handle_analyze))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}

/// Slack for the JSON envelope around the base64 image.
const ENVELOPE_BYTES: usize = 64 * 1024;

/// Largest request body for an upload of `max_bytes`: base64 inflates it by
/// a third. Saturates instead of wrapping for huge configured limits.
pub fn request_body_limit(max_bytes: usize) -> usize {
    max_bytes
        .div_ceil(3)
        .saturating_mul(4)
        .saturating_add(ENVELOPE_BYTES)
}

async fn handle_analyze(
    State(state): State<AppState>,
    body: Json<api::AnalyzeRequest>,
) -> Result<Json<api::AnalyzeResponse>, ApiError> {
    api::handle_analyze(State(state.analysis), body).await
}
