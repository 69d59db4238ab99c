use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chart_scan::ExtractError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Image data is empty")]
    Empty,

    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported or corrupt image: {0}")]
    Corrupt(String),

    #[error("Invalid base64 image data: {0}")]
    Base64(String),
}

#[derive(Debug, Error)]
pub enum DimensionError {
    #[error(
        "Image dimensions don't match any acceptable sizes. Your image is {width}×{height} pixels. \
         Acceptable dimensions (with {tolerance_percent}% tolerance): {accepted}"
    )]
    Mismatch {
        width: u32,
        height: u32,
        tolerance_percent: f64,
        accepted: String,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: usize, height: usize },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Label layer error: {0}")]
    SvgParse(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unknown calibration mode '{0}' (expected fixed, grid, strict-grid or manual)")]
    UnknownMode(String),

    #[error("Manual calibration mode requires calibration data")]
    MissingCalibration,
}

/// Everything that can stop one analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Dimensions(#[from] DimensionError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Analysis task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Config(_) => StatusCode::BAD_REQUEST,
            ApiError::Analyze(e) => match e {
                AnalyzeError::Decode(_) => StatusCode::BAD_REQUEST,
                AnalyzeError::Dimensions(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AnalyzeError::Extract(ExtractError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
                AnalyzeError::Extract(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AnalyzeError::Render(_) | AnalyzeError::Task(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
