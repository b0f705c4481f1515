use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_verdict::AnalyzeError;
use relay_web::ScrapeError;
use serde_json::json;

/// Errors of the analyze API, rendered as `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Analyze(e) => match e {
                AnalyzeError::TextTooShort { .. } => StatusCode::BAD_REQUEST,
                AnalyzeError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                AnalyzeError::Upstream(_)
                | AnalyzeError::UnexpectedResponse(_)
                | AnalyzeError::Parse(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "api.analyze.failed");
        } else {
            tracing::info!(%status, error = %self, "api.analyze.rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Errors of the price API, rendered as `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum PriceApiError {
    #[error("No class name provided")]
    NoClassName,
    #[error("Price not found")]
    NotFound,
    #[error("Price source unavailable")]
    Fetch(#[from] ScrapeError),
}

impl PriceApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoClassName => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Fetch(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for PriceApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Self::Fetch(source) = &self {
            tracing::warn!(error = %source, "api.prices.fetch_failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
