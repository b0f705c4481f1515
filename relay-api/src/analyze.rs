use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use relay_verdict::{AnalyzeResponse, VerdictService};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Router for the analyze API.
pub fn analyze_router(service: Arc<VerdictService>) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn analyze(
    State(service): State<Arc<VerdictService>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Arc<AnalyzeResponse>>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let verdict = service.analyze(&req.text).await?;
    Ok(Json(verdict))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
