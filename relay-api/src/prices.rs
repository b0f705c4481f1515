use crate::error::PriceApiError;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use relay_web::PriceSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const WELCOME: &str = "Welcome to the Teachable Machine Image Model API!";

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub class_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub class_name: String,
    pub price: String,
}

/// Router for the price API.
///
/// The page is fetched on every `/predict`; `class_name` is echoed back and
/// does not influence which price is picked.
pub fn prices_router(source: Arc<dyn PriceSource>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .layer(TraceLayer::new_for_http())
        .with_state(source)
}

async fn home() -> &'static str {
    WELCOME
}

async fn predict(
    State(source): State<Arc<dyn PriceSource>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, PriceApiError> {
    let class_name = payload
        .ok()
        .and_then(|Json(req)| req.class_name)
        .filter(|name| !name.is_empty())
        .ok_or(PriceApiError::NoClassName)?;

    let price = source.fetch_price().await?.ok_or(PriceApiError::NotFound)?;
    tracing::info!(class_name = %class_name, price = %price, "api.prices.predict");
    Ok(Json(PredictResponse { class_name, price }))
}
