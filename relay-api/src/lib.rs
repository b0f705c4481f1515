//! HTTP surfaces of the relay services.
//!
//! - [`analyze`]: `POST /analyze` and `GET /health` over a [`relay_verdict::VerdictService`]
//! - [`prices`]: `GET /` and `POST /predict` over a [`relay_web::PriceSource`]
//! - [`error`]: status-code mapping for both
//!
//! Routers are plain `axum::Router`s wrapped in a `TraceLayer`; binding and
//! shutdown are left to the caller.
pub mod analyze;
pub mod error;
pub mod prices;

pub use analyze::analyze_router;
pub use prices::prices_router;
