//! Gateway Handlers
//!
//! Home page, health check, Prometheus exposition and the catch-all 404.
//!
//! # Endpoints
//! - `GET /` - Plain-text greeting naming the connected database
//! - `GET /health` - Basic health check
//! - `GET /metrics` - Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::application::dto::HealthResponse;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Home page
pub async fn home(State(state): State<AppState>) -> String {
    format!(
        "This is the home page of the social network API. Connected to database: {}",
        state.database_name
    )
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Prometheus metrics endpoint
pub async fn metrics_handler() -> Result<impl IntoResponse, AppError> {
    let body = metrics::gather_metrics()
        .map_err(|e| AppError::Internal(format!("Failed to encode metrics: {}", e)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    ))
}

/// Any route nothing else matched
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "Sorry :( we could not find the requested page.",
    )
}
