use crate::core::state::AppState;
use crate::utils::time::current_timestamp;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub storage: String,
}

/// Health check handler
///
/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            timestamp: current_timestamp(),
            storage: state.config.storage.backend.as_str().to_string(),
        }),
    )
}
