//! Health check handlers

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use shared::format_timestamp;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub cache_connected: bool,
    pub timestamp: String,
}

/// Health check endpoint handler; reports cache connectivity and never fails
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        cache_connected: state.cache.is_connected(),
        timestamp: format_timestamp(Utc::now()),
    })
}
