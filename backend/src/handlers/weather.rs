//! HTTP handler for weather lookups

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{ValidationError, WeatherSnapshot};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Raw query parameters; validation happens in the service so that
/// malformed values produce the normalizer's messages
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// `GET /weather?lat=<float>&lon=<float>`
pub async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> AppResult<Json<WeatherSnapshot>> {
    // Duplicate keys and similar query string faults are malformed coordinates
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable query string");
        AppError::Validation(ValidationError::InvalidFormat)
    })?;
    let snapshot = state
        .weather
        .get_weather(query.lat.as_deref(), query.lon.as_deref())
        .await?;
    Ok(Json(snapshot))
}
