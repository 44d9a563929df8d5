//! Route definitions for the weather proxy

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root).fallback(handlers::not_found))
        .route(
            "/weather",
            get(handlers::get_weather).fallback(handlers::not_found),
        )
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
}
