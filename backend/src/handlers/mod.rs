//! HTTP handlers

pub mod health;
pub mod weather;

pub use health::health_check;
pub use weather::get_weather;

use crate::error::AppError;

/// Root endpoint
pub async fn root() -> &'static str {
    concat!("Weather Proxy v", env!("CARGO_PKG_VERSION"))
}

/// Fallback for unknown routes and methods
pub async fn not_found() -> AppError {
    AppError::NotFound
}
