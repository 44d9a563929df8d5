//! Weather Proxy - caching reverse proxy for a weather data provider
//!
//! Coordinates are snapped to a 0.01° grid, served from the cache while fresh,
//! and fetched from the provider otherwise. The cache is optional: without it
//! every request goes upstream.

use std::{sync::Arc, time::Duration};

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod cache;
pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use cache::CacheStore;
use external::WeatherClient;
use services::WeatherService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: CacheStore,
    pub weather: WeatherService,
}

impl AppState {
    /// Connect the cache and build the provider client described by `config`
    pub async fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let cache = CacheStore::connect(config.cache.url.as_deref()).await;
        Self::with_cache(config, cache)
    }

    /// Build state around an already constructed cache adapter
    pub fn with_cache(config: Config, cache: CacheStore) -> Result<Self, reqwest::Error> {
        let weather_client = match &config.weather.api_key {
            Some(api_key) => Some(WeatherClient::new(
                api_key.clone(),
                config.weather.api_endpoint.clone(),
                Duration::from_secs(config.weather.timeout_seconds),
            )?),
            None => {
                tracing::warn!("Weather API key not configured, cache misses will fail");
                None
            }
        };

        let weather = WeatherService::new(
            weather_client,
            cache.clone(),
            Duration::from_secs(config.cache.ttl_seconds),
        );

        Ok(Self {
            config: Arc::new(config),
            cache,
            weather,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::api_routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
