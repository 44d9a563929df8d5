//! Weather lookup: cache first, provider on a miss

use std::time::Duration;

use chrono::Utc;
use shared::{round, validate, RoundedCoordinate, WeatherSnapshot};

use crate::cache::CacheStore;
use crate::error::{AppError, AppResult};
use crate::external::weather::WeatherClient;
use crate::services::transform::transform;

/// Weather service composing the normalizer, cache and provider client
#[derive(Clone)]
pub struct WeatherService {
    weather_client: Option<WeatherClient>,
    cache: CacheStore,
    ttl: Duration,
}

impl WeatherService {
    /// `weather_client` is `None` when no API key is configured
    pub fn new(weather_client: Option<WeatherClient>, cache: CacheStore, ttl: Duration) -> Self {
        Self {
            weather_client,
            cache,
            ttl,
        }
    }

    /// Resolve a snapshot for raw `lat`/`lon` query values
    pub async fn get_weather(&self, lat: Option<&str>, lon: Option<&str>) -> AppResult<WeatherSnapshot> {
        let coord = validate(lat, lon)?;
        let cell = round(&coord);
        let key = cell.cache_key();

        if self.cache.is_enabled() {
            if let Some(snapshot) = self.read_cached(&key).await {
                tracing::debug!(%key, "Cache hit");
                return Ok(snapshot);
            }
            tracing::debug!(%key, "Cache miss");
        }

        let snapshot = self.fetch_fresh(&cell).await?;

        if self.cache.is_enabled() {
            self.store(&key, &snapshot).await;
        }

        Ok(snapshot)
    }

    async fn read_cached(&self, key: &str) -> Option<WeatherSnapshot> {
        let stored = self.cache.get(key).await?;
        match serde_json::from_str::<WeatherSnapshot>(&stored) {
            Ok(snapshot) => Some(snapshot.restamp(true, Utc::now())),
            Err(e) => {
                tracing::warn!(%key, error = %e, "Discarding unreadable cache entry");
                None
            }
        }
    }

    async fn fetch_fresh(&self, cell: &RoundedCoordinate) -> AppResult<WeatherSnapshot> {
        let client = self.weather_client.as_ref().ok_or(AppError::CredentialMissing)?;
        let raw = client.fetch(cell).await?;
        Ok(transform(&raw, cell, false, Utc::now()))
    }

    async fn store(&self, key: &str, snapshot: &WeatherSnapshot) {
        let payload = match serde_json::to_string(snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(%key, error = %e, "Failed to serialize snapshot for cache");
                return;
            }
        };
        if !self.cache.set_with_expiry(key, &payload, self.ttl).await {
            tracing::warn!(%key, "Snapshot not cached");
        }
    }
}
