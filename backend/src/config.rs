//! Configuration management for the weather proxy
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with WXP_ prefix (`WXP__CACHE__URL`)
//! 4. Conventional variables: `PORT`, `REDIS_URL`, `CACHE_TTL`,
//!    `VISUAL_CROSSING_API_KEY`

use config::{ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 600;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_WEATHER_API_ENDPOINT: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Cache store configuration
    pub cache: CacheConfig,

    /// Upstream weather provider configuration
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Cache store URL (`redis://`, `rediss://` or `memory://`); caching is
    /// disabled when absent
    pub url: Option<String>,

    /// Lifetime of a cached snapshot in seconds
    pub ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: Option<String>,

    /// Upstream request timeout in seconds
    pub timeout_seconds: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WXP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.host", "0.0.0.0")?
            .set_default("cache.ttl_seconds", DEFAULT_CACHE_TTL_SECONDS as i64)?
            .set_default("weather.api_endpoint", DEFAULT_WEATHER_API_ENDPOINT)?
            .set_default("weather.timeout_seconds", DEFAULT_UPSTREAM_TIMEOUT_SECONDS as i64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WXP prefix)
            .add_source(
                Environment::with_prefix("WXP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Conventional deployment variables win over everything else
            .set_override_option("server.port", env_value("PORT"))?
            .set_override_option("cache.url", env_value("REDIS_URL"))?
            .set_override_option("cache.ttl_seconds", env_value("CACHE_TTL"))?
            .set_override_option("weather.api_key", env_value("VISUAL_CROSSING_API_KEY"))?
            .build()?;

        let config: Self = config.try_deserialize()?;
        Ok(config.normalized())
    }

    /// Treat blank credentials and URLs as not configured
    fn normalized(mut self) -> Self {
        self.cache.url = non_blank(self.cache.url);
        self.weather.api_key = non_blank(self.weather.api_key);
        self
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: None,
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_WEATHER_API_ENDPOINT.to_string(),
            api_key: None,
            timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}
