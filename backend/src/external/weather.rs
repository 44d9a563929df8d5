//! Weather API client for fetching weather data
//!
//! Integrates with the Visual Crossing timeline API. One request returns the
//! current conditions plus day buckets, each carrying its hourly records.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use shared::RoundedCoordinate;
use thiserror::Error;

/// Fields requested from the provider
pub const REQUESTED_ELEMENTS: &str =
    "datetime,temp,tempmax,tempmin,feelslike,humidity,precip,precipprob,windspeed,conditions,icon";

/// Blocks requested from the provider
pub const INCLUDED_BLOCKS: &str = "hours,current,days";

/// Failures talking to the weather provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("Weather API request timed out")]
    Timeout,

    #[error("Weather API error: {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Weather API request failed: {message}")]
    Unreachable { message: String },
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Timeline API response, as much of it as the proxy uses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProviderResponse {
    pub resolved_address: Option<String>,
    pub timezone: Option<String>,
    pub current_conditions: Option<RawConditions>,
    #[serde(default)]
    pub days: Vec<RawDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConditions {
    pub temp: Option<f64>,
    #[serde(rename = "feelslike")]
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    #[serde(rename = "windspeed")]
    pub wind_speed: Option<f64>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "precipprob")]
    pub precip_prob: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDay {
    #[serde(default)]
    pub datetime: String,
    #[serde(rename = "tempmax")]
    pub temp_max: Option<f64>,
    #[serde(rename = "tempmin")]
    pub temp_min: Option<f64>,
    #[serde(rename = "precipprob")]
    pub precip_prob: Option<f64>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
    pub humidity: Option<f64>,
    #[serde(rename = "windspeed")]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub hours: Vec<RawHour>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHour {
    #[serde(default)]
    pub datetime: String,
    pub temp: Option<f64>,
    #[serde(rename = "precipprob")]
    pub precip_prob: Option<f64>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
    pub humidity: Option<f64>,
    #[serde(rename = "windspeed")]
    pub wind_speed: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient with a bounded request timeout
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current conditions and forecast for a grid cell
    pub async fn fetch(&self, location: &RoundedCoordinate) -> Result<RawProviderResponse, UpstreamError> {
        let url = format!("{}/{}", self.base_url, location);
        tracing::debug!(%location, "Fetching weather from provider");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("unitGroup", "metric"),
                ("include", INCLUDED_BLOCKS),
                ("elements", REQUESTED_ELEMENTS),
                ("contentType", "json"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Unreachable {
            message: format!("Failed to parse weather response: {}", e),
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Unreachable {
            // without_url keeps the API key out of logs and responses
            message: err.without_url().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tokyo() -> RoundedCoordinate {
        RoundedCoordinate {
            latitude: Decimal::from_str("35.68").unwrap(),
            longitude: Decimal::from_str("139.65").unwrap(),
        }
    }

    fn client(base_url: &str, timeout: Duration) -> WeatherClient {
        WeatherClient::new("test_key".to_string(), base_url.to_string(), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_builds_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/35.68,139.65"))
            .and(query_param("unitGroup", "metric"))
            .and(query_param("include", "hours,current,days"))
            .and(query_param("contentType", "json"))
            .and(query_param("key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resolvedAddress": "Tokyo, Japan",
                "timezone": "Asia/Tokyo",
                "currentConditions": {"temp": 21.4, "feelslike": 21.0, "conditions": "Clear"},
                "days": [
                    {"datetime": "2024-05-01", "tempmax": 24.0, "hours": [
                        {"datetime": "00:00:00", "temp": 18.0}
                    ]}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let raw = client(&mock_server.uri(), Duration::from_secs(5))
            .fetch(&tokyo())
            .await
            .unwrap();

        assert_eq!(raw.resolved_address.as_deref(), Some("Tokyo, Japan"));
        assert_eq!(raw.current_conditions.unwrap().feels_like, Some(21.0));
        assert_eq!(raw.days.len(), 1);
        assert_eq!(raw.days[0].hours[0].datetime, "00:00:00");
    }

    #[tokio::test]
    async fn test_http_error_preserves_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server.uri(), Duration::from_secs(5))
            .fetch(&tokyo())
            .await;

        assert_eq!(
            result.unwrap_err(),
            UpstreamError::Http {
                status: 429,
                body: "Too many requests".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"days": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let result = client(&mock_server.uri(), Duration::from_millis(50))
            .fetch(&tokyo())
            .await;

        assert_eq!(result.unwrap_err(), UpstreamError::Timeout);
    }

    #[tokio::test]
    async fn test_malformed_body_is_unreachable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server.uri(), Duration::from_secs(5))
            .fetch(&tokyo())
            .await;

        assert!(matches!(result, Err(UpstreamError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        // nothing listens on port 9 locally
        let result = client("http://127.0.0.1:9", Duration::from_secs(5))
            .fetch(&tokyo())
            .await;

        match result {
            Err(UpstreamError::Unreachable { message }) => assert!(!message.contains("test_key")),
            other => panic!("expected unreachable, got {:?}", other),
        }
    }
}
