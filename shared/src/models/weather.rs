//! Weather snapshot returned to clients and stored in the cache

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum number of hourly records in a snapshot
pub const MAX_HOURLY_RECORDS: usize = 48;

/// Maximum number of daily records in a snapshot
pub const MAX_DAILY_RECORDS: usize = 7;

/// Stable-schema weather payload for one cache cell.
///
/// `cached` and `timestamp` describe the response event, not the original
/// fetch, and are rewritten every time a snapshot is served.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
    pub cached: bool,
    pub timestamp: String,
}

impl WeatherSnapshot {
    /// Restamp the snapshot for the response being served now
    pub fn restamp(mut self, cached: bool, now: DateTime<Utc>) -> Self {
        self.cached = cached;
        self.timestamp = format_timestamp(now);
        self
    }
}

/// ISO-8601 timestamp with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Rounded location of the snapshot, plus what the provider resolved it to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(with = "rust_decimal::serde::float")]
    pub lat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub lon: Decimal,
    pub address: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub condition: Option<String>,
    pub icon: Option<String>,
    pub precip_prob: f64,
}

/// One hour of forecast; `time` is `<date>T<hh:mm:ss>` in the location's zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecast {
    pub time: String,
    pub temp: Option<f64>,
    pub precip_prob: f64,
    pub condition: Option<String>,
    pub icon: Option<String>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precip_prob: f64,
    pub condition: Option<String>,
    pub icon: Option<String>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            location: Location {
                lat: Decimal::from_str("35.68").unwrap(),
                lon: Decimal::from_str("139.65").unwrap(),
                address: Some("Tokyo, Japan".to_string()),
                timezone: Some("Asia/Tokyo".to_string()),
            },
            current: CurrentConditions {
                temp: Some(21.4),
                feels_like: Some(21.0),
                humidity: Some(60.2),
                wind_speed: Some(11.2),
                condition: Some("Partially cloudy".to_string()),
                icon: Some("partly-cloudy-day".to_string()),
                precip_prob: 0.0,
            },
            hourly: vec![],
            daily: vec![],
            cached: false,
            timestamp: "2024-05-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_serializes_camel_case_schema() {
        let json = serde_json::to_value(snapshot()).unwrap();

        assert_eq!(json["location"]["lat"], serde_json::json!(35.68));
        assert_eq!(json["location"]["lon"], serde_json::json!(139.65));
        assert_eq!(json["current"]["feelsLike"], serde_json::json!(21.0));
        assert_eq!(json["current"]["windSpeed"], serde_json::json!(11.2));
        assert_eq!(json["current"]["precipProb"], serde_json::json!(0.0));
        assert_eq!(json["cached"], serde_json::json!(false));
    }

    #[test]
    fn test_restamp_overwrites_response_fields() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        let restamped = snapshot().restamp(true, now);

        assert!(restamped.cached);
        assert_eq!(restamped.timestamp, "2024-06-01T08:30:00.000Z");
        assert_eq!(restamped.location, snapshot().location);
    }

    #[test]
    fn test_cached_form_reads_back() {
        let original = snapshot();
        let stored = serde_json::to_string(&original).unwrap();
        let read: WeatherSnapshot = serde_json::from_str(&stored).unwrap();
        assert_eq!(read, original);
    }
}
