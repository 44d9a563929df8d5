//! Reshape provider responses into the snapshot schema

use chrono::{DateTime, Utc};
use shared::{
    format_timestamp, CurrentConditions, DailyForecast, HourlyForecast, Location, RoundedCoordinate,
    WeatherSnapshot, MAX_DAILY_RECORDS, MAX_HOURLY_RECORDS,
};

use crate::external::weather::{RawConditions, RawDay, RawHour, RawProviderResponse};

/// Build a snapshot from a provider response. Pure; `now` stamps the result.
pub fn transform(
    raw: &RawProviderResponse,
    location: &RoundedCoordinate,
    cached: bool,
    now: DateTime<Utc>,
) -> WeatherSnapshot {
    WeatherSnapshot {
        location: Location {
            lat: location.latitude,
            lon: location.longitude,
            address: raw.resolved_address.clone(),
            timezone: raw.timezone.clone(),
        },
        current: raw
            .current_conditions
            .as_ref()
            .map(current_conditions)
            .unwrap_or_default(),
        hourly: hourly_forecast(&raw.days),
        daily: raw.days.iter().take(MAX_DAILY_RECORDS).map(daily_forecast).collect(),
        cached,
        timestamp: format_timestamp(now),
    }
}

fn current_conditions(raw: &RawConditions) -> CurrentConditions {
    CurrentConditions {
        temp: raw.temp,
        feels_like: raw.feels_like,
        humidity: raw.humidity,
        wind_speed: raw.wind_speed,
        condition: raw.conditions.clone(),
        icon: raw.icon.clone(),
        precip_prob: raw.precip_prob.unwrap_or(0.0),
    }
}

/// First 48 hours across the day buckets, in order
fn hourly_forecast(days: &[RawDay]) -> Vec<HourlyForecast> {
    days.iter()
        .flat_map(|day| day.hours.iter().map(move |hour| hourly_record(day, hour)))
        .take(MAX_HOURLY_RECORDS)
        .collect()
}

fn hourly_record(day: &RawDay, hour: &RawHour) -> HourlyForecast {
    HourlyForecast {
        time: format!("{}T{}", day.datetime, hour.datetime),
        temp: hour.temp,
        precip_prob: hour.precip_prob.unwrap_or(0.0),
        condition: hour.conditions.clone(),
        icon: hour.icon.clone(),
        humidity: hour.humidity,
        wind_speed: hour.wind_speed,
    }
}

fn daily_forecast(day: &RawDay) -> DailyForecast {
    DailyForecast {
        date: day.datetime.clone(),
        temp_max: day.temp_max,
        temp_min: day.temp_min,
        precip_prob: day.precip_prob.unwrap_or(0.0),
        condition: day.conditions.clone(),
        icon: day.icon.clone(),
        humidity: day.humidity,
        wind_speed: day.wind_speed,
    }
}
