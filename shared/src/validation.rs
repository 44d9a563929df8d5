//! Validation of raw coordinate query parameters
//!
//! Query values arrive as untyped strings. They must parse as finite numbers
//! and are then kept as exact decimals, so that neither the range check nor
//! rounding to the cache grid depends on binary floating point representation.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Coordinate;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Reasons a coordinate pair is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid coordinates: lat and lon must be valid numbers")]
    InvalidFormat,

    #[error("Latitude must be between -90 and 90")]
    LatitudeOutOfRange,

    #[error("Longitude must be between -180 and 180")]
    LongitudeOutOfRange,
}

/// Validate raw latitude/longitude values.
///
/// Missing values count as unparseable. Latitude is checked before longitude.
pub fn validate(lat_raw: Option<&str>, lon_raw: Option<&str>) -> Result<Coordinate, ValidationError> {
    let lat = parse_component(lat_raw)?;
    let lon = parse_component(lon_raw)?;

    if !lat.within(MIN_LATITUDE, MAX_LATITUDE) {
        return Err(ValidationError::LatitudeOutOfRange);
    }
    if !lon.within(MIN_LONGITUDE, MAX_LONGITUDE) {
        return Err(ValidationError::LongitudeOutOfRange);
    }

    Ok(Coordinate::new(lat.to_decimal()?, lon.to_decimal()?))
}

/// A parsed query value: exact when the text fits a `Decimal`, otherwise only
/// the binary approximation is known
struct Component {
    exact: Option<Decimal>,
    approx: f64,
}

impl Component {
    fn within(&self, min: f64, max: f64) -> bool {
        match self.exact {
            Some(value) => match (Decimal::try_from(min), Decimal::try_from(max)) {
                (Ok(min), Ok(max)) => (min..=max).contains(&value),
                _ => false,
            },
            None => (min..=max).contains(&self.approx),
        }
    }

    fn to_decimal(&self) -> Result<Decimal, ValidationError> {
        self.exact
            .or_else(|| Decimal::try_from(self.approx).ok())
            .ok_or(ValidationError::InvalidFormat)
    }
}

fn parse_component(raw: Option<&str>) -> Result<Component, ValidationError> {
    let text = raw.map(str::trim).unwrap_or_default();
    let approx = text
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::InvalidFormat)?;
    let exact = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok();
    Ok(Component { exact, approx })
}
