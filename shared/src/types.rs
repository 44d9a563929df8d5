//! Coordinate types used across the proxy

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places kept when bucketing coordinates into cache cells.
///
/// Two places gives cells of roughly 1.1 km at the equator.
pub const COORDINATE_PRECISION: u32 = 2;

/// Prefix of every cache key written by the proxy
pub const CACHE_KEY_PREFIX: &str = "weather";

/// A validated latitude/longitude pair, held exactly as parsed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coordinate {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl Coordinate {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A coordinate snapped to the cache grid.
///
/// Both components always carry exactly [`COORDINATE_PRECISION`] decimal
/// places, so their `Display` output is stable and suitable for cache keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RoundedCoordinate {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl RoundedCoordinate {
    /// Cache key for this cell, e.g. `weather:35.68:139.65`
    pub fn cache_key(&self) -> String {
        format!("{}:{}:{}", CACHE_KEY_PREFIX, self.latitude, self.longitude)
    }
}

impl fmt::Display for RoundedCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Snap a coordinate to the cache grid.
///
/// Rounds half away from zero on the exact decimal value (`35.675 -> 35.68`,
/// `-35.675 -> -35.68`). Rounding an already rounded value is a no-op.
pub fn round(coord: &Coordinate) -> RoundedCoordinate {
    RoundedCoordinate {
        latitude: round_component(coord.latitude),
        longitude: round_component(coord.longitude),
    }
}

fn round_component(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(
        COORDINATE_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    );
    rounded.rescale(COORDINATE_PRECISION);
    // keys must never contain "-0.00"
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn coord(lat: &str, lon: &str) -> Coordinate {
        Coordinate::new(Decimal::from_str(lat).unwrap(), Decimal::from_str(lon).unwrap())
    }

    #[test]
    fn test_nearby_points_share_a_cell() {
        let a = round(&coord("35.6812", "139.6545"));
        let b = round(&coord("35.6789", "139.6523"));

        assert_eq!(a, b);
        assert_eq!(a.cache_key(), "weather:35.68:139.65");
        assert_eq!(b.cache_key(), "weather:35.68:139.65");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        let rounded = round(&coord("35.675", "-35.675"));
        assert_eq!(rounded.latitude.to_string(), "35.68");
        assert_eq!(rounded.longitude.to_string(), "-35.68");
    }

    #[test]
    fn test_key_always_has_two_decimals() {
        let rounded = round(&coord("10", "-0.5"));
        assert_eq!(rounded.cache_key(), "weather:10.00:-0.50");
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        let rounded = round(&coord("-0.001", "-0.004"));
        assert_eq!(rounded.cache_key(), "weather:0.00:0.00");
    }

    #[test]
    fn test_display_is_upstream_location() {
        let rounded = round(&coord("51.5074", "-0.1278"));
        assert_eq!(rounded.to_string(), "51.51,-0.13");
    }

    #[test]
    fn test_round_is_idempotent_at_bounds() {
        let rounded = round(&coord("-90", "180"));
        let again = round(&Coordinate::new(rounded.latitude, rounded.longitude));
        assert_eq!(rounded, again);
    }
}
