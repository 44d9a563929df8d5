//! External API integrations

pub mod weather;

pub use weather::{RawProviderResponse, UpstreamError, WeatherClient};
