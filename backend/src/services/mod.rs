//! Business logic services for the weather proxy

pub mod transform;
pub mod weather;

pub use transform::transform;
pub use weather::WeatherService;
