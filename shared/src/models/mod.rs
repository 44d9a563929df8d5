//! Domain models for the weather proxy

mod weather;

pub use weather::*;
