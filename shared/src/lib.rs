//! Shared types and models for the weather proxy
//!
//! This crate holds the coordinate normalizer and the snapshot schema so they
//! can be used by the server and by any client tooling without pulling in the
//! HTTP stack.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
