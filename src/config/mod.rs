//! Configuration model for doclease.
//!
//! This module defines the Config struct that represents `doclease.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::{DEFAULT_CONFIG_FILE, MAX_DURATION_SECONDS, StoreBackend};
