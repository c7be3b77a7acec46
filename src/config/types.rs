//! Configuration types and defaults.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Upper bound on lease TTL and sweep interval (one week).
pub const MAX_DURATION_SECONDS: u64 = 7 * 24 * 60 * 60;

/// File name looked up when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "doclease.yaml";

/// Where lease records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum StoreBackend {
    /// One JSON file per lease under `store_dir` (default, durable).
    #[default]
    File,
    /// In-process map; leases vanish when the process exits.
    Memory,
}

// Default value functions for serde
pub(crate) fn default_lease_ttl_seconds() -> u64 {
    300
}
pub(crate) fn default_sweep_interval_seconds() -> u64 {
    60
}
pub(crate) fn default_store_dir() -> String {
    ".doclease/locks".to_string()
}
