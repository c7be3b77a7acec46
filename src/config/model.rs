//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for the lock service.
///
/// This struct represents the contents of `doclease.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Lease settings
    // =========================================================================
    /// Seconds a lease stays valid without a refresh.
    #[serde(default = "default_lease_ttl_seconds")]
    pub lease_ttl_seconds: u64,

    /// Seconds between background sweeps of expired leases.
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,

    // =========================================================================
    // Store settings
    // =========================================================================
    /// Lease store backend.
    #[serde(default)]
    pub store: StoreBackend,

    /// Directory of lease records for the file backend.
    #[serde(default = "default_store_dir")]
    pub store_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lease_ttl_seconds: default_lease_ttl_seconds(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
            store: StoreBackend::default(),
            store_dir: default_store_dir(),
        }
    }
}
