//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::{MAX_DURATION_SECONDS, StoreBackend};
use crate::error::{LeaseError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(LeaseError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LeaseError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, otherwise use defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| LeaseError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            LeaseError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lease_ttl_seconds` and `sweep_interval_seconds` must be positive and
    ///   at most one week
    /// - `store_dir` must be non-empty for the file backend
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("lease_ttl_seconds", self.lease_ttl_seconds),
            ("sweep_interval_seconds", self.sweep_interval_seconds),
        ] {
            if value == 0 {
                return Err(LeaseError::UserError(format!(
                    "config validation failed: {} must be greater than 0",
                    name
                )));
            }
            if value > MAX_DURATION_SECONDS {
                return Err(LeaseError::UserError(format!(
                    "config validation failed: {} must be at most {} (found {})",
                    name, MAX_DURATION_SECONDS, value
                )));
            }
        }

        if self.store == StoreBackend::File && self.store_dir.trim().is_empty() {
            return Err(LeaseError::UserError(
                "config validation failed: store_dir must be set for the file store".to_string(),
            ));
        }

        Ok(())
    }

    /// Lease TTL as a chrono duration.
    pub fn lease_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.lease_ttl_seconds as i64)
    }

    /// Sweep interval as a std duration.
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_seconds)
    }
}
