//! Implementation of the `doclease init` command.

use crate::cli::InitArgs;
use crate::config::Config;
use crate::error::{LeaseError, Result};
use crate::fs::atomic_write_file;
use std::path::Path;
use tracing::info;

/// Write a config file holding every default.
///
/// Refuses to replace an existing file unless `--force` is given.
pub fn cmd_init(config_path: &Path, args: InitArgs) -> Result<()> {
    if config_path.exists() && !args.force {
        return Err(LeaseError::UserError(format!(
            "config file '{}' already exists.\n\n\
             To overwrite it with defaults, run:\n  doclease init --force",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            LeaseError::UserError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let config = Config::default();
    atomic_write_file(config_path, &config.to_yaml()?)?;
    info!(path = %config_path.display(), "wrote default config");

    println!("Wrote {}", config_path.display());
    println!("  lease_ttl_seconds:      {}", config.lease_ttl_seconds);
    println!("  sweep_interval_seconds: {}", config.sweep_interval_seconds);
    println!("  store:                  {:?}", config.store);
    println!("  store_dir:              {}", config.store_dir);

    Ok(())
}
