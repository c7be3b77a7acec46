//! Command implementations for doclease.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the shared setup every lock command needs: loading
//! the config, opening the store and resolving the acting session.

mod init;
mod lease;
mod sweep;

#[cfg(test)]
mod tests;

use crate::cli::{Cli, Command};
use crate::config::{Config, StoreBackend};
use crate::error::{LeaseError, Result};
use crate::ids::SessionId;
use crate::locks::LockManager;
use std::path::Path;
use tracing::debug;

/// Everything a lock command runs against.
pub(crate) struct CommandContext {
    pub config: Config,
    pub manager: LockManager,
    pub json: bool,
}

impl CommandContext {
    /// Load the config at `config_path` (defaults if missing), apply the
    /// backend override and open the store.
    pub fn load(config_path: &Path, store: Option<StoreBackend>, json: bool) -> Result<Self> {
        let mut config = Config::load_or_default(config_path)?;
        if let Some(store) = store {
            config.store = store;
            config.validate()?;
        }

        debug!(
            config = %config_path.display(),
            store = ?config.store,
            store_dir = %config.store_dir,
            "opening lock store"
        );
        let manager = LockManager::from_config(&config)?;

        Ok(Self {
            config,
            manager,
            json,
        })
    }
}

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        config,
        store,
        json,
        command,
    } = cli;

    // `init` must work before any config or store exists.
    let open = || CommandContext::load(&config, store, json);

    match command {
        Command::Init(args) => init::cmd_init(&config, args),
        Command::Acquire(args) => lease::cmd_acquire(&open()?, args),
        Command::Release(args) => lease::cmd_release(&open()?, args),
        Command::Check(args) => lease::cmd_check(&open()?, args),
        Command::List => lease::cmd_list(&open()?),
        Command::Sweep(args) => sweep::cmd_sweep(&open()?, args),
    }
}

/// The session named on the command line, or `user@host`.
pub(crate) fn resolve_session(explicit: Option<String>) -> Result<SessionId> {
    match explicit {
        Some(raw) => SessionId::new(raw),
        None => SessionId::new(default_session_string()),
    }
}

fn default_session_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Turn a non-success API response into the matching CLI error.
pub(crate) fn response_error(status: u16, body: &serde_json::Value) -> LeaseError {
    let message = body
        .get("error")
        .or_else(|| body.get("message"))
        .and_then(|m| m.as_str())
        .unwrap_or("request failed")
        .to_string();

    match status {
        crate::api::STATUS_BAD_REQUEST => LeaseError::Validation(message),
        crate::api::STATUS_CONFLICT => LeaseError::Conflict(message),
        _ => LeaseError::StoreUnavailable(message),
    }
}
