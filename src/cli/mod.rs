//! CLI argument parsing for doclease.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::{DEFAULT_CONFIG_FILE, StoreBackend};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Doclease: lease-based document locks for collaborative editing.
///
/// Each lock is a lease owned by one session. Owners refresh it by acquiring
/// again; unrefreshed leases lapse after the configured TTL.
#[derive(Parser, Debug)]
#[command(name = "doclease")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the configured store backend.
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreBackend>,

    /// Print lock results as the JSON bodies served to editors.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for doclease.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config file.
    Init(InitArgs),

    /// Take or refresh the lease on a file.
    ///
    /// Exits with code 4 if another session holds the lease.
    Acquire(LeaseArgs),

    /// Give up the lease on a file.
    ///
    /// Releasing a lease that is not held succeeds. Exits with code 4 if
    /// another session holds the lease.
    Release(LeaseArgs),

    /// Report whether a file is locked against a session.
    Check(LeaseArgs),

    /// List every file with an active lease.
    List,

    /// Remove expired lease records.
    ///
    /// With --watch, keeps sweeping at the configured interval until killed.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct LeaseArgs {
    /// Opaque identifier of the document.
    pub file_id: String,

    /// Session acting on the lease (defaults to user@host).
    #[arg(long, env = "DOCLEASE_SESSION")]
    pub session: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SweepArgs {
    /// Keep sweeping in the foreground.
    #[arg(long)]
    pub watch: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
