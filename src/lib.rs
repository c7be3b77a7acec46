//! Doclease: lease-based document locks for collaborative editing.
//!
//! A session takes a time-bounded lease on a document before editing it.
//! Leases are refreshed by re-acquiring, released explicitly, and lapse on
//! their own when the holder goes quiet. The crate is split into:
//!
//! - [`store`]: keyed persistence with an atomic compare-and-swap
//! - [`locks`]: the ownership and leasing rules on top of a store
//! - [`sweeper`]: background eviction of lapsed leases
//! - [`api`]: the request/response contract served to editors
//! - [`cli`] and [`commands`]: the `doclease` command line

pub mod api;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod ids;
pub mod locks;
pub mod store;
pub mod sweeper;

#[cfg(test)]
mod test_support;

pub use error::{LeaseError, Result};
pub use ids::{FileId, SessionId};
pub use locks::{AcquireOutcome, Lock, LockManager, LockStatus, ReleaseOutcome};
pub use store::{FileStore, LockStore, MemoryStore};
