//! Durable keyed storage for lease records.
//!
//! A store maps each `FileId` to at most one physical [`Lock`] record. Every
//! mutation goes through [`LockStore::compare_and_swap`], which applies a
//! write only if the stored record still matches what the caller last saw.
//! Stores never consult a clock; callers pass `now` or a cutoff explicitly.
//!
//! # Backends
//!
//! - [`MemoryStore`]: striped in-process map, for tests and ephemeral use.
//! - [`FileStore`]: one JSON file per lease in a directory, written atomically
//!   and surviving restarts.
//!
//! Both serialize conflicting writes to the same key through a striped set of
//! mutexes, so operations on unrelated files rarely contend.

mod file;
mod memory;
mod stripes;


use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::ids::FileId;
use crate::locks::Lock;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Number of independent key guards per store.
pub const DEFAULT_STRIPES: usize = 64;

/// Open the backend selected by `config`.
pub fn open_configured(config: &Config) -> Result<Arc<dyn LockStore>> {
    Ok(match config.store {
        StoreBackend::File => Arc::new(FileStore::open(&config.store_dir)?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    })
}

/// Keyed persistence for lease records.
pub trait LockStore: Send + Sync {
    /// The physical record for `file_id`, expired or not.
    fn get(&self, file_id: &FileId) -> Result<Option<Lock>>;

    /// Replace the record for `file_id` with `new` if and only if the stored
    /// record equals `expected` at the instant of the operation.
    ///
    /// `expected = None` means "no record"; `new = None` deletes. Returns
    /// `Ok(false)` without side effects when the expectation does not hold.
    fn compare_and_swap(
        &self,
        file_id: &FileId,
        expected: Option<&Lock>,
        new: Option<&Lock>,
    ) -> Result<bool>;

    /// File ids whose records are still active at `now`.
    fn list_all(&self, now: DateTime<Utc>) -> Result<Vec<FileId>>;

    /// Delete every record with `expires_at <= cutoff`, returning how many
    /// were removed. A record refreshed concurrently is left alone.
    fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
