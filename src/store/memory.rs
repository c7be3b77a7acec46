//! In-memory lock store.

use super::stripes::Stripes;
use super::{DEFAULT_STRIPES, LockStore};
use crate::error::Result;
use crate::ids::FileId;
use crate::locks::Lock;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Lease records held in a striped in-process map.
///
/// Not durable. Each instance is fully independent of every other.
#[derive(Debug)]
pub struct MemoryStore {
    stripes: Stripes<HashMap<FileId, Lock>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_stripes(DEFAULT_STRIPES)
    }

    pub fn with_stripes(count: usize) -> Self {
        Self {
            stripes: Stripes::new(count),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LockStore for MemoryStore {
    fn get(&self, file_id: &FileId) -> Result<Option<Lock>> {
        Ok(self.stripes.lock(file_id)?.get(file_id).cloned())
    }

    fn compare_and_swap(
        &self,
        file_id: &FileId,
        expected: Option<&Lock>,
        new: Option<&Lock>,
    ) -> Result<bool> {
        let mut shard = self.stripes.lock(file_id)?;
        if shard.get(file_id) != expected {
            return Ok(false);
        }

        match new {
            Some(lock) => {
                shard.insert(file_id.clone(), lock.clone());
            }
            None => {
                shard.remove(file_id);
            }
        }
        Ok(true)
    }

    fn list_all(&self, now: DateTime<Utc>) -> Result<Vec<FileId>> {
        let mut ids = Vec::new();
        for shard in self.stripes.each() {
            ids.extend(
                shard?
                    .values()
                    .filter(|lock| lock.is_active_at(now))
                    .map(|lock| lock.file_id.clone()),
            );
        }
        ids.sort();
        Ok(ids)
    }

    fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut removed = 0;
        for shard in self.stripes.each() {
            let mut shard = shard?;
            let before = shard.len();
            shard.retain(|_, lock| !lock.is_expired_at(cutoff));
            removed += before - shard.len();
        }
        Ok(removed)
    }
}
