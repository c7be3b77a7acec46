//! Striped per-key mutual exclusion.

use crate::error::{LeaseError, Result};
use crate::ids::FileId;
use std::hash::{BuildHasher, RandomState};
use std::sync::{Mutex, MutexGuard};

/// A fixed set of mutexes, each guarding the keys that hash to it.
#[derive(Debug)]
pub(crate) struct Stripes<T> {
    shards: Vec<Mutex<T>>,
    hasher: RandomState,
}

impl<T: Default> Stripes<T> {
    pub(crate) fn new(count: usize) -> Self {
        let count = count.max(1);
        Self {
            shards: (0..count).map(|_| Mutex::new(T::default())).collect(),
            hasher: RandomState::new(),
        }
    }
}

impl<T> Stripes<T> {
    /// Lock the stripe that owns `key`.
    pub(crate) fn lock(&self, key: &FileId) -> Result<MutexGuard<'_, T>> {
        let index = (self.hasher.hash_one(key) % self.shards.len() as u64) as usize;
        lock_shard(&self.shards[index])
    }

    /// Lock each stripe in turn, one at a time.
    pub(crate) fn each(&self) -> impl Iterator<Item = Result<MutexGuard<'_, T>>> {
        self.shards.iter().map(lock_shard)
    }
}

fn lock_shard<T>(shard: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    shard
        .lock()
        .map_err(|_| LeaseError::StoreUnavailable("lock table guard is poisoned".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_maps_to_same_stripe() {
        let stripes: Stripes<Vec<u32>> = Stripes::new(8);
        let key = FileId::new("doc-1").unwrap();

        stripes.lock(&key).unwrap().push(1);
        stripes.lock(&key).unwrap().push(2);

        assert_eq!(*stripes.lock(&key).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_each_visits_every_stripe() {
        let stripes: Stripes<u32> = Stripes::new(5);
        for guard in stripes.each() {
            *guard.unwrap() += 1;
        }
        let total: u32 = stripes.each().map(|g| *g.unwrap()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_zero_stripes_is_clamped() {
        let stripes: Stripes<()> = Stripes::new(0);
        assert!(stripes.lock(&FileId::new("x").unwrap()).is_ok());
    }
}
