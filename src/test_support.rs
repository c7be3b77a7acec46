use crate::clock::ManualClock;
use crate::ids::{FileId, SessionId};
use crate::locks::LockManager;
use crate::store::{LockStore, MemoryStore};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

/// Lease TTL used by test managers.
pub(crate) const TEST_TTL_SECS: i64 = 300;

pub(crate) fn file(raw: &str) -> FileId {
    FileId::new(raw).unwrap()
}

pub(crate) fn session(raw: &str) -> SessionId {
    SessionId::new(raw).unwrap()
}

/// A fixed, readable starting instant.
pub(crate) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

pub(crate) fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(epoch()))
}

/// A manager over `store` driven by a manual clock.
pub(crate) fn manager_over<S: LockStore + ?Sized>(
    store: Arc<S>,
    clock: &Arc<ManualClock>,
) -> LockManager<S> {
    LockManager::new(store, clock.clone(), Duration::seconds(TEST_TTL_SECS)).unwrap()
}

/// A manager over a fresh memory store, plus the clock driving it.
pub(crate) fn memory_manager() -> (LockManager<MemoryStore>, Arc<ManualClock>) {
    let clock = manual_clock();
    (manager_over(Arc::new(MemoryStore::new()), &clock), clock)
}
