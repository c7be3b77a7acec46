//! Lease acquisition, refresh, release and inspection.

use super::outcome::{AcquireOutcome, LockStatus, ReleaseOutcome};
use super::record::Lock;
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, MAX_DURATION_SECONDS};
use crate::error::{LeaseError, Result};
use crate::ids::{FileId, SessionId};
use crate::store::{self, LockStore};
use chrono::Duration;
use std::sync::Arc;
use tracing::debug;

/// Read-decide-write attempts per acquire: the first try plus one retry.
const MAX_ACQUIRE_ATTEMPTS: usize = 2;

/// Enforces ownership and leasing rules on top of a [`LockStore`].
///
/// Every decision is a function of the stored record, the inputs and the
/// clock, and every write is a single `compare_and_swap`. Expired records are
/// treated as absent here, whether or not the sweeper has removed them yet.
///
/// Managers are cheap to clone; clones share the store and the clock.
pub struct LockManager<S: LockStore + ?Sized = dyn LockStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<S: LockStore + ?Sized> Clone for LockManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            ttl: self.ttl,
        }
    }
}

impl LockManager {
    /// Build a manager over the store and lease TTL named by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = store::open_configured(config)?;
        Self::new(store, Arc::new(SystemClock), config.lease_ttl())
    }
}

impl<S: LockStore + ?Sized> LockManager<S> {
    /// Create a manager. `ttl` must be positive and at most one week.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, ttl: Duration) -> Result<Self> {
        if ttl <= Duration::zero() {
            return Err(LeaseError::Validation(format!(
                "lease TTL must be positive (got {}s)",
                ttl.num_seconds()
            )));
        }
        if ttl > Duration::seconds(MAX_DURATION_SECONDS as i64) {
            return Err(LeaseError::Validation(format!(
                "lease TTL must be at most {}s (got {}s)",
                MAX_DURATION_SECONDS,
                ttl.num_seconds()
            )));
        }
        Ok(Self { store, clock, ttl })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn lease_ttl(&self) -> Duration {
        self.ttl
    }

    /// Take or refresh the lease on `file_id` for `session`.
    ///
    /// Repeated calls by the owner extend the lease. Among concurrent first
    /// acquirers exactly one wins; a caller that loses the write race twice
    /// gets `Conflict`, never a silent success.
    pub fn acquire(&self, file_id: &FileId, session: &SessionId) -> Result<AcquireOutcome> {
        for attempt in 1..=MAX_ACQUIRE_ATTEMPTS {
            let now = self.clock.now();
            let current = self.store.get(file_id)?;

            let (next, refresh) = match &current {
                Some(lock) if lock.is_active_at(now) && !lock.is_owned_by(session) => {
                    debug!(%file_id, %session, owner = %lock.owner, "lease held by another session");
                    return Ok(AcquireOutcome::Conflict {
                        owner: Some(lock.owner.clone()),
                    });
                }
                Some(lock) if lock.is_active_at(now) => (lock.refreshed(now, self.ttl), true),
                Some(lapsed) => (Lock::reclaimed(lapsed, session.clone(), now, self.ttl), false),
                None => (
                    Lock::new(file_id.clone(), session.clone(), now, self.ttl),
                    false,
                ),
            };

            if self
                .store
                .compare_and_swap(file_id, current.as_ref(), Some(&next))?
            {
                debug!(%file_id, %session, refresh, expires_at = %next.expires_at, "lease acquired");
                return Ok(AcquireOutcome::Acquired(next));
            }

            debug!(%file_id, %session, attempt, "lost lease write race");
        }

        let now = self.clock.now();
        let owner = self
            .store
            .get(file_id)?
            .filter(|lock| lock.is_active_at(now))
            .map(|lock| lock.owner);
        Ok(AcquireOutcome::Conflict { owner })
    }

    /// Give up `session`'s lease on `file_id`.
    ///
    /// Releasing something that is not held (or already lapsed) is a no-op.
    /// A session whose lapsed lease was reclaimed by another session gets
    /// `AlreadyReleased`; any other non-owner gets `NotOwner` and the lease is
    /// left untouched.
    pub fn release(&self, file_id: &FileId, session: &SessionId) -> Result<ReleaseOutcome> {
        let now = self.clock.now();

        let lock = match self.store.get(file_id)? {
            Some(lock) if lock.is_active_at(now) => lock,
            _ => return Ok(ReleaseOutcome::AlreadyReleased),
        };

        if !lock.is_owned_by(session) {
            // The caller's own lease lapsed and was taken over: nothing of
            // theirs is left to release.
            if lock.reclaimed_from.as_ref() == Some(session) {
                debug!(%file_id, %session, owner = %lock.owner, "released lease already reclaimed");
                return Ok(ReleaseOutcome::AlreadyReleased);
            }
            debug!(%file_id, %session, owner = %lock.owner, "release refused for non-owner");
            return Ok(ReleaseOutcome::NotOwner { owner: lock.owner });
        }

        if self.store.compare_and_swap(file_id, Some(&lock), None)? {
            debug!(%file_id, %session, "lease released");
            Ok(ReleaseOutcome::Released)
        } else {
            // The record changed under us: it lapsed and was replaced or swept.
            debug!(%file_id, %session, "lease changed before release");
            Ok(ReleaseOutcome::AlreadyReleased)
        }
    }

    /// Whether `file_id` is locked *against* `session`.
    ///
    /// A session is never locked out by its own lease.
    pub fn check_lock(&self, file_id: &FileId, session: &SessionId) -> Result<LockStatus> {
        let is_locked = self
            .active(file_id)?
            .is_some_and(|lock| !lock.is_owned_by(session));
        Ok(LockStatus { is_locked })
    }

    /// Every file with an active lease, regardless of owner.
    pub fn list_locked(&self) -> Result<Vec<FileId>> {
        self.store.list_all(self.clock.now())
    }

    /// The active lease on `file_id`, if any.
    pub fn inspect(&self, file_id: &FileId) -> Result<Option<Lock>> {
        self.active(file_id)
    }

    fn active(&self, file_id: &FileId) -> Result<Option<Lock>> {
        let now = self.clock.now();
        Ok(self
            .store
            .get(file_id)?
            .filter(|lock| lock.is_active_at(now)))
    }
}
