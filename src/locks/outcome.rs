//! Typed results of lock manager operations.

use super::record::Lock;
use crate::ids::SessionId;
use serde::Serialize;

/// Result of [`LockManager::acquire`](super::LockManager::acquire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The caller now holds the lease (fresh or refreshed).
    Acquired(Lock),

    /// Another session holds the lease, or the caller lost a write race.
    ///
    /// `owner` is `None` only when a repeated lost race left no active record
    /// to attribute the conflict to.
    Conflict { owner: Option<SessionId> },
}

impl AcquireOutcome {
    pub fn is_acquired(&self) -> bool {
        matches!(self, AcquireOutcome::Acquired(_))
    }
}

/// Result of [`LockManager::release`](super::LockManager::release).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The caller's lease was removed.
    Released,

    /// There was no active lease to release.
    AlreadyReleased,

    /// An active lease exists but belongs to another session; it is untouched.
    NotOwner { owner: SessionId },
}

impl ReleaseOutcome {
    /// Wire name of the outcome.
    pub fn action(&self) -> &'static str {
        match self {
            ReleaseOutcome::Released => "released",
            ReleaseOutcome::AlreadyReleased => "already_released",
            ReleaseOutcome::NotOwner { .. } => "not_owner",
        }
    }
}

/// Ownership-relative view of a file's lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockStatus {
    /// True only when a different session holds an active lease.
    pub is_locked: bool,
}
