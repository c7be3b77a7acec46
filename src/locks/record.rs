//! The lease record persisted by lock stores.

use crate::ids::{FileId, SessionId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A time-bounded exclusive claim on a file by one session.
///
/// A record whose `expires_at` has passed is logically absent even while it
/// is still physically present in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    /// The leased file.
    pub file_id: FileId,

    /// Session currently holding the lease.
    pub owner: SessionId,

    /// First acquisition in the current lease period (RFC3339).
    pub acquired_at: DateTime<Utc>,

    /// Instant after which the lease is stale (RFC3339).
    pub expires_at: DateTime<Utc>,

    /// Session whose lapsed lease this one replaced, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclaimed_from: Option<SessionId>,
}

impl Lock {
    /// Start a fresh lease at `now`.
    pub fn new(file_id: FileId, owner: SessionId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            file_id,
            owner,
            acquired_at: now,
            expires_at: now + ttl,
            reclaimed_from: None,
        }
    }

    /// Start a fresh lease for `owner` over a record that has lapsed.
    ///
    /// Remembers the previous holder when it was a different session.
    pub fn reclaimed(lapsed: &Lock, owner: SessionId, now: DateTime<Utc>, ttl: Duration) -> Self {
        let previous = (!lapsed.is_owned_by(&owner)).then(|| lapsed.owner.clone());
        Self {
            reclaimed_from: previous,
            ..Self::new(lapsed.file_id.clone(), owner, now, ttl)
        }
    }

    /// The same lease extended to `now + ttl`.
    ///
    /// Never shortens the remaining lease.
    pub fn refreshed(&self, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            expires_at: self.expires_at.max(now + ttl),
            ..self.clone()
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now)
    }

    pub fn is_owned_by(&self, session: &SessionId) -> bool {
        &self.owner == session
    }

    /// Time left on the lease, clamped at zero.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }

    /// Format the remaining lease as a short human-readable string.
    pub fn remaining_string(&self, now: DateTime<Utc>) -> String {
        let remaining = self.remaining_at(now);
        let seconds = remaining.num_seconds();
        let minutes = remaining.num_minutes();
        let hours = remaining.num_hours();

        if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds % 60)
        } else {
            format!("{}s", seconds)
        }
    }
}

impl std::fmt::Display for Lock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (owner: {}, acquired: {}, expires: {})",
            self.file_id,
            self.owner,
            self.acquired_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }
}
