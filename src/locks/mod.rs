//! Lease-based document locking.
//!
//! A lease is a time-bounded exclusive claim on one file by one session:
//!
//! ```text
//! Absent --acquire--> Held(owner) --release / expiry--> Absent
//!                     Held(owner) --acquire by owner--> Held(owner)  (refresh)
//! ```
//!
//! There is no direct `Held(A) -> Held(B)` transition; another session can
//! only take the file once the lease is released or has expired.
//!
//! # Lock Records
//!
//! Each record holds:
//! - `file_id`: the protected document
//! - `owner`: the session holding the lease
//! - `acquired_at`: start of the current lease period (RFC3339)
//! - `expires_at`: `now + ttl` as of the last acquire or refresh (RFC3339)
//! - `reclaimed_from`: the previous owner, when this lease replaced that
//!   owner's lapsed lease (omitted otherwise)
//!
//! Records past `expires_at` are logically absent even before the sweeper
//! removes them.

mod manager;
mod outcome;
mod record;


// Re-export public API
pub use manager::LockManager;
pub use outcome::{AcquireOutcome, LockStatus, ReleaseOutcome};
pub use record::Lock;
