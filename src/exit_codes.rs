//! Exit code constants for the doclease CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, bad config)
//! - 2: Validation failure (empty file or session identifier)
//! - 3: Lock store failure (I/O, corrupted records)
//! - 4: Lock conflict (held by another session, or release by a non-owner)
//! - 5: Resource failure (the OS refused a thread or similar)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Validation failure: malformed identifiers.
pub const VALIDATION_FAILURE: i32 = 2;

/// Lock store failure: the store could not be read or written.
pub const STORE_FAILURE: i32 = 3;

/// Lock conflict: the file is leased by another session.
pub const LOCK_CONFLICT: i32 = 4;

/// Resource failure: an OS resource such as a thread could not be obtained.
pub const RESOURCE_FAILURE: i32 = 5;
