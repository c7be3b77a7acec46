//! Error types for doclease.
//!
//! Expected lock outcomes (conflict, already released, not owner) are not
//! errors; they are returned as typed results by the lock manager. Only the
//! conditions below propagate as `Err`.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for doclease operations.
#[derive(Error, Debug)]
pub enum LeaseError {
    /// Malformed input, such as an empty file or session identifier.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The lock store could not be read or written.
    ///
    /// Never interpreted as "lock absent".
    #[error("Lock store unavailable: {0}")]
    StoreUnavailable(String),

    /// The process could not get an OS resource it needs, such as a thread.
    #[error("Resource unavailable: {0}")]
    Resource(String),

    /// A lease held by another session blocked a command.
    ///
    /// Raised by the CLI only; the manager reports conflicts as outcomes.
    #[error("Lock conflict: {0}")]
    Conflict(String),

    /// Invalid configuration or command line usage.
    #[error("{0}")]
    UserError(String),
}

impl LeaseError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LeaseError::Validation(_) => exit_codes::VALIDATION_FAILURE,
            LeaseError::StoreUnavailable(_) => exit_codes::STORE_FAILURE,
            LeaseError::Resource(_) => exit_codes::RESOURCE_FAILURE,
            LeaseError::Conflict(_) => exit_codes::LOCK_CONFLICT,
            LeaseError::UserError(_) => exit_codes::USER_ERROR,
        }
    }

    /// Shorthand for wrapping a store-side failure with context.
    pub(crate) fn store(context: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        LeaseError::StoreUnavailable(format!("{}: {}", context, err))
    }
}

/// Result type alias for doclease operations.
pub type Result<T> = std::result::Result<T, LeaseError>;
