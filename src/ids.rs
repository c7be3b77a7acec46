//! Opaque identifiers for leased files and editing sessions.
//!
//! `FileId` and `SessionId` wrap plain strings but are distinct types, so a
//! session cannot be passed where a file is expected (or the reverse).
//! Neither is interpreted by the lock core.

use crate::error::{LeaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier, rejecting empty or blank input.
            pub fn new(raw: impl Into<String>) -> Result<Self> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(LeaseError::Validation(format!(
                        "{} must not be empty",
                        $label
                    )));
                }
                Ok(Self(raw))
            }

            /// The raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = LeaseError;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }
    };
}

opaque_id!(
    /// Stable identifier of a protected document (content hash or path).
    FileId,
    "file_id"
);

opaque_id!(
    /// Identifier of an editing session, issued by the auth component.
    SessionId,
    "session_id"
);
