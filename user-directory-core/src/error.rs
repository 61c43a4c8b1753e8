//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Another record already uses this email (compared case-insensitively)
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// Durable backend could not be read for a reason other than absence.
    ///
    /// Never converted into an empty collection: doing so would hide data loss.
    #[error("Storage unreadable: {0}")]
    StorageFatal(String),

    /// Storage layer error raised by a backend adapter
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::UserNotFound(_) | Self::DuplicateEmail(_) => true,
            Self::StorageFatal(_) | Self::StorageError(_) | Self::SerializationError(_) => false,
        }
    }

    /// Re-classify a backend read failure as fatal.
    ///
    /// Expected errors pass through unchanged.
    #[must_use]
    pub fn into_fatal(self) -> Self {
        match self {
            Self::StorageError(msg) | Self::SerializationError(msg) => Self::StorageFatal(msg),
            other => other,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
