//! Error types for record store operations.

use super::RecordKind;
use crate::envelope::ErrorCode;
use thiserror::Error;

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by the record store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The key is owned by a different identity.
    #[error("{kind} record '{key}' is owned by '{owner}', not '{attempted}'")]
    Conflict {
        /// Namespace of the conflicting record.
        kind: RecordKind,
        /// Key within the namespace.
        key: String,
        /// Identity that currently owns the key.
        owner: String,
        /// Identity that attempted the write.
        attempted: String,
    },

    /// The store has been closed and accepts no further writes.
    #[error("record store is closed")]
    Closed,
}

impl StoreError {
    /// Returns the envelope code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::Closed => ErrorCode::RegistryClosed,
        }
    }
}
