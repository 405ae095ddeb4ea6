//! Callable capabilities and the directory that resolves handler references.

use crate::capability::domain::HandlerRef;
use crate::envelope::ErrorCode;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Shared, type-erased callable.
pub type SharedHandler = Arc<dyn CapabilityHandler>;

/// Result type returned by capability callables.
pub type HandlerResult = Result<Value, HandlerError>;

/// A callable that executes a capability.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Executes the capability with `args`.
    async fn call(&self, args: Value) -> HandlerResult;
}

/// Errors raised by capability callables.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// The service backing the callable could not be reached. The resolver
    /// advances to the next tier.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// The capability ran and reported a failure. The resolver surfaces it
    /// to the caller unchanged.
    #[error("{code}: {message}")]
    Business {
        /// Capability-defined error code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}

impl HandlerError {
    /// Creates a dependency-unavailable error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::DependencyUnavailable(reason.into())
    }

    /// Creates a business error. A blank code becomes `BUSINESS_ERROR`.
    #[must_use]
    pub fn business(code: impl Into<String>, message: impl Into<String>) -> Self {
        let raw = code.into();
        let normalized = raw.trim();
        Self::Business {
            code: if normalized.is_empty() {
                ErrorCode::BusinessError.as_str().to_owned()
            } else {
                normalized.to_owned()
            },
            message: message.into(),
        }
    }

    /// Returns the crate error code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::DependencyUnavailable(_) => ErrorCode::DependencyUnavailable,
            Self::Business { .. } => ErrorCode::BusinessError,
        }
    }
}

/// Resolves `soa_api` handler references to callables.
#[async_trait]
pub trait HandlerDirectory: Send + Sync {
    /// Returns the callable registered under `handler`, if any.
    async fn resolve(&self, handler: &HandlerRef) -> Option<SharedHandler>;
}
