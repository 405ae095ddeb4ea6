//! Terminal invocation errors.

use super::TierTrail;
use crate::envelope::ErrorCode;
use thiserror::Error;

/// Terminal outcome of an invocation that produced no result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvokeError {
    /// Every tier of the chain was unavailable.
    #[error("capability '{capability}' unavailable: tried {} tiers ({trail})", .trail.len())]
    CapabilityUnavailable {
        /// Capability requested by the caller.
        capability: String,
        /// Tiers tried, in order.
        trail: TierTrail,
    },

    /// The caller cancelled the invocation.
    #[error("invocation of capability '{capability}' was cancelled")]
    Cancelled {
        /// Capability requested by the caller.
        capability: String,
    },

    /// A resolved tier raised a business error.
    #[error("{message}")]
    Business {
        /// Error code supplied by the capability.
        code: String,
        /// Human-readable description.
        message: String,
    },
}

impl InvokeError {
    /// Returns the crate error code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::CapabilityUnavailable { .. } => ErrorCode::CapabilityUnavailable,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
            Self::Business { .. } => ErrorCode::BusinessError,
        }
    }

    /// Returns the wire code, keeping a business error's own code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Business { code, .. } => code,
            Self::CapabilityUnavailable { .. } | Self::Cancelled { .. } => {
                self.error_code().as_str()
            }
        }
    }
}
