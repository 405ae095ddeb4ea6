//! Error types for service domain validation.

use crate::realm::ParseRealmError;
use thiserror::Error;

/// Errors returned while constructing service domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceDomainError {
    /// The service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// The network address is empty after trimming.
    #[error("service address must not be empty")]
    EmptyAddress,

    /// Port zero cannot receive traffic.
    #[error("service port must be non-zero")]
    InvalidPort,

    /// The health check endpoint is not an absolute path.
    #[error("health check endpoint '{0}' must start with '/'")]
    InvalidHealthCheckEndpoint(String),

    /// The realm is not one of the known realms.
    #[error(transparent)]
    InvalidRealm(#[from] ParseRealmError),

    /// The lifecycle state is not recognised.
    #[error(transparent)]
    InvalidState(#[from] ParseServiceStateError),
}

/// Error returned while parsing a service lifecycle state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service state: {0}")]
pub struct ParseServiceStateError(pub String);
