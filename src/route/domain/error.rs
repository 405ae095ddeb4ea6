//! Error types for route domain validation and parsing.

use crate::realm::ParseRealmError;
use thiserror::Error;

/// Errors returned while constructing route domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteDomainError {
    /// The path is empty or does not begin with `/`.
    #[error("route path '{0}' must be a non-empty path starting with '/'")]
    InvalidPath(String),

    /// The originating identity is empty after trimming.
    #[error("route defined_by must not be empty")]
    EmptyDefinedBy,

    /// The method is not a known HTTP method.
    #[error(transparent)]
    InvalidMethod(#[from] ParseHttpMethodError),

    /// The realm is not one of the known realms.
    #[error(transparent)]
    InvalidRealm(#[from] ParseRealmError),
}

/// Error returned while parsing an HTTP method.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown HTTP method: {0}")]
pub struct ParseHttpMethodError(pub String);
