//! Stable route identifiers.

use super::{HttpMethod, RouteDomainError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Validated route path beginning with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePath(String);

impl RoutePath {
    /// Creates a validated route path.
    ///
    /// # Errors
    ///
    /// Returns [`RouteDomainError::InvalidPath`] when the trimmed value does
    /// not begin with `/`.
    pub fn new(value: impl Into<String>) -> Result<Self, RouteDomainError> {
        let normalized = value.into().trim().to_owned();
        if !normalized.starts_with('/') {
            return Err(RouteDomainError::InvalidPath(normalized));
        }
        Ok(Self(normalized))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier derived from a route's method and path.
///
/// The value is the lowercase hex SHA-256 digest of `"<METHOD> <path>"`, so
/// the same route maps to the same identifier in every process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    /// Derives the identifier for `method` and `path`.
    #[must_use]
    pub fn derive(method: HttpMethod, path: &RoutePath) -> Self {
        let digest = Sha256::digest(format!("{method} {path}").as_bytes());
        Self(format!("{digest:x}"))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
