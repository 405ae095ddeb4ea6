//! Validated scalar types for the capability domain.

use super::CapabilityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the service that owns a capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::EmptyServiceName`] when the value is
    /// blank.
    pub fn new(value: impl Into<String>) -> Result<Self, CapabilityDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(CapabilityDomainError::EmptyServiceName);
        }
        Ok(Self(normalized))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a capability, unique per owning service and realm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityName(String);

impl CapabilityName {
    /// Creates a validated capability name.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::EmptyCapabilityName`] when the value
    /// is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, CapabilityDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(CapabilityDomainError::EmptyCapabilityName);
        }
        Ok(Self(normalized))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Semantic version string in `MAJOR.MINOR.PATCH[-pre]` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityVersion(String);

impl CapabilityVersion {
    /// Version assigned when a registration does not supply one.
    pub const DEFAULT: &'static str = "1.0.0";

    /// Creates a validated version.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::InvalidVersion`] when the core is not
    /// three dot-separated numeric components.
    pub fn new(value: impl Into<String>) -> Result<Self, CapabilityDomainError> {
        let normalized = value.into().trim().to_owned();
        let core = normalized
            .split_once('-')
            .map_or(normalized.as_str(), |(head, _)| head);
        let parts: Vec<&str> = core.split('.').collect();
        let numeric = |part: &&str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
        if parts.len() != 3 || !parts.iter().all(numeric) {
            return Err(CapabilityDomainError::InvalidVersion(normalized));
        }
        Ok(Self(normalized))
    }

    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CapabilityVersion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for CapabilityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
