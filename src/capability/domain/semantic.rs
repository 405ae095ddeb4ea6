//! Mapping from a domain concept to its public-facing path.

use super::CapabilityDomainError;
use serde::{Deserialize, Serialize};

/// Links a capability to the business concept it realises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticMapping {
    domain_capability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    semantic_api: Option<String>,
}

impl SemanticMapping {
    /// Creates a mapping for `domain_capability`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::EmptyDomainCapability`] when the
    /// concept is blank.
    pub fn new(domain_capability: impl Into<String>) -> Result<Self, CapabilityDomainError> {
        Self {
            domain_capability: domain_capability.into().trim().to_owned(),
            semantic_api: None,
        }
        .validated()
    }

    /// Sets the public-facing path.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::InvalidSemanticApi`] when the path
    /// does not begin with `/`.
    pub fn with_semantic_api(
        self,
        semantic_api: impl Into<String>,
    ) -> Result<Self, CapabilityDomainError> {
        Self {
            semantic_api: Some(semantic_api.into().trim().to_owned()),
            ..self
        }
        .validated()
    }

    pub(crate) fn validated(self) -> Result<Self, CapabilityDomainError> {
        if self.domain_capability.trim().is_empty() {
            return Err(CapabilityDomainError::EmptyDomainCapability);
        }
        if let Some(api) = self.semantic_api.as_deref()
            && !api.starts_with('/')
        {
            return Err(CapabilityDomainError::InvalidSemanticApi(api.to_owned()));
        }
        Ok(self)
    }

    /// Returns the domain concept.
    #[must_use]
    pub fn domain_capability(&self) -> &str {
        &self.domain_capability
    }

    /// Returns the public-facing path, if any.
    #[must_use]
    pub fn semantic_api(&self) -> Option<&str> {
        self.semantic_api.as_deref()
    }
}
