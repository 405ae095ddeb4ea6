//! Policy report aggregate.

use super::{MeshPolicies, PolicyDomainError};
use serde::{Deserialize, Serialize};

/// The latest policies a domain reported for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyReport {
    service_name: String,
    source: String,
    #[serde(default)]
    policies: MeshPolicies,
}

impl PolicyReport {
    /// Creates a report.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyDomainError::EmptyServiceName`] or
    /// [`PolicyDomainError::EmptySource`] for blank identifiers.
    pub fn new(
        service_name: impl Into<String>,
        source: impl Into<String>,
        policies: MeshPolicies,
    ) -> Result<Self, PolicyDomainError> {
        let service = service_name.into().trim().to_owned();
        if service.is_empty() {
            return Err(PolicyDomainError::EmptyServiceName);
        }
        let origin = source.into().trim().to_owned();
        if origin.is_empty() {
            return Err(PolicyDomainError::EmptySource);
        }
        Ok(Self {
            service_name: service,
            source: origin,
            policies,
        })
    }

    /// Returns the reporting service.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the owning realm that reported the policies.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the reported policies.
    #[must_use]
    pub const fn policies(&self) -> &MeshPolicies {
        &self.policies
    }
}
