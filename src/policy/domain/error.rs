//! Error types for policy report validation.

use thiserror::Error;

/// Errors returned while constructing policy reports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyDomainError {
    /// The reporting service name is empty after trimming.
    #[error("policy report service_name must not be empty")]
    EmptyServiceName,

    /// The owning realm of the report is empty after trimming.
    #[error("policy report source must not be empty")]
    EmptySource,

    /// The policies payload is not a JSON object.
    #[error("policies must be a JSON object")]
    MalformedPolicies,
}
