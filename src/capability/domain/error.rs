//! Error types for capability domain validation and parsing.

use super::ContractKind;
use crate::realm::ParseRealmError;
use crate::route::domain::ParseHttpMethodError;
use thiserror::Error;

/// Errors returned while constructing capability domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityDomainError {
    /// The owning service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// The capability name is empty after trimming.
    #[error("capability name must not be empty")]
    EmptyCapabilityName,

    /// The realm is not one of the known realms.
    #[error(transparent)]
    InvalidRealm(#[from] ParseRealmError),

    /// The version is not a `MAJOR.MINOR.PATCH` string.
    #[error("capability version '{0}' is not a semantic version")]
    InvalidVersion(String),

    /// The record declares no contract at all.
    #[error("capability must declare at least one contract")]
    NoContracts,

    /// A contract endpoint is empty or not an absolute path.
    #[error("{kind} endpoint '{endpoint}' must be a non-empty path starting with '/'")]
    InvalidEndpoint {
        /// Contract carrying the endpoint.
        kind: ContractKind,
        /// Offending endpoint value.
        endpoint: String,
    },

    /// A contract method is not a known HTTP method.
    #[error(transparent)]
    InvalidMethod(#[from] ParseHttpMethodError),

    /// The SOA API name is empty after trimming.
    #[error("soa_api api_name must not be empty")]
    EmptyApiName,

    /// A handler reference is empty after trimming.
    #[error("handler reference must not be empty")]
    EmptyHandlerReference,

    /// The MCP tool name is empty after trimming.
    #[error("mcp_tool tool_name must not be empty")]
    EmptyToolName,

    /// The MCP tool parameter schema is not a JSON object.
    #[error("mcp_tool '{0}' input_schema must be a JSON object")]
    InvalidToolSchema(String),

    /// The semantic mapping names no domain capability.
    #[error("semantic mapping domain_capability must not be empty")]
    EmptyDomainCapability,

    /// The semantic API path is not an absolute path.
    #[error("semantic_api '{0}' must start with '/'")]
    InvalidSemanticApi(String),

    /// The lifecycle state is not recognised.
    #[error(transparent)]
    InvalidState(#[from] ParseCapabilityStateError),
}

/// Error returned while parsing a capability lifecycle state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown capability state: {0}")]
pub struct ParseCapabilityStateError(pub String);
