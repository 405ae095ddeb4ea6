//! Error types for agent domain validation.

use crate::realm::ParseRealmError;
use thiserror::Error;

/// Errors returned while constructing agent domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent identifier is empty after trimming.
    #[error("agent_id must not be empty")]
    EmptyAgentId,

    /// The agent name is empty after trimming.
    #[error("agent_name must not be empty")]
    EmptyAgentName,

    /// The agent declares no capabilities.
    #[error("agent '{0}' must declare at least one capability")]
    NoCapabilities(String),

    /// A capability entry is blank.
    #[error("agent capability entries must not be empty")]
    EmptyCapability,

    /// The realm is not one of the known realms.
    #[error(transparent)]
    InvalidRealm(#[from] ParseRealmError),

    /// The in-process entrypoint is blank.
    #[error("agent_api entrypoint must not be empty")]
    EmptyEntrypoint,

    /// A consumed tool name is blank.
    #[error("mcp_tools entries must name a tool")]
    EmptyToolName,

    /// The agent tried to declare a tool it provides.
    #[error("agent may only consume tools; '{0}' is declared as exposed")]
    ExposedToolDeclared(String),

    /// A tool entry is neither a name nor a dependency object.
    #[error("mcp_tools entry is malformed: {0}")]
    MalformedToolEntry(String),

    /// The contracts payload contains an unsupported key.
    #[error("unsupported agent contract '{0}'")]
    UnknownContract(String),

    /// The contracts payload is not a JSON object.
    #[error("agent contracts must be a JSON object")]
    MalformedContracts,
}
