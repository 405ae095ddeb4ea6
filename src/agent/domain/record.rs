//! Agent aggregate.

use super::{AgentCharacteristics, AgentContracts, AgentDomainError, AgentId};
use serde::{Deserialize, Serialize};

/// An autonomous in-process actor that consumes capabilities and tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    agent_id: AgentId,
    agent_name: String,
    characteristics: AgentCharacteristics,
    #[serde(default)]
    contracts: AgentContracts,
}

impl AgentRecord {
    /// Creates an agent record.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentName`] for a blank name and
    /// [`AgentDomainError::NoCapabilities`] when the characteristics list no
    /// capability.
    pub fn new(
        agent_id: AgentId,
        agent_name: impl Into<String>,
        characteristics: AgentCharacteristics,
        contracts: AgentContracts,
    ) -> Result<Self, AgentDomainError> {
        let name = agent_name.into().trim().to_owned();
        if name.is_empty() {
            return Err(AgentDomainError::EmptyAgentName);
        }
        if characteristics.capabilities().is_empty() {
            return Err(AgentDomainError::NoCapabilities(agent_id.to_string()));
        }
        Ok(Self {
            agent_id,
            agent_name: name,
            characteristics,
            contracts,
        })
    }

    /// Re-checks invariants on a record built outside the constructors.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`AgentRecord::new`] plus identifier and
    /// tool-name validation failures.
    pub fn validated(self) -> Result<Self, AgentDomainError> {
        Self::new(
            AgentId::new(self.agent_id.as_str())?,
            self.agent_name,
            self.characteristics.normalized()?,
            self.contracts.normalized()?,
        )
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Returns the characteristics.
    #[must_use]
    pub const fn characteristics(&self) -> &AgentCharacteristics {
        &self.characteristics
    }

    /// Returns the contracts.
    #[must_use]
    pub const fn contracts(&self) -> &AgentContracts {
        &self.contracts
    }
}
