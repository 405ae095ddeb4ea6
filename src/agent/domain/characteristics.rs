//! What an agent can do and where it may be discovered.

use super::AgentDomainError;
use crate::realm::Realm;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Discovery-relevant traits of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCharacteristics {
    capabilities: Vec<String>,
    realm: Realm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    specialization: Option<String>,
    #[serde(default)]
    required_roles: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agui_schema: Option<String>,
}

impl AgentCharacteristics {
    /// Creates characteristics from a capability list.
    ///
    /// Capabilities are trimmed and de-duplicated preserving first
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyCapability`] for a blank entry.
    /// Emptiness of the list is checked when the record is built.
    pub fn new(
        capabilities: impl IntoIterator<Item = String>,
        realm: Realm,
    ) -> Result<Self, AgentDomainError> {
        Ok(Self {
            capabilities: ordered_capabilities(capabilities)?,
            realm,
            specialization: None,
            required_roles: BTreeSet::new(),
            agui_schema: None,
        })
    }

    pub(super) fn normalized(self) -> Result<Self, AgentDomainError> {
        let roles = self.required_roles.clone();
        let specialization = self.specialization.clone().unwrap_or_default();
        Ok(Self {
            capabilities: ordered_capabilities(self.capabilities)?,
            ..self
        }
        .with_specialization(specialization)
        .with_required_roles(roles))
    }

    /// Sets the specialization.
    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        let value = specialization.into().trim().to_owned();
        self.specialization = (!value.is_empty()).then_some(value);
        self
    }

    /// Sets the roles a caller needs to use this agent.
    #[must_use]
    pub fn with_required_roles(mut self, roles: impl IntoIterator<Item = String>) -> Self {
        self.required_roles = roles
            .into_iter()
            .map(|role| role.trim().to_owned())
            .filter(|role| !role.is_empty())
            .collect();
        self
    }

    /// Sets the UI schema reference.
    #[must_use]
    pub fn with_agui_schema(mut self, schema: impl Into<String>) -> Self {
        self.agui_schema = Some(schema.into());
        self
    }

    /// Returns the capabilities in declaration order.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Returns the realm.
    #[must_use]
    pub const fn realm(&self) -> Realm {
        self.realm
    }

    /// Returns the specialization, if any.
    #[must_use]
    pub fn specialization(&self) -> Option<&str> {
        self.specialization.as_deref()
    }

    /// Returns the required roles.
    #[must_use]
    pub const fn required_roles(&self) -> &BTreeSet<String> {
        &self.required_roles
    }

    /// Returns the UI schema reference, if any.
    #[must_use]
    pub fn agui_schema(&self) -> Option<&str> {
        self.agui_schema.as_deref()
    }

    /// Returns whether a capability equals `name`, ignoring case.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        let wanted = name.trim();
        self.capabilities
            .iter()
            .any(|capability| capability.eq_ignore_ascii_case(wanted))
    }

    /// Returns whether a required role equals `role`, ignoring case.
    #[must_use]
    pub fn requires_role(&self, role: &str) -> bool {
        let wanted = role.trim();
        self.required_roles
            .iter()
            .any(|required| required.eq_ignore_ascii_case(wanted))
    }
}

fn ordered_capabilities(
    capabilities: impl IntoIterator<Item = String>,
) -> Result<Vec<String>, AgentDomainError> {
    let mut ordered: Vec<String> = Vec::new();
    for raw in capabilities {
        let capability = raw.trim().to_owned();
        if capability.is_empty() {
            return Err(AgentDomainError::EmptyCapability);
        }
        if !ordered.contains(&capability) {
            ordered.push(capability);
        }
    }
    Ok(ordered)
}
