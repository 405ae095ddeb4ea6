//! Capability aggregate.

use super::{
    CapabilityContracts, CapabilityDomainError, CapabilityName, CapabilityState,
    CapabilityVersion, ContractKind, SemanticMapping, ServiceName,
};
use crate::realm::Realm;
use serde::{Deserialize, Serialize};

/// A named, versioned unit of functionality exposed by a service.
///
/// Every record declares at least one contract. Records carry no timestamps;
/// the store tracks write times alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    service_name: ServiceName,
    capability_name: CapabilityName,
    realm: Realm,
    protocol_name: String,
    #[serde(default)]
    version: CapabilityVersion,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    semantic_mapping: Option<SemanticMapping>,
    contracts: CapabilityContracts,
    #[serde(default)]
    state: CapabilityState,
}

impl CapabilityRecord {
    /// Creates a record with default version, protocol name and state.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::NoContracts`] when `contracts` is
    /// empty, or the first contract payload validation failure.
    pub fn new(
        service_name: ServiceName,
        capability_name: CapabilityName,
        realm: Realm,
        contracts: CapabilityContracts,
    ) -> Result<Self, CapabilityDomainError> {
        Ok(Self {
            protocol_name: default_protocol_name(&service_name),
            service_name,
            capability_name,
            realm,
            version: CapabilityVersion::default(),
            description: String::new(),
            semantic_mapping: None,
            contracts: contracts.validated()?,
            state: CapabilityState::default(),
        })
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: CapabilityVersion) -> Self {
        self.version = version;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the semantic mapping.
    #[must_use]
    pub fn with_semantic_mapping(mut self, mapping: SemanticMapping) -> Self {
        self.semantic_mapping = Some(mapping);
        self
    }

    /// Overrides the protocol name. Blank values keep the default.
    #[must_use]
    pub fn with_protocol_name(mut self, protocol_name: impl Into<String>) -> Self {
        let name = protocol_name.into().trim().to_owned();
        if !name.is_empty() {
            self.protocol_name = name;
        }
        self
    }

    /// Sets the lifecycle state.
    #[must_use]
    pub const fn with_state(mut self, state: CapabilityState) -> Self {
        self.state = state;
        self
    }

    /// Re-checks invariants on a record built outside the constructors.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] when a scalar field is blank, the
    /// version is malformed, or a contract or mapping payload is invalid.
    pub fn validated(self) -> Result<Self, CapabilityDomainError> {
        let service_name = ServiceName::new(self.service_name.as_str())?;
        let capability_name = CapabilityName::new(self.capability_name.as_str())?;
        let version = CapabilityVersion::new(self.version.as_str())?;
        let semantic_mapping = self
            .semantic_mapping
            .map(SemanticMapping::validated)
            .transpose()?;
        let protocol_name = if self.protocol_name.trim().is_empty() {
            default_protocol_name(&service_name)
        } else {
            self.protocol_name
        };
        Ok(Self {
            service_name,
            capability_name,
            realm: self.realm,
            protocol_name,
            version,
            description: self.description,
            semantic_mapping,
            contracts: self.contracts.validated()?,
            state: self.state,
        })
    }

    /// Returns the owning service.
    #[must_use]
    pub const fn service_name(&self) -> &ServiceName {
        &self.service_name
    }

    /// Returns the capability name.
    #[must_use]
    pub const fn capability_name(&self) -> &CapabilityName {
        &self.capability_name
    }

    /// Returns the realm.
    #[must_use]
    pub const fn realm(&self) -> Realm {
        self.realm
    }

    /// Returns the protocol name.
    #[must_use]
    pub fn protocol_name(&self) -> &str {
        &self.protocol_name
    }

    /// Returns the version.
    #[must_use]
    pub const fn version(&self) -> &CapabilityVersion {
        &self.version
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the semantic mapping, if any.
    #[must_use]
    pub const fn semantic_mapping(&self) -> Option<&SemanticMapping> {
        self.semantic_mapping.as_ref()
    }

    /// Returns the declared contracts.
    #[must_use]
    pub const fn contracts(&self) -> &CapabilityContracts {
        &self.contracts
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CapabilityState {
        self.state
    }

    /// Returns whether the record declares a contract of `kind`.
    #[must_use]
    pub fn has_contract(&self, kind: ContractKind) -> bool {
        self.contracts.kinds().contains(&kind)
    }

    /// Returns whether `query` occurs, ignoring case, in the capability
    /// name, the mapped domain concept, or the description.
    ///
    /// An empty query matches every record.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
        contains(self.capability_name.as_str())
            || contains(&self.description)
            || self
                .semantic_mapping
                .as_ref()
                .is_some_and(|mapping| contains(mapping.domain_capability()))
    }
}

fn default_protocol_name(service_name: &ServiceName) -> String {
    format!("{service_name}Protocol")
}
