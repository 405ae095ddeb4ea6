//! Agent registry over the shared record store.

use crate::agent::domain::{
    AgentApi, AgentCharacteristics, AgentContracts, AgentDomainError, AgentId, AgentRecord,
};
use crate::envelope::ErrorCode;
use crate::realm::Realm;
use crate::store::{RecordKind, RecordStore, Registered, StoreError, StoreRecord, Versioned};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

impl StoreRecord for AgentRecord {
    const KIND: RecordKind = RecordKind::Agent;
}

/// Request payload for registering an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAgentRequest {
    agent_id: String,
    agent_name: String,
    realm: String,
    capabilities: Vec<String>,
    specialization: Option<String>,
    required_roles: Vec<String>,
    agui_schema: Option<String>,
    entrypoint: Option<String>,
    api_description: Option<String>,
    mcp_tools: Vec<String>,
    raw_contracts: Option<Value>,
}

impl RegisterAgentRequest {
    /// Creates a request with the required agent fields.
    #[must_use]
    pub fn new(
        agent_id: impl Into<String>,
        agent_name: impl Into<String>,
        realm: impl Into<String>,
        capabilities: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_name: agent_name.into(),
            realm: realm.into(),
            capabilities: capabilities.into_iter().collect(),
            specialization: None,
            required_roles: Vec::new(),
            agui_schema: None,
            entrypoint: None,
            api_description: None,
            mcp_tools: Vec::new(),
            raw_contracts: None,
        }
    }

    /// Sets the specialization.
    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    /// Sets the roles a caller needs.
    #[must_use]
    pub fn with_required_roles(mut self, roles: impl IntoIterator<Item = String>) -> Self {
        self.required_roles = roles.into_iter().collect();
        self
    }

    /// Sets the UI schema reference.
    #[must_use]
    pub fn with_agui_schema(mut self, schema: impl Into<String>) -> Self {
        self.agui_schema = Some(schema.into());
        self
    }

    /// Describes the agent's in-process entrypoint.
    #[must_use]
    pub fn with_agent_api(
        mut self,
        entrypoint: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        self.entrypoint = Some(entrypoint.into());
        self.api_description = description;
        self
    }

    /// Sets the tools the agent consumes.
    #[must_use]
    pub fn with_mcp_tools(mut self, tools: impl IntoIterator<Item = String>) -> Self {
        self.mcp_tools = tools.into_iter().collect();
        self
    }

    /// Supplies the contracts as a raw `{agent_api?, mcp_tools?}` payload.
    ///
    /// When present, the payload replaces the typed API and tool settings.
    #[must_use]
    pub fn with_contracts_json(mut self, contracts: Value) -> Self {
        self.raw_contracts = Some(contracts);
        self
    }

    fn into_record(self) -> Result<AgentRecord, AgentDomainError> {
        let agent_id = AgentId::new(self.agent_id)?;
        let realm = Realm::try_from(self.realm.as_str())?;
        let mut characteristics = AgentCharacteristics::new(self.capabilities, realm)?
            .with_required_roles(self.required_roles);
        if let Some(specialization) = self.specialization {
            characteristics = characteristics.with_specialization(specialization);
        }
        if let Some(schema) = self.agui_schema {
            characteristics = characteristics.with_agui_schema(schema);
        }
        let contracts = match self.raw_contracts {
            Some(raw) => AgentContracts::from_json(&raw)?,
            None => {
                let mut contracts = AgentContracts::new().with_mcp_tools(self.mcp_tools)?;
                if let Some(entrypoint) = self.entrypoint {
                    let mut api = AgentApi::new(entrypoint)?;
                    if let Some(description) = self.api_description {
                        api = api.with_description(description);
                    }
                    contracts = contracts.with_agent_api(api);
                }
                contracts
            }
        };
        AgentRecord::new(agent_id, self.agent_name, characteristics, contracts)
    }
}

/// Intersection filter for agent discovery; absent fields match anything.
///
/// Capability, specialization and role comparisons ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentFilter {
    realm: Option<Realm>,
    capability: Option<String>,
    specialization: Option<String>,
    required_role: Option<String>,
}

impl AgentFilter {
    /// Creates a filter matching every agent.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts matches to `realm`.
    #[must_use]
    pub const fn in_realm(mut self, realm: Realm) -> Self {
        self.realm = Some(realm);
        self
    }

    /// Restricts matches to agents declaring `capability`.
    #[must_use]
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capability = Some(capability.into());
        self
    }

    /// Restricts matches to agents with `specialization`.
    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    /// Restricts matches to agents requiring `role`.
    #[must_use]
    pub fn with_required_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = Some(role.into());
        self
    }

    /// Returns whether `agent` satisfies every present constraint.
    #[must_use]
    pub fn matches(&self, agent: &AgentRecord) -> bool {
        let traits = agent.characteristics();
        self.realm.is_none_or(|realm| traits.realm() == realm)
            && self
                .capability
                .as_deref()
                .is_none_or(|capability| traits.has_capability(capability))
            && self.specialization.as_deref().is_none_or(|wanted| {
                traits
                    .specialization()
                    .is_some_and(|actual| actual.eq_ignore_ascii_case(wanted.trim()))
            })
            && self
                .required_role
                .as_deref()
                .is_none_or(|role| traits.requires_role(role))
    }
}

/// Service-level errors for agent registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentRegistryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AgentDomainError),
    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No agent has the identifier.
    #[error("agent '{0}' is not registered")]
    NotFound(String),
}

impl AgentRegistryError {
    /// Returns the envelope code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Domain(_) => ErrorCode::ValidationError,
            Self::Store(err) => err.error_code(),
            Self::NotFound(_) => ErrorCode::NotFound,
        }
    }
}

/// Result type for agent registry operations.
pub type AgentRegistryResult<T> = Result<T, AgentRegistryError>;

/// Agent registration and discovery service.
///
/// Agents are keyed by identifier and owned by their name: a restart
/// re-registering the same identifier and name updates the record in place,
/// while a different agent reusing the identifier conflicts.
#[derive(Debug)]
pub struct AgentRegistry<C>
where
    C: Clock + Send + Sync,
{
    store: Arc<RecordStore<C>>,
}

impl<C> Clone for AgentRegistry<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<C> AgentRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a registry over `store`.
    #[must_use]
    pub const fn new(store: Arc<RecordStore<C>>) -> Self {
        Self { store }
    }

    /// Validates and registers an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::Domain`] when the agent has no
    /// capabilities, declares an exposed tool, or is otherwise malformed,
    /// and [`AgentRegistryError::Store`] when another agent owns the
    /// identifier or the store is closed.
    pub fn register(
        &self,
        request: RegisterAgentRequest,
    ) -> AgentRegistryResult<Registered<AgentRecord>> {
        let record = request.into_record().inspect_err(|err| {
            warn!(error = %err, "agent registration rejected");
        })?;
        self.store_record(record)
    }

    /// Re-validates and registers a prebuilt record.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`AgentRegistry::register`].
    pub fn register_record(
        &self,
        record: AgentRecord,
    ) -> AgentRegistryResult<Registered<AgentRecord>> {
        self.store_record(record.validated()?)
    }

    fn store_record(&self, record: AgentRecord) -> AgentRegistryResult<Registered<AgentRecord>> {
        let id = record.agent_id().as_str();
        let outcome = self
            .store
            .upsert(id, record.clone(), record.agent_name())
            .inspect_err(|err| warn!(agent_id = id, error = %err, "agent registration rejected"))?;
        info!(
            agent_id = id,
            agent_name = record.agent_name(),
            realm = %record.characteristics().realm(),
            version = outcome.version(),
            "agent registered"
        );
        Ok(Registered::new(record, outcome))
    }

    /// Returns the agent with `agent_id`, if registered.
    #[must_use]
    pub fn get(&self, agent_id: &str) -> Option<AgentRecord> {
        self.get_versioned(agent_id).map(Versioned::into_record)
    }

    /// Returns the agent with its store metadata.
    #[must_use]
    pub fn get_versioned(&self, agent_id: &str) -> Option<Versioned<AgentRecord>> {
        let found = self.store.get_versioned::<AgentRecord>(agent_id.trim());
        if found.is_none() {
            debug!(agent_id, "agent not found");
        }
        found
    }

    /// Returns agents accepted by `filter`, ordered by identifier.
    #[must_use]
    pub fn discover(&self, filter: &AgentFilter) -> Vec<AgentRecord> {
        let mut found = self.store.list::<AgentRecord, _>(|agent| filter.matches(agent));
        found.sort_by(|left, right| left.agent_id().cmp(right.agent_id()));
        found
    }

    /// Returns every agent, ordered by identifier.
    #[must_use]
    pub fn list(&self) -> Vec<AgentRecord> {
        self.discover(&AgentFilter::any())
    }

    /// Removes the agent with `agent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::NotFound`] when no such agent exists.
    pub fn deregister(&self, agent_id: &str) -> AgentRegistryResult<AgentRecord> {
        let id = agent_id.trim();
        let removed = self
            .store
            .remove::<AgentRecord>(id, None)?
            .ok_or_else(|| AgentRegistryError::NotFound(id.to_owned()))?;
        info!(agent_id = id, "agent deregistered");
        Ok(removed)
    }

    /// Returns the number of registered agents.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.count(RecordKind::Agent)
    }
}
