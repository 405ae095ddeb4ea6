//! Capability registry over the shared record store.
//!
//! Capabilities are keyed by `(service_name, realm, capability_name)`, so
//! several services may offer the same capability name in one realm.
//! Re-registering under the same key replaces the record and bumps its
//! version.

use crate::capability::domain::{
    CapabilityContracts, CapabilityDomainError, CapabilityName, CapabilityRecord,
    CapabilityState, CapabilityVersion, ContractKind, SemanticMapping, ServiceName,
};
use crate::envelope::ErrorCode;
use crate::realm::Realm;
use crate::service::domain::ServiceRecord;
use crate::store::{RecordKind, RecordStore, Registered, StoreError, StoreRecord, Versioned};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

impl StoreRecord for CapabilityRecord {
    const KIND: RecordKind = RecordKind::Capability;
}

/// Request payload for registering a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCapabilityRequest {
    service_name: String,
    capability_name: String,
    realm: String,
    contracts: CapabilityContracts,
    version: Option<String>,
    description: Option<String>,
    protocol_name: Option<String>,
    state: Option<String>,
    domain_capability: Option<String>,
    semantic_api: Option<String>,
}

impl RegisterCapabilityRequest {
    /// Creates a request with the required capability fields.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        capability_name: impl Into<String>,
        realm: impl Into<String>,
        contracts: CapabilityContracts,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            capability_name: capability_name.into(),
            realm: realm.into(),
            contracts,
            version: None,
            description: None,
            protocol_name: None,
            state: None,
            domain_capability: None,
            semantic_api: None,
        }
    }

    /// Sets the semantic version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the protocol name.
    #[must_use]
    pub fn with_protocol_name(mut self, protocol_name: impl Into<String>) -> Self {
        self.protocol_name = Some(protocol_name.into());
        self
    }

    /// Sets the lifecycle state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Maps the capability to a domain concept and optional public path.
    #[must_use]
    pub fn with_semantic_mapping(
        mut self,
        domain_capability: impl Into<String>,
        semantic_api: Option<String>,
    ) -> Self {
        self.domain_capability = Some(domain_capability.into());
        self.semantic_api = semantic_api;
        self
    }

    fn into_record(self) -> Result<CapabilityRecord, CapabilityDomainError> {
        let service_name = ServiceName::new(self.service_name)?;
        let capability_name = CapabilityName::new(self.capability_name)?;
        let realm = Realm::try_from(self.realm.as_str())?;
        let mut record =
            CapabilityRecord::new(service_name, capability_name, realm, self.contracts)?;
        if let Some(version) = self.version {
            record = record.with_version(CapabilityVersion::new(version)?);
        }
        if let Some(description) = self.description {
            record = record.with_description(description);
        }
        if let Some(protocol_name) = self.protocol_name {
            record = record.with_protocol_name(protocol_name);
        }
        if let Some(state) = self.state {
            record = record.with_state(CapabilityState::try_from(state.as_str())?);
        }
        if let Some(domain_capability) = self.domain_capability {
            let mut mapping = SemanticMapping::new(domain_capability)?;
            if let Some(api) = self.semantic_api {
                mapping = mapping.with_semantic_api(api)?;
            }
            record = record.with_semantic_mapping(mapping);
        }
        Ok(record)
    }
}

/// Service-level errors for capability registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityRegistryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CapabilityDomainError),
    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No capability matches the given coordinates.
    #[error("capability '{capability_name}' of '{service_name}' in {realm} is not registered")]
    NotFound {
        /// Requested owning service.
        service_name: String,
        /// Requested capability.
        capability_name: String,
        /// Requested realm.
        realm: Realm,
    },
}

impl CapabilityRegistryError {
    /// Returns the envelope code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Domain(_) => ErrorCode::ValidationError,
            Self::Store(err) => err.error_code(),
            Self::NotFound { .. } => ErrorCode::NotFound,
        }
    }
}

/// Result type for capability registry operations.
pub type CapabilityRegistryResult<T> = Result<T, CapabilityRegistryError>;

/// Capability registration and discovery service.
#[derive(Debug)]
pub struct CapabilityRegistry<C>
where
    C: Clock + Send + Sync,
{
    store: Arc<RecordStore<C>>,
}

impl<C> Clone for CapabilityRegistry<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<C> CapabilityRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a registry over `store`.
    #[must_use]
    pub const fn new(store: Arc<RecordStore<C>>) -> Self {
        Self { store }
    }

    /// Validates and registers a capability.
    ///
    /// Re-registration by the same service updates the record in place.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityRegistryError::Domain`] for malformed input and
    /// [`CapabilityRegistryError::Store`] when the store is closed.
    pub fn register(
        &self,
        request: RegisterCapabilityRequest,
    ) -> CapabilityRegistryResult<Registered<CapabilityRecord>> {
        let record = request.into_record()?;
        self.store_record(record)
    }

    /// Re-validates and registers a prebuilt record.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`CapabilityRegistry::register`].
    pub fn register_record(
        &self,
        record: CapabilityRecord,
    ) -> CapabilityRegistryResult<Registered<CapabilityRecord>> {
        self.store_record(record.validated()?)
    }

    fn store_record(
        &self,
        record: CapabilityRecord,
    ) -> CapabilityRegistryResult<Registered<CapabilityRecord>> {
        let key = storage_key(
            record.service_name().as_str(),
            record.realm(),
            record.capability_name().as_str(),
        );
        let outcome = self
            .store
            .upsert(&key, record.clone(), record.service_name().as_str())
            .inspect_err(|err| {
                warn!(
                    service = %record.service_name(),
                    capability = %record.capability_name(),
                    realm = %record.realm(),
                    error = %err,
                    "capability registration rejected"
                );
            })?;
        info!(
            service = %record.service_name(),
            capability = %record.capability_name(),
            realm = %record.realm(),
            version = outcome.version(),
            created = outcome.is_created(),
            "capability registered"
        );
        Ok(Registered::new(record, outcome))
    }

    /// Returns the capability owned by `service_name`, if registered.
    #[must_use]
    pub fn get(
        &self,
        service_name: &str,
        capability_name: &str,
        realm: Realm,
    ) -> Option<CapabilityRecord> {
        self.get_versioned(service_name, capability_name, realm)
            .map(Versioned::into_record)
    }

    /// Returns the capability with its store metadata.
    #[must_use]
    pub fn get_versioned(
        &self,
        service_name: &str,
        capability_name: &str,
        realm: Realm,
    ) -> Option<Versioned<CapabilityRecord>> {
        let key = storage_key(service_name.trim(), realm, capability_name.trim());
        let found = self.store.get_versioned::<CapabilityRecord>(&key);
        if found.is_none() {
            debug!(
                service = service_name,
                capability = capability_name,
                %realm,
                "capability not found"
            );
        }
        found
    }

    /// Returns capabilities in `realm` whose name, mapped domain concept, or
    /// description contains `query`, ignoring case.
    ///
    /// Results are ordered by service, then capability name.
    #[must_use]
    pub fn discover(&self, realm: Realm, query: &str) -> Vec<CapabilityRecord> {
        let mut found = self.store.list::<CapabilityRecord, _>(|record| {
            record.realm() == realm && record.matches_query(query)
        });
        sort_by_owner(&mut found);
        if found.is_empty() {
            debug!(%realm, query, "capability discovery returned no records");
        }
        found
    }

    /// Returns every capability owned by `service_name`, ordered by realm,
    /// then name.
    #[must_use]
    pub fn capabilities_by_service(&self, service_name: &str) -> Vec<CapabilityRecord> {
        let owner = service_name.trim();
        let mut found = self
            .store
            .list::<CapabilityRecord, _>(|record| record.service_name().as_str() == owner);
        found.sort_by(|left, right| {
            left.realm()
                .cmp(&right.realm())
                .then_with(|| left.capability_name().cmp(right.capability_name()))
        });
        found
    }

    /// Returns capabilities in `realm`, or in every realm when `None`.
    #[must_use]
    pub fn list(&self, realm: Option<Realm>) -> Vec<CapabilityRecord> {
        let mut found = self
            .store
            .list::<CapabilityRecord, _>(|record| {
                realm.is_none_or(|value| record.realm() == value)
            });
        sort_by_owner(&mut found);
        found
    }

    /// Changes the lifecycle state of a capability on behalf of its owner.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityRegistryError::NotFound`] when `service_name` has
    /// no such capability and [`CapabilityRegistryError::Store`] when the
    /// store is closed.
    pub fn set_state(
        &self,
        service_name: &str,
        capability_name: &str,
        realm: Realm,
        state: CapabilityState,
    ) -> CapabilityRegistryResult<CapabilityRecord> {
        let key = storage_key(service_name.trim(), realm, capability_name.trim());
        let updated = self
            .store
            .update::<CapabilityRecord, _>(&key, service_name.trim(), |record| {
                record.clone().with_state(state)
            })?
            .ok_or_else(|| not_found(service_name, capability_name, realm))?;
        info!(
            service = service_name,
            capability = capability_name,
            %realm,
            %state,
            "capability state changed"
        );
        Ok(updated.into_record())
    }

    /// Removes a capability on behalf of its owner.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityRegistryError::NotFound`] when `service_name` has
    /// no such capability and [`CapabilityRegistryError::Store`] when the
    /// store is closed.
    pub fn deregister(
        &self,
        service_name: &str,
        capability_name: &str,
        realm: Realm,
    ) -> CapabilityRegistryResult<CapabilityRecord> {
        let key = storage_key(service_name.trim(), realm, capability_name.trim());
        let removed = self
            .store
            .remove::<CapabilityRecord>(&key, Some(service_name.trim()))?
            .ok_or_else(|| not_found(service_name, capability_name, realm))?;
        info!(
            service = service_name,
            capability = capability_name,
            %realm,
            "capability deregistered"
        );
        Ok(removed)
    }

    /// Returns invocable records named `capability_name` that carry a
    /// `soa_api` contract.
    ///
    /// Records in `preferred_realm` come first; the rest follow in realm
    /// order. Capabilities under maintenance are skipped, as are those of a
    /// registered service that is not accepting requests.
    #[must_use]
    pub fn find_invocable(
        &self,
        capability_name: &str,
        preferred_realm: Realm,
    ) -> Vec<CapabilityRecord> {
        let name = capability_name.trim();
        let mut found = self.store.list::<CapabilityRecord, _>(|record| {
            record.capability_name().as_str() == name
                && record.has_contract(ContractKind::SoaApi)
                && record.state().is_invocable()
        });
        found.retain(|record| self.owner_accepts_requests(record.service_name().as_str()));
        found.sort_by(|left, right| {
            (left.realm() != preferred_realm)
                .cmp(&(right.realm() != preferred_realm))
                .then_with(|| left.realm().cmp(&right.realm()))
                .then_with(|| left.service_name().cmp(right.service_name()))
        });
        found
    }

    fn owner_accepts_requests(&self, service_name: &str) -> bool {
        self.store
            .get::<ServiceRecord>(service_name)
            .is_none_or(|service| service.state().accepts_requests())
    }

    /// Returns the number of registered capabilities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.count(RecordKind::Capability)
    }
}

fn storage_key(service_name: &str, realm: Realm, capability_name: &str) -> String {
    format!("{service_name}/{realm}/{capability_name}")
}

fn sort_by_owner(records: &mut [CapabilityRecord]) {
    records.sort_by(|left, right| {
        left.service_name()
            .cmp(right.service_name())
            .then_with(|| left.capability_name().cmp(right.capability_name()))
    });
}

fn not_found(service_name: &str, capability_name: &str, realm: Realm) -> CapabilityRegistryError {
    CapabilityRegistryError::NotFound {
        service_name: service_name.trim().to_owned(),
        capability_name: capability_name.trim().to_owned(),
        realm,
    }
}
