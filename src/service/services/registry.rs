//! Service instance registry over the shared record store.
//!
//! Instances are keyed and owned by their service name. Re-registering a
//! name replaces the record and bumps its version.

use crate::envelope::ErrorCode;
use crate::realm::Realm;
use crate::service::domain::{ServiceDomainError, ServicePatch, ServiceRecord, ServiceState};
use crate::store::{RecordKind, RecordStore, Registered, StoreError, StoreRecord, Versioned};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

impl StoreRecord for ServiceRecord {
    const KIND: RecordKind = RecordKind::Service;
}

/// Request payload for registering a service instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterServiceRequest {
    service_name: String,
    service_type: Option<String>,
    realm: Option<String>,
    address: Option<String>,
    port: Option<u16>,
    tags: Vec<String>,
    capabilities: Vec<String>,
    endpoints: Vec<String>,
    health_check_endpoint: Option<String>,
}

impl RegisterServiceRequest {
    /// Creates a request for `service_name` at the default location.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    /// Sets the service type.
    #[must_use]
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    /// Sets the realm.
    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Sets the network location.
    #[must_use]
    pub fn with_location(mut self, address: impl Into<String>, port: u16) -> Self {
        self.address = Some(address.into());
        self.port = Some(port);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the offered capability names.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = String>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    /// Sets the served endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: impl IntoIterator<Item = String>) -> Self {
        self.endpoints = endpoints.into_iter().collect();
        self
    }

    /// Sets the health check endpoint.
    #[must_use]
    pub fn with_health_check_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.health_check_endpoint = Some(endpoint.into());
        self
    }

    fn into_record(self) -> Result<ServiceRecord, ServiceDomainError> {
        let mut record = ServiceRecord::new(self.service_name)?
            .with_tags(self.tags)
            .with_capabilities(self.capabilities)
            .with_endpoints(self.endpoints);
        if let Some(service_type) = self.service_type {
            record = record.with_service_type(service_type);
        }
        if let Some(realm) = self.realm {
            record = record.with_realm(Realm::try_from(realm.as_str())?);
        }
        if self.address.is_some() || self.port.is_some() {
            let address = self.address.unwrap_or_else(|| record.address().to_owned());
            let port = self.port.unwrap_or(record.port());
            record = record.with_location(address, port)?;
        }
        if let Some(endpoint) = self.health_check_endpoint {
            record = record.with_health_check_endpoint(endpoint)?;
        }
        Ok(record)
    }
}

/// Partial update for a registered service instance.
///
/// Only the fields set here change; the rest keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceUpdate {
    service_type: Option<String>,
    realm: Option<String>,
    address: Option<String>,
    port: Option<u16>,
    tags: Option<Vec<String>>,
    capabilities: Option<Vec<String>>,
    endpoints: Option<Vec<String>>,
    health_check_endpoint: Option<String>,
    state: Option<String>,
}

impl ServiceUpdate {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the service type.
    #[must_use]
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    /// Changes the realm.
    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Changes the address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Changes the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Replaces the offered capability names.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = String>) -> Self {
        self.capabilities = Some(capabilities.into_iter().collect());
        self
    }

    /// Replaces the served endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: impl IntoIterator<Item = String>) -> Self {
        self.endpoints = Some(endpoints.into_iter().collect());
        self
    }

    /// Changes the health check endpoint.
    #[must_use]
    pub fn with_health_check_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.health_check_endpoint = Some(endpoint.into());
        self
    }

    /// Changes the lifecycle state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    fn into_patch(self) -> Result<ServicePatch, ServiceDomainError> {
        let mut patch = ServicePatch::new();
        if let Some(service_type) = self.service_type {
            patch = patch.with_service_type(service_type);
        }
        if let Some(realm) = self.realm {
            patch = patch.with_realm(Realm::try_from(realm.as_str())?);
        }
        if let Some(address) = self.address {
            patch = patch.with_address(address)?;
        }
        if let Some(port) = self.port {
            patch = patch.with_port(port)?;
        }
        if let Some(tags) = self.tags {
            patch = patch.with_tags(tags);
        }
        if let Some(capabilities) = self.capabilities {
            patch = patch.with_capabilities(capabilities);
        }
        if let Some(endpoints) = self.endpoints {
            patch = patch.with_endpoints(endpoints);
        }
        if let Some(endpoint) = self.health_check_endpoint {
            patch = patch.with_health_check_endpoint(endpoint)?;
        }
        if let Some(state) = self.state {
            patch = patch.with_state(ServiceState::try_from(state.as_str())?);
        }
        Ok(patch)
    }
}

/// Service-level errors for service registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceRegistryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ServiceDomainError),
    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No service is registered under the name.
    #[error("service '{0}' is not registered")]
    NotFound(String),
}

impl ServiceRegistryError {
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

/// Result type for service registry operations.
pub type ServiceRegistryResult<T> = Result<T, ServiceRegistryError>;

/// Service instance registration and lookup.
#[derive(Debug)]
pub struct ServiceRegistry<C>
where
    C: Clock + Send + Sync,
{
    store: Arc<RecordStore<C>>,
}

impl<C> Clone for ServiceRegistry<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<C> ServiceRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a registry over `store`.
    #[must_use]
    pub const fn new(store: Arc<RecordStore<C>>) -> Self {
        Self { store }
    }

    /// Validates and registers a service instance in the active state.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::Domain`] for malformed input and
    /// [`ServiceRegistryError::Store`] when the store is closed.
    pub fn register(
        &self,
        request: RegisterServiceRequest,
    ) -> ServiceRegistryResult<Registered<ServiceRecord>> {
        let record = request.into_record().inspect_err(|err| {
            warn!(error = %err, "service registration rejected");
        })?;
        self.store_record(record)
    }

    /// Re-validates and registers a prebuilt record.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ServiceRegistry::register`].
    pub fn register_record(
        &self,
        record: ServiceRecord,
    ) -> ServiceRegistryResult<Registered<ServiceRecord>> {
        self.store_record(record.validated()?)
    }

    fn store_record(
        &self,
        record: ServiceRecord,
    ) -> ServiceRegistryResult<Registered<ServiceRecord>> {
        let name = record.service_name();
        let outcome = self.store.upsert(name, record.clone(), name)?;
        info!(
            service = name,
            service_id = %record.service_id(),
            version = outcome.version(),
            created = outcome.is_created(),
            "service registered"
        );
        Ok(Registered::new(record, outcome))
    }

    /// Applies `update` to a registered service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::Domain`] for a malformed update,
    /// [`ServiceRegistryError::NotFound`] when the service is unknown and
    /// [`ServiceRegistryError::Store`] when the store is closed.
    pub fn update(
        &self,
        service_name: &str,
        update: ServiceUpdate,
    ) -> ServiceRegistryResult<ServiceRecord> {
        let patch = update.into_patch()?;
        self.apply_patch(service_name, &patch)
    }

    /// Moves a registered service to `state`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::NotFound`] when the service is
    /// unknown and [`ServiceRegistryError::Store`] when the store is closed.
    pub fn set_state(
        &self,
        service_name: &str,
        state: ServiceState,
    ) -> ServiceRegistryResult<ServiceRecord> {
        let record = self.apply_patch(service_name, &ServicePatch::new().with_state(state))?;
        info!(service = record.service_name(), %state, "service state changed");
        Ok(record)
    }

    fn apply_patch(
        &self,
        service_name: &str,
        patch: &ServicePatch,
    ) -> ServiceRegistryResult<ServiceRecord> {
        let name = service_name.trim();
        let updated = self
            .store
            .update::<ServiceRecord, _>(name, name, |record| patch.apply(record))?
            .ok_or_else(|| ServiceRegistryError::NotFound(name.to_owned()))?;
        info!(service = name, version = updated.version(), "service updated");
        Ok(updated.into_record())
    }

    /// Returns the service registered as `service_name`, if any.
    #[must_use]
    pub fn get(&self, service_name: &str) -> Option<ServiceRecord> {
        self.get_versioned(service_name).map(Versioned::into_record)
    }

    /// Returns the service with its store metadata.
    #[must_use]
    pub fn get_versioned(&self, service_name: &str) -> Option<Versioned<ServiceRecord>> {
        let found = self.store.get_versioned::<ServiceRecord>(service_name.trim());
        if found.is_none() {
            debug!(service = service_name, "service not found");
        }
        found
    }

    /// Returns services in `realm`, or every service when `None`, ordered by
    /// name.
    #[must_use]
    pub fn list(&self, realm: Option<Realm>) -> Vec<ServiceRecord> {
        let mut found = self.store.list::<ServiceRecord, _>(|record| {
            realm.is_none_or(|value| record.realm() == Some(value))
        });
        found.sort_by(|left, right| left.service_name().cmp(right.service_name()));
        found
    }

    /// Removes the service registered as `service_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::NotFound`] when no such service
    /// exists.
    pub fn deregister(&self, service_name: &str) -> ServiceRegistryResult<ServiceRecord> {
        let name = service_name.trim();
        let removed = self
            .store
            .remove::<ServiceRecord>(name, Some(name))?
            .ok_or_else(|| ServiceRegistryError::NotFound(name.to_owned()))?;
        info!(service = name, "service deregistered");
        Ok(removed)
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.count(RecordKind::Service)
    }
}
