//! Service instance aggregate.

use super::{ServiceDomainError, ServiceState};
use crate::realm::Realm;
use serde::{Deserialize, Serialize};

const DEFAULT_SERVICE_TYPE: &str = "unknown";
const DEFAULT_ADDRESS: &str = "localhost";
const DEFAULT_PORT: u16 = 8000;

/// A running service instance known to the registry.
///
/// The instance identifier is derived from the name, address and port, so
/// moving a service to a new location yields a new identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    service_name: String,
    #[serde(default = "default_service_type")]
    service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    realm: Option<Realm>,
    #[serde(default = "default_address")]
    address: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    endpoints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    health_check_endpoint: Option<String>,
    #[serde(default)]
    state: ServiceState,
}

impl ServiceRecord {
    /// Creates an active record at the default location.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::EmptyServiceName`] when the name is
    /// blank.
    pub fn new(service_name: impl Into<String>) -> Result<Self, ServiceDomainError> {
        let normalized = service_name.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ServiceDomainError::EmptyServiceName);
        }
        Ok(Self {
            service_name: normalized,
            service_type: default_service_type(),
            realm: None,
            address: default_address(),
            port: DEFAULT_PORT,
            tags: Vec::new(),
            capabilities: Vec::new(),
            endpoints: Vec::new(),
            health_check_endpoint: None,
            state: ServiceState::default(),
        })
    }

    /// Sets the service type. Blank values keep the current type.
    #[must_use]
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        let value = service_type.into().trim().to_owned();
        if !value.is_empty() {
            self.service_type = value;
        }
        self
    }

    /// Sets the realm.
    #[must_use]
    pub const fn with_realm(mut self, realm: Realm) -> Self {
        self.realm = Some(realm);
        self
    }

    /// Sets the network location.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::EmptyAddress`] for a blank address and
    /// [`ServiceDomainError::InvalidPort`] for port zero.
    pub fn with_location(
        mut self,
        address: impl Into<String>,
        port: u16,
    ) -> Result<Self, ServiceDomainError> {
        let normalized = address.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ServiceDomainError::EmptyAddress);
        }
        if port == 0 {
            return Err(ServiceDomainError::InvalidPort);
        }
        self.address = normalized;
        self.port = port;
        Ok(self)
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = normalized_list(tags);
        self
    }

    /// Replaces the offered capability names.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = String>) -> Self {
        self.capabilities = normalized_list(capabilities);
        self
    }

    /// Replaces the served endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: impl IntoIterator<Item = String>) -> Self {
        self.endpoints = normalized_list(endpoints);
        self
    }

    /// Sets the health check endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::InvalidHealthCheckEndpoint`] unless the
    /// endpoint is an absolute path.
    pub fn with_health_check_endpoint(
        mut self,
        endpoint: impl Into<String>,
    ) -> Result<Self, ServiceDomainError> {
        let path = endpoint.into().trim().to_owned();
        if !path.starts_with('/') {
            return Err(ServiceDomainError::InvalidHealthCheckEndpoint(path));
        }
        self.health_check_endpoint = Some(path);
        Ok(self)
    }

    /// Sets the lifecycle state.
    #[must_use]
    pub const fn with_state(mut self, state: ServiceState) -> Self {
        self.state = state;
        self
    }

    /// Re-checks invariants on a record built outside the constructors.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError`] when the name or address is blank, the
    /// port is zero, or the health check endpoint is not a path.
    pub fn validated(self) -> Result<Self, ServiceDomainError> {
        let mut record = Self::new(self.service_name)?
            .with_service_type(self.service_type)
            .with_location(self.address, self.port)?
            .with_tags(self.tags)
            .with_capabilities(self.capabilities)
            .with_endpoints(self.endpoints)
            .with_state(self.state);
        record.realm = self.realm;
        if let Some(endpoint) = self.health_check_endpoint {
            record = record.with_health_check_endpoint(endpoint)?;
        }
        Ok(record)
    }

    /// Returns the service name.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the instance identifier, `name-address-port`.
    #[must_use]
    pub fn service_id(&self) -> String {
        format!("{}-{}-{}", self.service_name, self.address, self.port)
    }

    /// Returns the service type.
    #[must_use]
    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    /// Returns the realm, if declared.
    #[must_use]
    pub const fn realm(&self) -> Option<Realm> {
        self.realm
    }

    /// Returns the network address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the offered capability names.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Returns the served endpoints.
    #[must_use]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Returns the health check endpoint, if any.
    #[must_use]
    pub fn health_check_endpoint(&self) -> Option<&str> {
        self.health_check_endpoint.as_deref()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ServiceState {
        self.state
    }
}

/// A validated partial update for a [`ServiceRecord`].
///
/// Fields left unset keep their current value when the patch is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServicePatch {
    service_type: Option<String>,
    realm: Option<Realm>,
    address: Option<String>,
    port: Option<u16>,
    tags: Option<Vec<String>>,
    capabilities: Option<Vec<String>>,
    endpoints: Option<Vec<String>>,
    health_check_endpoint: Option<String>,
    state: Option<ServiceState>,
}

impl ServicePatch {
    /// Creates a patch that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the service type. Blank values are ignored.
    #[must_use]
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        let value = service_type.into().trim().to_owned();
        self.service_type = (!value.is_empty()).then_some(value);
        self
    }

    /// Changes the realm.
    #[must_use]
    pub const fn with_realm(mut self, realm: Realm) -> Self {
        self.realm = Some(realm);
        self
    }

    /// Changes the address.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::EmptyAddress`] for a blank address.
    pub fn with_address(mut self, address: impl Into<String>) -> Result<Self, ServiceDomainError> {
        let normalized = address.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ServiceDomainError::EmptyAddress);
        }
        self.address = Some(normalized);
        Ok(self)
    }

    /// Changes the port.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::InvalidPort`] for port zero.
    pub fn with_port(mut self, port: u16) -> Result<Self, ServiceDomainError> {
        if port == 0 {
            return Err(ServiceDomainError::InvalidPort);
        }
        self.port = Some(port);
        Ok(self)
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(normalized_list(tags));
        self
    }

    /// Replaces the offered capability names.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = String>) -> Self {
        self.capabilities = Some(normalized_list(capabilities));
        self
    }

    /// Replaces the served endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: impl IntoIterator<Item = String>) -> Self {
        self.endpoints = Some(normalized_list(endpoints));
        self
    }

    /// Changes the health check endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::InvalidHealthCheckEndpoint`] unless the
    /// endpoint is an absolute path.
    pub fn with_health_check_endpoint(
        mut self,
        endpoint: impl Into<String>,
    ) -> Result<Self, ServiceDomainError> {
        let path = endpoint.into().trim().to_owned();
        if !path.starts_with('/') {
            return Err(ServiceDomainError::InvalidHealthCheckEndpoint(path));
        }
        self.health_check_endpoint = Some(path);
        Ok(self)
    }

    /// Changes the lifecycle state.
    #[must_use]
    pub const fn with_state(mut self, state: ServiceState) -> Self {
        self.state = Some(state);
        self
    }

    /// Returns whether the capability list is replaced.
    #[must_use]
    pub const fn replaces_capabilities(&self) -> bool {
        self.capabilities.is_some()
    }

    /// Returns `record` with every set field replaced.
    #[must_use]
    pub fn apply(&self, record: &ServiceRecord) -> ServiceRecord {
        let current = record.clone();
        ServiceRecord {
            service_name: current.service_name,
            service_type: self.service_type.clone().unwrap_or(current.service_type),
            realm: self.realm.or(current.realm),
            address: self.address.clone().unwrap_or(current.address),
            port: self.port.unwrap_or(current.port),
            tags: self.tags.clone().unwrap_or(current.tags),
            capabilities: self.capabilities.clone().unwrap_or(current.capabilities),
            endpoints: self.endpoints.clone().unwrap_or(current.endpoints),
            health_check_endpoint: self
                .health_check_endpoint
                .clone()
                .or(current.health_check_endpoint),
            state: self.state.unwrap_or(current.state),
        }
    }
}

fn default_service_type() -> String {
    DEFAULT_SERVICE_TYPE.to_owned()
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_owned()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn normalized_list(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut list: Vec<String> = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !list.iter().any(|known| known == trimmed) {
            list.push(trimmed.to_owned());
        }
    }
    list
}
