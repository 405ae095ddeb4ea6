//! Route aggregate attributing a path and method to a defining domain.

use super::{HttpMethod, RouteDomainError, RouteId, RoutePath};
use crate::realm::Realm;
use serde::{Deserialize, Serialize};

/// Registry-tracked route definition.
///
/// Routes are defined by domains; the registry only records attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    route_id: RouteId,
    path: RoutePath,
    method: HttpMethod,
    realm: Realm,
    defined_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    capability_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pillar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl RouteRecord {
    /// Creates a route record, deriving its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RouteDomainError::EmptyDefinedBy`] when `defined_by` is
    /// blank.
    pub fn new(
        path: RoutePath,
        method: HttpMethod,
        realm: Realm,
        defined_by: impl Into<String>,
    ) -> Result<Self, RouteDomainError> {
        let owner = defined_by.into().trim().to_owned();
        if owner.is_empty() {
            return Err(RouteDomainError::EmptyDefinedBy);
        }
        Ok(Self {
            route_id: RouteId::derive(method, &path),
            path,
            method,
            realm,
            defined_by: owner,
            service_name: None,
            capability_name: None,
            pillar: None,
            description: None,
            version: None,
        })
    }

    /// Attributes the route to a service.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Links the route to the capability it serves.
    #[must_use]
    pub fn with_capability_name(mut self, capability_name: impl Into<String>) -> Self {
        self.capability_name = Some(capability_name.into());
        self
    }

    /// Sets the pillar grouping the route.
    #[must_use]
    pub fn with_pillar(mut self, pillar: impl Into<String>) -> Self {
        self.pillar = Some(pillar.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the API version label.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Returns the derived identifier.
    #[must_use]
    pub const fn route_id(&self) -> &RouteId {
        &self.route_id
    }

    /// Returns the path.
    #[must_use]
    pub const fn path(&self) -> &RoutePath {
        &self.path
    }

    /// Returns the method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the realm.
    #[must_use]
    pub const fn realm(&self) -> Realm {
        self.realm
    }

    /// Returns the originating identity.
    #[must_use]
    pub fn defined_by(&self) -> &str {
        &self.defined_by
    }

    /// Returns the attributed service, if any.
    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    /// Returns the linked capability, if any.
    #[must_use]
    pub fn capability_name(&self) -> Option<&str> {
        self.capability_name.as_deref()
    }

    /// Returns the pillar, if any.
    #[must_use]
    pub fn pillar(&self) -> Option<&str> {
        self.pillar.as_deref()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the version label, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}
