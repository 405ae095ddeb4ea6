//! Route registry: records which domain defined each `(path, method)`.

use crate::envelope::ErrorCode;
use crate::realm::Realm;
use crate::route::domain::{HttpMethod, RouteDomainError, RouteId, RoutePath, RouteRecord};
use crate::store::{
    RecordKind, RecordStore, Registered, StoreError, StoreRecord, Versioned,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

impl StoreRecord for RouteRecord {
    const KIND: RecordKind = RecordKind::Route;
}

/// Request payload for registering a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRouteRequest {
    path: String,
    method: String,
    realm: String,
    defined_by: String,
    service_name: Option<String>,
    capability_name: Option<String>,
    pillar: Option<String>,
    description: Option<String>,
    version: Option<String>,
}

impl RegisterRouteRequest {
    /// Creates a request with the required route fields.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        method: impl Into<String>,
        realm: impl Into<String>,
        defined_by: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            realm: realm.into(),
            defined_by: defined_by.into(),
            service_name: None,
            capability_name: None,
            pillar: None,
            description: None,
            version: None,
        }
    }

    /// Attributes the route to a service.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Links the route to a capability.
    #[must_use]
    pub fn with_capability_name(mut self, capability_name: impl Into<String>) -> Self {
        self.capability_name = Some(capability_name.into());
        self
    }

    /// Sets the pillar.
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

    fn into_record(self) -> Result<RouteRecord, RouteDomainError> {
        let path = RoutePath::new(self.path)?;
        let method = HttpMethod::try_from(self.method.as_str())?;
        let realm = Realm::try_from(self.realm.as_str())?;
        let mut record = RouteRecord::new(path, method, realm, self.defined_by)?;
        if let Some(service_name) = self.service_name {
            record = record.with_service_name(service_name);
        }
        if let Some(capability_name) = self.capability_name {
            record = record.with_capability_name(capability_name);
        }
        if let Some(pillar) = self.pillar {
            record = record.with_pillar(pillar);
        }
        if let Some(description) = self.description {
            record = record.with_description(description);
        }
        if let Some(version) = self.version {
            record = record.with_version(version);
        }
        Ok(record)
    }
}

/// Optional constraints for route discovery; absent fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter {
    realm: Option<Realm>,
    defined_by: Option<String>,
    pillar: Option<String>,
}

impl RouteFilter {
    /// Creates a filter matching every route.
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

    /// Restricts matches to routes defined by `owner`.
    #[must_use]
    pub fn defined_by(mut self, owner: impl Into<String>) -> Self {
        self.defined_by = Some(owner.into());
        self
    }

    /// Restricts matches to `pillar`.
    #[must_use]
    pub fn in_pillar(mut self, pillar: impl Into<String>) -> Self {
        self.pillar = Some(pillar.into());
        self
    }

    fn matches(&self, route: &RouteRecord) -> bool {
        self.realm.is_none_or(|realm| route.realm() == realm)
            && self
                .defined_by
                .as_deref()
                .is_none_or(|owner| route.defined_by() == owner)
            && self
                .pillar
                .as_deref()
                .is_none_or(|pillar| route.pillar() == Some(pillar))
    }
}

/// Service-level errors for route registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteRegistryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] RouteDomainError),
    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No route exists for the method and path.
    #[error("route {method} {path} is not registered")]
    NotFound {
        /// Requested method.
        method: HttpMethod,
        /// Requested path.
        path: String,
    },
}

impl RouteRegistryError {
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

/// Result type for route registry operations.
pub type RouteRegistryResult<T> = Result<T, RouteRegistryError>;

/// Route attribution registry over the shared record store.
#[derive(Debug)]
pub struct RouteRegistry<C>
where
    C: Clock + Send + Sync,
{
    store: Arc<RecordStore<C>>,
}

impl<C> Clone for RouteRegistry<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<C> RouteRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a registry over `store`.
    #[must_use]
    pub const fn new(store: Arc<RecordStore<C>>) -> Self {
        Self { store }
    }

    /// Validates and records a route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteRegistryError::Domain`] for malformed input and
    /// [`RouteRegistryError::Store`] when the route is owned by another
    /// domain or the store is closed.
    pub fn register(
        &self,
        request: RegisterRouteRequest,
    ) -> RouteRegistryResult<Registered<RouteRecord>> {
        let record = request.into_record()?;
        self.register_record(record)
    }

    /// Records an already validated route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteRegistryError::Store`] when the route is owned by
    /// another domain or the store is closed.
    pub fn register_record(
        &self,
        record: RouteRecord,
    ) -> RouteRegistryResult<Registered<RouteRecord>> {
        let outcome = self
            .store
            .upsert(record.route_id().as_str(), record.clone(), record.defined_by())
            .inspect_err(|err| {
                warn!(
                    method = %record.method(),
                    path = %record.path(),
                    defined_by = record.defined_by(),
                    error = %err,
                    "route registration rejected"
                );
            })?;
        info!(
            route_id = %record.route_id(),
            method = %record.method(),
            path = %record.path(),
            defined_by = record.defined_by(),
            version = outcome.version(),
            "route registered"
        );
        Ok(Registered::new(record, outcome))
    }

    /// Returns the route for `path` and `method`, if registered.
    #[must_use]
    pub fn get(&self, path: &str, method: HttpMethod) -> Option<RouteRecord> {
        let id = Self::route_id(path, method)?;
        let found = self.store.get::<RouteRecord>(id.as_str());
        if found.is_none() {
            debug!(%method, path, "route not found");
        }
        found
    }

    /// Returns the route for `path` and `method` with its store metadata.
    #[must_use]
    pub fn get_versioned(&self, path: &str, method: HttpMethod) -> Option<Versioned<RouteRecord>> {
        let id = Self::route_id(path, method)?;
        self.store.get_versioned::<RouteRecord>(id.as_str())
    }

    /// Returns routes in `realm`, or every route when `realm` is `None`.
    ///
    /// Results are ordered by path, then method.
    #[must_use]
    pub fn discover(&self, realm: Option<Realm>) -> Vec<RouteRecord> {
        let filter =
            realm.map_or_else(RouteFilter::any, |value| RouteFilter::any().in_realm(value));
        self.discover_matching(&filter)
    }

    /// Returns routes accepted by `filter`, ordered by path, then method.
    #[must_use]
    pub fn discover_matching(&self, filter: &RouteFilter) -> Vec<RouteRecord> {
        let mut routes = self.store.list::<RouteRecord, _>(|route| filter.matches(route));
        routes.sort_by(|left, right| {
            left.path()
                .cmp(right.path())
                .then_with(|| left.method().cmp(&right.method()))
        });
        routes
    }

    /// Removes the route on behalf of its defining domain.
    ///
    /// # Errors
    ///
    /// Returns [`RouteRegistryError::NotFound`] when no such route exists and
    /// [`RouteRegistryError::Store`] when `defined_by` does not own it.
    pub fn deregister(
        &self,
        path: &str,
        method: HttpMethod,
        defined_by: &str,
    ) -> RouteRegistryResult<RouteRecord> {
        let not_found = || RouteRegistryError::NotFound {
            method,
            path: path.trim().to_owned(),
        };
        let id = Self::route_id(path, method).ok_or_else(not_found)?;
        let removed = self
            .store
            .remove::<RouteRecord>(id.as_str(), Some(defined_by))?
            .ok_or_else(not_found)?;
        info!(%method, path = %removed.path(), defined_by, "route deregistered");
        Ok(removed)
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.count(RecordKind::Route)
    }

    fn route_id(path: &str, method: HttpMethod) -> Option<RouteId> {
        RoutePath::new(path)
            .ok()
            .map(|valid| RouteId::derive(method, &valid))
    }
}
