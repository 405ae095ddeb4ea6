//! The `Curator` facade.

use super::RegistryStatus;
use crate::agent::domain::AgentRecord;
use crate::agent::services::{
    AgentFilter, AgentRegistry, AgentRegistryError, RegisterAgentRequest,
};
use crate::capability::domain::{CapabilityRecord, CapabilityState};
use crate::capability::services::{
    CapabilityRegistry, CapabilityRegistryError, RegisterCapabilityRequest,
};
use crate::envelope::{ErrorCode, ResponseEnvelope};
use crate::policy::domain::PolicyReport;
use crate::policy::services::{
    PolicyAggregatorError, PolicyReportAggregator, ReportPolicyRequest,
};
use crate::realm::Realm;
use crate::route::domain::{HttpMethod, RoutePath, RouteRecord};
use crate::route::services::{
    RegisterRouteRequest, RouteFilter, RouteRegistry, RouteRegistryError,
};
use crate::service::domain::{ServiceRecord, ServiceState};
use crate::service::services::{
    RegisterServiceRequest, ServiceRegistry, ServiceRegistryError, ServiceUpdate,
};
use crate::store::{RecordKind, RecordStore, Registered};
use mockable::{Clock, DefaultClock};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of a capability registration through the facade.
///
/// Routes for the capability's `rest_api` and `soa_api` endpoints are
/// tracked automatically. A route that cannot be tracked is reported here
/// and never fails the capability registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRegistration {
    registered: Registered<CapabilityRecord>,
    tracked_routes: Vec<RouteRecord>,
    route_conflicts: Vec<String>,
}

impl CapabilityRegistration {
    /// Returns the stored capability and its upsert outcome.
    #[must_use]
    pub const fn registered(&self) -> &Registered<CapabilityRecord> {
        &self.registered
    }

    /// Returns the stored capability.
    #[must_use]
    pub const fn record(&self) -> &CapabilityRecord {
        self.registered.record()
    }

    /// Returns the routes recorded for the capability's endpoints.
    #[must_use]
    pub fn tracked_routes(&self) -> &[RouteRecord] {
        &self.tracked_routes
    }

    /// Returns one message per endpoint that could not be tracked.
    #[must_use]
    pub fn route_conflicts(&self) -> &[String] {
        &self.route_conflicts
    }
}

/// Records removed when a service instance is unregistered.
///
/// Unregistering a service also removes every capability it owns, the
/// routes it defines and its policy report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnregistration {
    service: ServiceRecord,
    capabilities: Vec<CapabilityRecord>,
    released_routes: usize,
    policy_withdrawn: bool,
}

impl ServiceUnregistration {
    /// Returns the removed service record.
    #[must_use]
    pub const fn service(&self) -> &ServiceRecord {
        &self.service
    }

    /// Returns the capabilities removed with the service.
    #[must_use]
    pub fn capabilities(&self) -> &[CapabilityRecord] {
        &self.capabilities
    }

    /// Returns how many routes were removed with the service.
    #[must_use]
    pub const fn released_routes(&self) -> usize {
        self.released_routes
    }

    /// Returns whether a policy report was withdrawn.
    #[must_use]
    pub const fn policy_withdrawn(&self) -> bool {
        self.policy_withdrawn
    }
}

/// Single entry point for registration and discovery.
///
/// Every registry shares one record store, injected at construction.
#[derive(Debug)]
pub struct Curator<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    store: Arc<RecordStore<C>>,
    services: ServiceRegistry<C>,
    capabilities: CapabilityRegistry<C>,
    agents: AgentRegistry<C>,
    routes: RouteRegistry<C>,
    policies: PolicyReportAggregator<C>,
}

impl<C> Clone for Curator<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            services: self.services.clone(),
            capabilities: self.capabilities.clone(),
            agents: self.agents.clone(),
            routes: self.routes.clone(),
            policies: self.policies.clone(),
        }
    }
}

impl Curator<DefaultClock> {
    /// Creates a facade over a fresh store using the system clock.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(RecordStore::with_default_clock()))
    }
}

impl<C> Curator<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a facade whose registries all share `store`.
    #[must_use]
    pub fn new(store: Arc<RecordStore<C>>) -> Self {
        Self {
            services: ServiceRegistry::new(Arc::clone(&store)),
            capabilities: CapabilityRegistry::new(Arc::clone(&store)),
            agents: AgentRegistry::new(Arc::clone(&store)),
            routes: RouteRegistry::new(Arc::clone(&store)),
            policies: PolicyReportAggregator::new(Arc::clone(&store)),
            store,
        }
    }

    /// Returns the service instance registry.
    #[must_use]
    pub const fn services(&self) -> &ServiceRegistry<C> {
        &self.services
    }

    /// Returns the capability registry.
    #[must_use]
    pub const fn capabilities(&self) -> &CapabilityRegistry<C> {
        &self.capabilities
    }

    /// Returns the agent registry.
    #[must_use]
    pub const fn agents(&self) -> &AgentRegistry<C> {
        &self.agents
    }

    /// Returns the route registry.
    #[must_use]
    pub const fn routes(&self) -> &RouteRegistry<C> {
        &self.routes
    }

    /// Returns the policy aggregator.
    #[must_use]
    pub const fn policies(&self) -> &PolicyReportAggregator<C> {
        &self.policies
    }

    /// Registers a service instance and reports the outcome as an envelope.
    #[must_use]
    pub fn register_service(&self, request: RegisterServiceRequest) -> ResponseEnvelope {
        match self.register_service_typed(request) {
            Ok(registered) => {
                let service = registered.record();
                let outcome = registered.outcome();
                ResponseEnvelope::ok(json!({
                    "service_name": service.service_name(),
                    "service_id": service.service_id(),
                    "state": service.state(),
                    "version": outcome.version(),
                    "created": outcome.is_created(),
                }))
                .with_message(format!("service '{}' registered", service.service_name()))
            }
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Registers a service instance.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError`] when validation fails or the
    /// registry is closed.
    pub fn register_service_typed(
        &self,
        request: RegisterServiceRequest,
    ) -> Result<Registered<ServiceRecord>, ServiceRegistryError> {
        self.services.register(request)
    }

    /// Applies a partial update to a registered service.
    #[must_use]
    pub fn update_service(&self, service_name: &str, update: ServiceUpdate) -> ResponseEnvelope {
        service_envelope(self.services.update(service_name, update))
    }

    /// Moves a registered service to a new lifecycle state.
    #[must_use]
    pub fn update_service_state(
        &self,
        service_name: &str,
        state: ServiceState,
    ) -> ResponseEnvelope {
        service_envelope(self.services.set_state(service_name, state))
    }

    /// Unregisters a service and everything it owns, reported as an envelope.
    #[must_use]
    pub fn unregister_service(&self, service_name: &str) -> ResponseEnvelope {
        match self.unregister_service_typed(service_name) {
            Ok(removed) => ResponseEnvelope::ok(json!({
                "service_name": removed.service().service_name(),
                "removed_capabilities": removed.capabilities().len(),
                "released_routes": removed.released_routes(),
                "policy_withdrawn": removed.policy_withdrawn(),
            }))
            .with_message(format!(
                "service '{}' unregistered",
                removed.service().service_name()
            )),
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Unregisters a service, then removes its capabilities, the routes it
    /// defines and its policy report.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::NotFound`] when the service is not
    /// registered. Failures while removing owned records are logged and
    /// leave those records in place.
    pub fn unregister_service_typed(
        &self,
        service_name: &str,
    ) -> Result<ServiceUnregistration, ServiceRegistryError> {
        let service = self.services.deregister(service_name)?;
        let owner = service.service_name();

        let mut capabilities = Vec::new();
        let mut released_routes = 0;
        for capability in self.capabilities.capabilities_by_service(owner) {
            match self.capabilities.deregister(
                owner,
                capability.capability_name().as_str(),
                capability.realm(),
            ) {
                Ok(removed) => {
                    released_routes += self.release_routes(&removed);
                    capabilities.push(removed);
                }
                Err(err) => warn!(
                    service = owner,
                    capability = %capability.capability_name(),
                    error = %err,
                    "owned capability not removed"
                ),
            }
        }
        released_routes += self.release_owned_routes(owner);
        let policy_withdrawn = self.withdraw_owned_policy(owner);

        info!(
            service = owner,
            capabilities = capabilities.len(),
            released_routes,
            policy_withdrawn,
            "service unregistered"
        );
        Ok(ServiceUnregistration {
            service,
            capabilities,
            released_routes,
            policy_withdrawn,
        })
    }

    fn release_owned_routes(&self, owner: &str) -> usize {
        let mut released = 0;
        for route in self.routes.discover_matching(&RouteFilter::any().defined_by(owner)) {
            match self.routes.deregister(route.path().as_str(), route.method(), owner) {
                Ok(_) => released += 1,
                Err(err) => {
                    warn!(route_id = %route.route_id(), error = %err, "owned route not released");
                }
            }
        }
        released
    }

    fn withdraw_owned_policy(&self, owner: &str) -> bool {
        match self.policies.withdraw(owner) {
            Ok(_) => true,
            Err(PolicyAggregatorError::NotFound(_)) => false,
            Err(err) => {
                warn!(service = owner, error = %err, "policy report not withdrawn");
                false
            }
        }
    }

    /// Drains a service, waits for `drain_period`, then unregisters it.
    ///
    /// A service that cannot be marked as draining is still unregistered;
    /// the envelope reports the unregistration outcome.
    pub async fn graceful_shutdown(
        &self,
        service_name: &str,
        drain_period: Duration,
    ) -> ResponseEnvelope {
        if let Err(err) = self.services.set_state(service_name, ServiceState::Draining) {
            warn!(service = service_name, error = %err, "service not marked as draining");
        }
        info!(
            service = service_name,
            drain_ms = drain_period.as_millis(),
            "draining service"
        );
        tokio::time::sleep(drain_period).await;
        self.unregister_service(service_name)
    }

    /// Returns every registered service, ordered by name.
    #[must_use]
    pub fn get_registered_services(&self) -> Vec<ServiceRecord> {
        self.services.list(None)
    }

    /// Returns the service registered as `service_name`, if any.
    #[must_use]
    pub fn discover_service_by_name(&self, service_name: &str) -> Option<ServiceRecord> {
        self.services.get(service_name)
    }

    /// Registers a capability and reports the outcome as an envelope.
    #[must_use]
    pub fn register_capability(&self, request: RegisterCapabilityRequest) -> ResponseEnvelope {
        match self.register_capability_typed(request) {
            Ok(registration) => {
                let record = registration.record();
                let outcome = registration.registered().outcome();
                ResponseEnvelope::ok(json!({
                    "service_name": record.service_name().as_str(),
                    "capability_name": record.capability_name().as_str(),
                    "realm": record.realm(),
                    "version": outcome.version(),
                    "created": outcome.is_created(),
                    "tracked_routes": registration
                        .tracked_routes()
                        .iter()
                        .map(|route| route.route_id().as_str())
                        .collect::<Vec<_>>(),
                    "route_conflicts": registration.route_conflicts(),
                }))
                .with_message(format!(
                    "capability '{}' registered",
                    record.capability_name()
                ))
            }
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Registers a capability and tracks routes for its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityRegistryError`] when validation fails or the
    /// registry is closed. Route tracking failures are reported in the
    /// returned [`CapabilityRegistration`] instead.
    pub fn register_capability_typed(
        &self,
        request: RegisterCapabilityRequest,
    ) -> Result<CapabilityRegistration, CapabilityRegistryError> {
        let registered = self.capabilities.register(request)?;
        let (tracked_routes, route_conflicts) = self.track_routes(registered.record());
        Ok(CapabilityRegistration {
            registered,
            tracked_routes,
            route_conflicts,
        })
    }

    fn track_routes(&self, capability: &CapabilityRecord) -> (Vec<RouteRecord>, Vec<String>) {
        let contracts = capability.contracts();
        let endpoints = contracts
            .rest_api()
            .map(|rest| (rest.endpoint(), rest.method()))
            .into_iter()
            .chain(
                contracts
                    .soa_api()
                    .map(|soa| (soa.endpoint(), soa.method())),
            );

        let mut tracked: Vec<RouteRecord> = Vec::new();
        let mut conflicts = Vec::new();
        for (endpoint, method) in endpoints {
            match self.track_route(capability, endpoint, method) {
                Ok(route) => {
                    if !tracked.iter().any(|known| known.route_id() == route.route_id()) {
                        tracked.push(route);
                    }
                }
                Err(err) => {
                    warn!(
                        service = %capability.service_name(),
                        capability = %capability.capability_name(),
                        %method,
                        endpoint,
                        error = %err,
                        "route tracking skipped"
                    );
                    conflicts.push(format!("{method} {endpoint}: {err}"));
                }
            }
        }
        (tracked, conflicts)
    }

    fn track_route(
        &self,
        capability: &CapabilityRecord,
        endpoint: &str,
        method: HttpMethod,
    ) -> Result<RouteRecord, RouteRegistryError> {
        let owner = capability.service_name().as_str();
        let route = RouteRecord::new(
            RoutePath::new(endpoint)?,
            method,
            capability.realm(),
            owner,
        )?
        .with_service_name(owner)
        .with_capability_name(capability.capability_name().as_str())
        .with_version(capability.version().as_str());
        Ok(self.routes.register_record(route)?.into_record())
    }

    /// Registers an agent and reports the outcome as an envelope.
    #[must_use]
    pub fn register_agent(&self, request: RegisterAgentRequest) -> ResponseEnvelope {
        match self.register_agent_typed(request) {
            Ok(registered) => {
                let outcome = registered.outcome();
                ResponseEnvelope::ok(json!({
                    "agent_id": registered.record().agent_id().as_str(),
                    "version": outcome.version(),
                    "created": outcome.is_created(),
                }))
                .with_message(format!(
                    "agent '{}' registered",
                    registered.record().agent_id()
                ))
            }
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Registers an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError`] when validation fails or the registry
    /// is closed.
    pub fn register_agent_typed(
        &self,
        request: RegisterAgentRequest,
    ) -> Result<Registered<AgentRecord>, AgentRegistryError> {
        self.agents.register(request)
    }

    /// Registers a route and reports the outcome as an envelope.
    #[must_use]
    pub fn register_route(&self, request: RegisterRouteRequest) -> ResponseEnvelope {
        match self.register_route_typed(request) {
            Ok(registered) => {
                let route = registered.record();
                let outcome = registered.outcome();
                ResponseEnvelope::ok(json!({
                    "route_id": route.route_id().as_str(),
                    "path": route.path().as_str(),
                    "method": route.method(),
                    "defined_by": route.defined_by(),
                    "version": outcome.version(),
                    "created": outcome.is_created(),
                }))
            }
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Registers a route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteRegistryError`] when validation fails or another
    /// domain owns the route.
    pub fn register_route_typed(
        &self,
        request: RegisterRouteRequest,
    ) -> Result<Registered<RouteRecord>, RouteRegistryError> {
        self.routes.register(request)
    }

    /// Stores a policy report and reports the outcome as an envelope.
    #[must_use]
    pub fn report_policy(&self, request: ReportPolicyRequest) -> ResponseEnvelope {
        match self.report_policy_typed(request) {
            Ok(registered) => ResponseEnvelope::ok(json!({
                "service_name": registered.record().service_name(),
                "version": registered.outcome().version(),
            })),
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Stores a policy report.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyAggregatorError`] when the report is malformed or the
    /// registry is closed.
    pub fn report_policy_typed(
        &self,
        request: ReportPolicyRequest,
    ) -> Result<Registered<PolicyReport>, PolicyAggregatorError> {
        self.policies.report(request)
    }

    /// Returns capabilities in `realm` matching `query`.
    #[must_use]
    pub fn discover_capabilities(&self, realm: Realm, query: &str) -> Vec<CapabilityRecord> {
        self.capabilities.discover(realm, query)
    }

    /// Returns agents accepted by `filter`.
    #[must_use]
    pub fn discover_agents(&self, filter: &AgentFilter) -> Vec<AgentRecord> {
        self.agents.discover(filter)
    }

    /// Returns routes in `realm`, or every route when `None`.
    #[must_use]
    pub fn discover_routes(&self, realm: Option<Realm>) -> Vec<RouteRecord> {
        self.routes.discover(realm)
    }

    /// Returns routes accepted by `filter`.
    #[must_use]
    pub fn discover_routes_matching(&self, filter: &RouteFilter) -> Vec<RouteRecord> {
        self.routes.discover_matching(filter)
    }

    /// Returns a snapshot of every policy report keyed by service.
    #[must_use]
    pub fn get_policy_aggregate(&self) -> BTreeMap<String, PolicyReport> {
        self.policies.aggregate_view()
    }

    /// Returns a capability owned by `service_name`.
    #[must_use]
    pub fn get_capability(
        &self,
        service_name: &str,
        capability_name: &str,
        realm: Realm,
    ) -> Option<CapabilityRecord> {
        self.capabilities.get(service_name, capability_name, realm)
    }

    /// Returns an agent by identifier.
    #[must_use]
    pub fn get_agent(&self, agent_id: &str) -> Option<AgentRecord> {
        self.agents.get(agent_id)
    }

    /// Returns a route by path and method.
    #[must_use]
    pub fn get_route(&self, path: &str, method: HttpMethod) -> Option<RouteRecord> {
        self.routes.get(path, method)
    }

    /// Returns the latest policy report for a service.
    #[must_use]
    pub fn get_policy_report(&self, service_name: &str) -> Option<PolicyReport> {
        self.policies.get_report(service_name)
    }

    /// Changes a capability's lifecycle state on behalf of its owner.
    #[must_use]
    pub fn set_capability_state(
        &self,
        service_name: &str,
        capability_name: &str,
        realm: Realm,
        state: CapabilityState,
    ) -> ResponseEnvelope {
        match self
            .capabilities
            .set_state(service_name, capability_name, realm, state)
        {
            Ok(record) => ResponseEnvelope::ok(json!({
                "capability_name": record.capability_name().as_str(),
                "state": record.state(),
            })),
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Removes a capability and the routes tracked for it.
    #[must_use]
    pub fn deregister_capability(
        &self,
        service_name: &str,
        capability_name: &str,
        realm: Realm,
    ) -> ResponseEnvelope {
        match self
            .capabilities
            .deregister(service_name, capability_name, realm)
        {
            Ok(record) => {
                let released = self.release_routes(&record);
                ResponseEnvelope::ok(json!({
                    "capability_name": record.capability_name().as_str(),
                    "released_routes": released,
                }))
            }
            Err(err) => failure(err.error_code(), &err),
        }
    }

    fn release_routes(&self, capability: &CapabilityRecord) -> usize {
        let owner = capability.service_name().as_str();
        let filter = RouteFilter::any()
            .in_realm(capability.realm())
            .defined_by(owner);
        let mut released = 0;
        for route in self.routes.discover_matching(&filter) {
            if route.capability_name() != Some(capability.capability_name().as_str()) {
                continue;
            }
            match self
                .routes
                .deregister(route.path().as_str(), route.method(), owner)
            {
                Ok(_) => released += 1,
                Err(err) => {
                    warn!(route_id = %route.route_id(), error = %err, "tracked route not released");
                }
            }
        }
        released
    }

    /// Removes an agent.
    #[must_use]
    pub fn deregister_agent(&self, agent_id: &str) -> ResponseEnvelope {
        match self.agents.deregister(agent_id) {
            Ok(record) => ResponseEnvelope::ok(json!({ "agent_id": record.agent_id().as_str() })),
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Removes a route on behalf of its defining domain.
    #[must_use]
    pub fn deregister_route(
        &self,
        path: &str,
        method: HttpMethod,
        defined_by: &str,
    ) -> ResponseEnvelope {
        match self.routes.deregister(path, method, defined_by) {
            Ok(route) => ResponseEnvelope::ok(json!({ "route_id": route.route_id().as_str() })),
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Withdraws a service's policy report.
    #[must_use]
    pub fn withdraw_policy(&self, service_name: &str) -> ResponseEnvelope {
        match self.policies.withdraw(service_name) {
            Ok(report) => {
                ResponseEnvelope::ok(json!({ "service_name": report.service_name() }))
            }
            Err(err) => failure(err.error_code(), &err),
        }
    }

    /// Returns record counts per namespace.
    #[must_use]
    pub fn status(&self) -> RegistryStatus {
        RegistryStatus {
            services: self.store.count(RecordKind::Service),
            capabilities: self.store.count(RecordKind::Capability),
            agents: self.store.count(RecordKind::Agent),
            routes: self.store.count(RecordKind::Route),
            policy_reports: self.store.count(RecordKind::Policy),
            closed: self.store.is_closed(),
            checked_at: self.store.now(),
        }
    }

    /// Drops every record; the registry stays usable.
    pub fn reset(&self) {
        self.store.reset();
        info!("registry reset");
    }

    /// Drops every record and rejects further registrations.
    pub fn close(&self) {
        self.store.close();
        info!("registry closed");
    }
}

fn service_envelope(result: Result<ServiceRecord, ServiceRegistryError>) -> ResponseEnvelope {
    match result {
        Ok(service) => ResponseEnvelope::ok(json!({
            "service_name": service.service_name(),
            "service_id": service.service_id(),
            "state": service.state(),
        })),
        Err(err) => failure(err.error_code(), &err),
    }
}

fn failure(code: ErrorCode, err: &impl fmt::Display) -> ResponseEnvelope {
    ResponseEnvelope::failure(code, err.to_string())
}
