//! Shared world state for tiered access BDD scenarios.

use std::sync::Arc;

use curator::capability::domain::{CapabilityContracts, HandlerRef, SoaApiContract};
use curator::capability::services::RegisterCapabilityRequest;
use curator::config::ResolverConfig;
use curator::curator::Curator;
use curator::resolver::adapters::{FnHandler, InMemoryGateway, InMemoryHandlerDirectory};
use curator::resolver::domain::InvocationReport;
use curator::resolver::ports::{HandlerError, SharedHandler};
use curator::resolver::services::{CallerContext, TieredAccessResolver};
use rstest::fixture;
use serde_json::{Value, json};

/// Resolver type used by the BDD world.
pub type TestResolver = TieredAccessResolver<InMemoryHandlerDirectory, InMemoryGateway>;

/// Scenario world for tiered access behaviour tests.
pub struct AccessWorld {
    /// Registry the resolver reads `soa_api` contracts from.
    pub curator: Curator,
    /// Handler directory backing `soa_api` contracts.
    pub directory: Arc<InMemoryHandlerDirectory>,
    /// Access gateway.
    pub gateway: Arc<InMemoryGateway>,
    /// Direct enabling-service references held by the orchestrator.
    pub enabling_services: Vec<(String, SharedHandler)>,
    /// Report from the last invocation.
    pub last_report: Option<InvocationReport>,
}

impl AccessWorld {
    /// Creates a world with empty registries and no grants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            curator: Curator::in_memory(),
            directory: Arc::new(InMemoryHandlerDirectory::new()),
            gateway: Arc::new(InMemoryGateway::new()),
            enabling_services: Vec::new(),
            last_report: None,
        }
    }

    /// Builds a resolver over the world's collaborators.
    #[must_use]
    pub fn resolver(&self) -> TestResolver {
        TieredAccessResolver::from_curator(
            &self.curator,
            Arc::clone(&self.directory),
            Arc::clone(&self.gateway),
            ResolverConfig::fast_fail(),
        )
    }

    /// Adds the world's enabling-service references to `ctx`.
    #[must_use]
    pub fn with_enabling_services(&self, ctx: CallerContext) -> CallerContext {
        self.enabling_services
            .iter()
            .fold(ctx, |acc, (name, handler)| {
                acc.with_enabling_service(name.as_str(), Arc::clone(handler))
            })
    }

    /// Registers `capability` for `service` with a `soa_api` contract served
    /// by `callable`.
    pub fn serve_over_soa(
        &self,
        service: &str,
        capability: &str,
        callable: SharedHandler,
    ) -> Result<(), eyre::Report> {
        let reference = HandlerRef::new(format!("{service}.{capability}"))?;
        let contracts = CapabilityContracts::new().with_soa_api(SoaApiContract::new(
            capability,
            format!("/soa/{capability}"),
            "POST",
            reference.clone(),
        )?);
        self.curator.capabilities().register(RegisterCapabilityRequest::new(
            service,
            capability,
            "business_enablement",
            contracts,
        ))?;
        self.directory.register(reference, callable);
        Ok(())
    }

    /// Returns the last invocation report.
    pub fn last_report(&self) -> Result<&InvocationReport, eyre::Report> {
        self.last_report
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no invocation recorded in scenario world"))
    }
}

impl Default for AccessWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AccessWorld {
    AccessWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Callable returning a parse result with three pages.
#[must_use]
pub fn three_pages() -> SharedHandler {
    FnHandler::shared(|_args: Value| async { Ok(json!({"pages": 3})) })
}

/// Callable whose backing dependency is down.
#[must_use]
pub fn unreachable_dependency() -> SharedHandler {
    FnHandler::shared(|_args: Value| async {
        Err(HandlerError::unavailable("connection refused"))
    })
}

/// Callable that rejects every request with `code`.
#[must_use]
pub fn rejecting(code: String) -> SharedHandler {
    FnHandler::shared(move |_args: Value| {
        let failure = HandlerError::business(code.as_str(), "request rejected");
        async move { Err(failure) }
    })
}
