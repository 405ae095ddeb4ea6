//! Per-call caller context.

use crate::realm::Realm;
use crate::resolver::domain::CallerRole;
use crate::resolver::ports::SharedHandler;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Who is calling, from which realm, and with what direct references.
#[derive(Clone)]
pub struct CallerContext {
    role: CallerRole,
    realm: Realm,
    enabling_services: BTreeMap<String, SharedHandler>,
    cancellation: CancellationToken,
    tier_timeout: Option<Duration>,
}

impl CallerContext {
    /// Creates a context for `role` calling from `realm`.
    #[must_use]
    pub fn new(role: CallerRole, realm: Realm) -> Self {
        Self {
            role,
            realm,
            enabling_services: BTreeMap::new(),
            cancellation: CancellationToken::new(),
            tier_timeout: None,
        }
    }

    /// Creates an orchestrator context.
    #[must_use]
    pub fn orchestrator(realm: Realm) -> Self {
        Self::new(CallerRole::Orchestrator, realm)
    }

    /// Creates an enabling-service context.
    #[must_use]
    pub fn enabling_service(realm: Realm) -> Self {
        Self::new(CallerRole::EnablingService, realm)
    }

    /// Adds a direct in-process reference to the enabling service that
    /// implements `capability`.
    #[must_use]
    pub fn with_enabling_service(
        mut self,
        capability: impl Into<String>,
        handler: SharedHandler,
    ) -> Self {
        self.enabling_services
            .insert(capability.into().trim().to_owned(), handler);
        self
    }

    /// Uses `token` to cancel the invocation.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Overrides the configured per-tier timeout for this call.
    #[must_use]
    pub const fn with_tier_timeout(mut self, timeout: Duration) -> Self {
        self.tier_timeout = Some(timeout);
        self
    }

    /// Returns the caller role.
    #[must_use]
    pub const fn role(&self) -> CallerRole {
        self.role
    }

    /// Returns the caller realm.
    #[must_use]
    pub const fn realm(&self) -> Realm {
        self.realm
    }

    /// Returns the direct reference held for `capability`, if any.
    #[must_use]
    pub fn enabling_service_for(&self, capability: &str) -> Option<SharedHandler> {
        self.enabling_services.get(capability).map(Arc::clone)
    }

    /// Returns the cancellation token.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Returns the per-call timeout override.
    #[must_use]
    pub const fn tier_timeout(&self) -> Option<Duration> {
        self.tier_timeout
    }
}

impl fmt::Debug for CallerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallerContext")
            .field("role", &self.role)
            .field("realm", &self.realm)
            .field(
                "enabling_services",
                &self.enabling_services.keys().collect::<Vec<_>>(),
            )
            .field("cancelled", &self.cancellation.is_cancelled())
            .field("tier_timeout", &self.tier_timeout)
            .finish()
    }
}
