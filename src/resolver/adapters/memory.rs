//! In-memory resolver adapters for tests and single-process deployments.

use crate::capability::domain::HandlerRef;
use crate::realm::Realm;
use crate::resolver::ports::{
    CapabilityHandler, GatewayResolver, HandlerDirectory, HandlerResult, SharedHandler,
};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Callable backed by an async closure.
pub struct FnHandler<F> {
    call: F,
}

impl<F> FnHandler<F> {
    /// Wraps `call` as a capability handler.
    #[must_use]
    pub const fn new(call: F) -> Self {
        Self { call }
    }
}

impl<F, Fut> FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    /// Wraps `call` as a shared handler.
    #[must_use]
    pub fn shared(call: F) -> SharedHandler {
        Arc::new(Self::new(call))
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> CapabilityHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn call(&self, args: Value) -> HandlerResult {
        (self.call)(args).await
    }
}

/// Handler directory backed by a concurrent map.
///
/// Clones share the same entries.
#[derive(Clone, Default)]
pub struct InMemoryHandlerDirectory {
    handlers: Arc<DashMap<HandlerRef, SharedHandler>>,
}

impl InMemoryHandlerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `reference`, replacing any earlier callable.
    pub fn register(&self, reference: HandlerRef, handler: SharedHandler) {
        self.handlers.insert(reference, handler);
    }

    /// Removes the callable registered under `reference`.
    pub fn unregister(&self, reference: &HandlerRef) {
        self.handlers.remove(reference);
    }

    /// Returns the number of registered callables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for InMemoryHandlerDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryHandlerDirectory")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[async_trait]
impl HandlerDirectory for InMemoryHandlerDirectory {
    async fn resolve(&self, handler: &HandlerRef) -> Option<SharedHandler> {
        self.handlers.get(handler).map(|entry| Arc::clone(entry.value()))
    }
}

/// Gateway that grants access per `(realm, capability)` pair.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    grants: Arc<DashMap<(Realm, String), SharedHandler>>,
}

impl InMemoryGateway {
    /// Creates a gateway that denies everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants callers in `realm` access to `capability` through `handler`.
    pub fn grant(&self, realm: Realm, capability: impl Into<String>, handler: SharedHandler) {
        let name = capability.into().trim().to_owned();
        self.grants.insert((realm, name), handler);
    }

    /// Withdraws a grant.
    pub fn revoke(&self, realm: Realm, capability: &str) {
        self.grants.remove(&(realm, capability.trim().to_owned()));
    }
}

impl fmt::Debug for InMemoryGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryGateway")
            .field("grants", &self.grants.len())
            .finish()
    }
}

#[async_trait]
impl GatewayResolver for InMemoryGateway {
    async fn resolve(&self, realm: Realm, capability: &str) -> Option<SharedHandler> {
        self.grants
            .get(&(realm, capability.trim().to_owned()))
            .map(|entry| Arc::clone(entry.value()))
    }
}
