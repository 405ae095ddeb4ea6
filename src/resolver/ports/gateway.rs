//! Access gateway port.

use super::SharedHandler;
use crate::realm::Realm;
use async_trait::async_trait;

/// Realm-scoped abstraction lookup performed by the access gateway.
///
/// Permission checks happen behind this port; a denied or unknown
/// capability resolves to `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GatewayResolver: Send + Sync {
    /// Returns a callable for `capability` as seen from `realm`.
    async fn resolve(&self, realm: Realm, capability: &str) -> Option<SharedHandler>;
}
