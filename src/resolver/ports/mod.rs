//! Ports the resolver depends on.

mod gateway;
mod handler;

#[cfg(test)]
pub use gateway::MockGatewayResolver;
pub use gateway::GatewayResolver;
pub use handler::{CapabilityHandler, HandlerDirectory, HandlerError, HandlerResult, SharedHandler};
