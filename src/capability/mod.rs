//! Service capability registry.
//!
//! Services register the capabilities they expose, each described by typed
//! contracts (`soa_api`, `mcp_tool`, `rest_api`). Each service owns its own
//! record per realm and name; re-registering updates it in place.
//! Discovery answers realm-scoped substring queries.
//!
//! - Domain types in [`domain`]
//! - Registry service in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
