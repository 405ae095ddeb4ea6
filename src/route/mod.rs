//! Route attribution registry.
//!
//! Routes are domain-defined and registry-tracked: the registry never
//! originates a route, it records which domain owns each `(path, method)`
//! pair for later discovery and mesh bootstrap.
//!
//! - Domain types in [`domain`]
//! - Registry service in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
