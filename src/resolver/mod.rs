//! Tiered capability access.
//!
//! Callers invoke capabilities by name; [`services::TieredAccessResolver`]
//! walks an ordered chain of access tiers and falls back on unavailability,
//! never on business failure. Every invocation produces an
//! [`domain::InvocationReport`].
//!
//! - Domain types in [`domain`]
//! - Port traits in [`ports`]
//! - In-memory adapters in [`adapters`]
//! - The resolver service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
