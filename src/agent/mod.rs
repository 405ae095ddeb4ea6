//! Autonomous agent registry.
//!
//! Agents register once per process start under a globally unique
//! identifier; re-registration by the same identifier updates the record.
//!
//! - Domain types in [`domain`]
//! - Registry service in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
