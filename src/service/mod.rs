//! Registry of running service instances.
//!
//! A service registers once at start-up with its network location and the
//! capability names it offers, then moves through lifecycle states until it
//! is unregistered. The capabilities themselves, with their contracts, are
//! registered separately through [`crate::capability`].
//!
//! - Domain types in [`domain`]
//! - Registry service in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
