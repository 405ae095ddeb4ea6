//! Discovery facade composing every registry.
//!
//! [`Curator`] is the single entry point for registration and discovery.
//! It owns one [`crate::store::RecordStore`] shared by the service,
//! capability, agent, route and policy registries, and answers registration
//! calls with a [`crate::envelope::ResponseEnvelope`] so a bootstrapping
//! service can log a failure and continue.

mod facade;
mod status;

pub use facade::{CapabilityRegistration, Curator, ServiceUnregistration};
pub use status::RegistryStatus;

#[cfg(test)]
mod tests;
