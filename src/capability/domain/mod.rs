//! Domain model for service capabilities.
//!
//! A capability is owned by the service that registers it and described by
//! one or more typed contracts. Contract payloads are validated against a
//! fixed schema per kind when constructed or deserialised.

mod contract;
mod error;
mod ids;
mod record;
mod semantic;
mod state;

pub use contract::{
    CapabilityContracts, ContractKind, HandlerRef, McpToolContract, RestApiContract,
    SoaApiContract,
};
pub use error::{CapabilityDomainError, ParseCapabilityStateError};
pub use ids::{CapabilityName, CapabilityVersion, ServiceName};
pub use record::CapabilityRecord;
pub use semantic::SemanticMapping;
pub use state::CapabilityState;
