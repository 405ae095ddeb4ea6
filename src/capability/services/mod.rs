//! Application services for capability registration and discovery.

mod registry;

pub use registry::{
    CapabilityRegistry, CapabilityRegistryError, CapabilityRegistryResult,
    RegisterCapabilityRequest,
};
