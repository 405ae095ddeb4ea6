//! Application services for service instance registration.

mod registry;

pub use registry::{
    RegisterServiceRequest, ServiceRegistry, ServiceRegistryError, ServiceRegistryResult,
    ServiceUpdate,
};
