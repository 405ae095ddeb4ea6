//! Application services for route attribution.

mod registry;

pub use registry::{
    RegisterRouteRequest, RouteFilter, RouteRegistry, RouteRegistryError, RouteRegistryResult,
};
