//! Domain model for route attribution.
//!
//! A route is a `(path, method)` pair owned by the domain that defined it.
//! Its identifier is derived deterministically so independent processes
//! agree on it.

mod error;
mod ids;
mod method;
mod record;

pub use error::{ParseHttpMethodError, RouteDomainError};
pub use ids::{RouteId, RoutePath};
pub use method::HttpMethod;
pub use record::RouteRecord;
