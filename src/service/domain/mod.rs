//! Domain model for registered service instances.

mod error;
mod record;
mod state;

pub use error::{ParseServiceStateError, ServiceDomainError};
pub use record::{ServicePatch, ServiceRecord};
pub use state::ServiceState;
