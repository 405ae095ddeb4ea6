//! Domain model for reported mesh policies.
//!
//! Policies are metadata: the registry stores what a domain reports and
//! never interprets or enforces the values.

mod error;
mod policies;
mod report;

pub use error::PolicyDomainError;
pub use policies::MeshPolicies;
pub use report::PolicyReport;
