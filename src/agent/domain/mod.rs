//! Domain model for autonomous agents.
//!
//! Agents are discovered by realm, capability, specialization and role.
//! They consume tools through a dependency list and never register a tool
//! of their own.

mod characteristics;
mod contracts;
mod error;
mod ids;
mod record;

pub use characteristics::AgentCharacteristics;
pub use contracts::{AgentApi, AgentContracts, ToolDependency};
pub use error::AgentDomainError;
pub use ids::AgentId;
pub use record::AgentRecord;
