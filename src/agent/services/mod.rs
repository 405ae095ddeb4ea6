//! Application services for agent registration and discovery.

mod registry;

pub use registry::{
    AgentFilter, AgentRegistry, AgentRegistryError, AgentRegistryResult, RegisterAgentRequest,
};
