//! Point-in-time registry counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record counts per namespace at a moment in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStatus {
    /// Registered service instances.
    pub services: usize,
    /// Registered capabilities.
    pub capabilities: usize,
    /// Registered agents.
    pub agents: usize,
    /// Tracked routes.
    pub routes: usize,
    /// Services with a policy report.
    pub policy_reports: usize,
    /// Whether the registry has been closed.
    pub closed: bool,
    /// When the counts were taken.
    pub checked_at: DateTime<Utc>,
}

impl RegistryStatus {
    /// Returns the total number of stored records.
    #[must_use]
    pub const fn total_records(&self) -> usize {
        self.services + self.capabilities + self.agents + self.routes + self.policy_reports
    }
}
