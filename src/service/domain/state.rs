//! Service lifecycle state.

use super::ParseServiceStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a registered service instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    /// Running and accepting requests.
    #[default]
    Active,
    /// Stopped but still registered.
    Inactive,
    /// Temporarily not serving.
    Maintenance,
    /// Still serving but scheduled for removal.
    Deprecated,
    /// Shutting down; finishing in-flight work only.
    Draining,
}

impl ServiceState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Active,
        Self::Inactive,
        Self::Maintenance,
        Self::Deprecated,
        Self::Draining,
    ];

    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
            Self::Deprecated => "deprecated",
            Self::Draining => "draining",
        }
    }

    /// Returns whether a service in this state takes new requests.
    #[must_use]
    pub const fn accepts_requests(self) -> bool {
        matches!(self, Self::Active | Self::Deprecated)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceState {
    type Error = ParseServiceStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| ParseServiceStateError(value.to_owned()))
    }
}
