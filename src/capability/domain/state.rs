//! Capability lifecycle state.

use super::ParseCapabilityStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state advertised for a capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityState {
    /// Serving normally.
    #[default]
    Active,
    /// Still served but scheduled for removal.
    Deprecated,
    /// Temporarily not serving.
    Maintenance,
    /// Served without stability guarantees.
    Experimental,
}

impl CapabilityState {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deprecated => "deprecated",
            Self::Maintenance => "maintenance",
            Self::Experimental => "experimental",
        }
    }

    /// Returns whether callers may invoke a capability in this state.
    #[must_use]
    pub const fn is_invocable(self) -> bool {
        !matches!(self, Self::Maintenance)
    }
}

impl fmt::Display for CapabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CapabilityState {
    type Error = ParseCapabilityStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "deprecated" => Ok(Self::Deprecated),
            "maintenance" => Ok(Self::Maintenance),
            "experimental" => Ok(Self::Experimental),
            _ => Err(ParseCapabilityStateError(value.to_owned())),
        }
    }
}
