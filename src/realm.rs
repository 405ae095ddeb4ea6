//! Realm identifiers.
//!
//! A realm is the coarse access-control boundary a service belongs to. The
//! set is closed: registrations naming an unknown realm are rejected during
//! validation rather than stored under an ad-hoc string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Organisational realm grouping platform services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Realm {
    /// Platform-enabling services (security, telemetry, storage roles).
    SmartCity,
    /// Business-logic enabling services such as parsers and analysers.
    BusinessEnablement,
    /// Solution composition and orchestration.
    Solution,
    /// User journey orchestration.
    Journey,
    /// User-facing experience layer.
    Experience,
}

impl Realm {
    /// Every known realm, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::SmartCity,
        Self::BusinessEnablement,
        Self::Solution,
        Self::Journey,
        Self::Experience,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SmartCity => "smart_city",
            Self::BusinessEnablement => "business_enablement",
            Self::Solution => "solution",
            Self::Journey => "journey",
            Self::Experience => "experience",
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a realm name is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown realm: {0}")]
pub struct ParseRealmError(pub String);

impl TryFrom<&str> for Realm {
    type Error = ParseRealmError;

    /// Parses both `snake_case` and `PascalCase` spellings, so
    /// `"business_enablement"` and `"BusinessEnablement"` name the same realm.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "smartcity" => Ok(Self::SmartCity),
            "businessenablement" => Ok(Self::BusinessEnablement),
            "solution" => Ok(Self::Solution),
            "journey" => Ok(Self::Journey),
            "experience" => Ok(Self::Experience),
            _ => Err(ParseRealmError(value.to_owned())),
        }
    }
}

impl FromStr for Realm {
    type Err = ParseRealmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}
