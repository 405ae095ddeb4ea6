//! Runtime configuration.
//!
//! Every section deserialises from JSON with missing fields falling back to
//! [`Default`].
//!
//! ```
//! use curator::config::CuratorConfig;
//!
//! let config = CuratorConfig::from_json_str(r#"{"resolver": {"tier_timeout_ms": 250}}"#)
//!     .expect("valid configuration");
//! assert_eq!(config.resolver.tier_timeout_ms, 250);
//! assert!(config.resolver.enabling_service_tier);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Tiered access resolver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Milliseconds a tier call may run before the chain advances.
    pub tier_timeout_ms: u64,
    /// Whether the orchestrator chain starts with the in-process
    /// enabling-service tier.
    pub enabling_service_tier: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tier_timeout_ms: 30_000,
            enabling_service_tier: true,
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration that gives up on a tier after one second.
    #[must_use]
    pub const fn fast_fail() -> Self {
        Self {
            tier_timeout_ms: 1_000,
            enabling_service_tier: true,
        }
    }

    /// Returns the per-tier timeout.
    #[must_use]
    pub const fn tier_timeout(&self) -> Duration {
        Duration::from_millis(self.tier_timeout_ms)
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratorConfig {
    /// Resolver settings.
    pub resolver: ResolverConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input is not valid JSON for the configuration shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CuratorConfig {
    /// Parses configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is malformed.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }
}
