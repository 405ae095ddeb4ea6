//! Tracing subscriber installation.
//!
//! The library only emits `tracing` events; binaries and test harnesses call
//! [`init_tracing`] once to decide where they go.

use crate::config::{LogFormat, LoggingConfig};
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Errors returned while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser failure.
        source: ParseError,
    },

    /// A global subscriber is already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialised,
}

/// Builds the event filter. `RUST_LOG` wins over the configured level.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when `RUST_LOG` is unset and the
/// configured level does not parse.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return Ok(from_env);
    }
    EnvFilter::try_new(config.level.trim()).map_err(|source| LoggingError::InvalidFilter {
        directive: config.level.clone(),
        source,
    })
}

/// Installs a global subscriber writing to stderr in the configured format.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] for a malformed level and
/// [`LoggingError::AlreadyInitialised`] when called twice in one process.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let registry = Registry::default().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInitialised)
}
