//! Record kinds, versioned entries and upsert outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Service capability records.
    Capability,
    /// Autonomous agent records.
    Agent,
    /// Route definitions.
    Route,
    /// Mesh policy reports.
    Policy,
    /// Running service instances.
    Service,
}

impl RecordKind {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Capability => "capability",
            Self::Agent => "agent",
            Self::Route => "route",
            Self::Policy => "policy",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can be held in the record store.
///
/// `KIND` selects the namespace the value lives in.
pub trait StoreRecord: Clone + Send + Sync + 'static {
    /// Namespace for values of this type.
    const KIND: RecordKind;
}

/// A stored record together with its ownership and version metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<R> {
    record: R,
    identity: String,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<R> Versioned<R> {
    pub(super) const fn new(
        record: R,
        identity: String,
        version: u64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            record,
            identity,
            version,
            created_at,
            updated_at,
        }
    }

    /// Returns the stored record.
    #[must_use]
    pub const fn record(&self) -> &R {
        &self.record
    }

    /// Consumes the wrapper and returns the record.
    #[must_use]
    pub fn into_record(self) -> R {
        self.record
    }

    /// Returns the owning identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the version counter, starting at 1.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the key was first written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the key was last written.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Result of a successful upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum UpsertOutcome {
    /// The key did not exist and was created at version 1.
    Created,
    /// The key existed under the same identity and was replaced.
    Updated {
        /// Version after the update.
        version: u64,
    },
}

impl UpsertOutcome {
    /// Returns whether the key was newly created.
    #[must_use]
    pub const fn is_created(self) -> bool {
        matches!(self, Self::Created)
    }

    /// Returns the version of the entry after the upsert.
    #[must_use]
    pub const fn version(self) -> u64 {
        match self {
            Self::Created => 1,
            Self::Updated { version } => version,
        }
    }
}

/// A validated record paired with the outcome of storing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered<R> {
    record: R,
    outcome: UpsertOutcome,
}

impl<R> Registered<R> {
    /// Pairs `record` with its upsert outcome.
    #[must_use]
    pub const fn new(record: R, outcome: UpsertOutcome) -> Self {
        Self { record, outcome }
    }

    /// Returns the stored record.
    #[must_use]
    pub const fn record(&self) -> &R {
        &self.record
    }

    /// Consumes the wrapper and returns the record.
    #[must_use]
    pub fn into_record(self) -> R {
        self.record
    }

    /// Returns the upsert outcome.
    #[must_use]
    pub const fn outcome(&self) -> UpsertOutcome {
        self.outcome
    }
}
