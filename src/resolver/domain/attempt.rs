//! Per-tier attempt records.

use super::AccessTier;
use serde::{Deserialize, Serialize};

/// What happened when one tier was tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum AttemptOutcome {
    /// No callable could be obtained for the tier.
    NotResolved,
    /// The callable reported its backing dependency as unreachable.
    Unavailable(String),
    /// The tier did not complete within the per-tier timeout.
    TimedOut,
    /// The callable returned a result.
    Succeeded,
    /// The callable raised a business error carrying this code.
    BusinessFailure(String),
    /// The caller cancelled while the tier was in flight.
    Cancelled,
}

impl AttemptOutcome {
    /// Returns whether the chain moves on to the next tier after this
    /// outcome.
    #[must_use]
    pub const fn advances(&self) -> bool {
        matches!(self, Self::NotResolved | Self::Unavailable(_) | Self::TimedOut)
    }
}

/// A single tier attempt within an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAttempt {
    position: usize,
    tier: AccessTier,
    outcome: AttemptOutcome,
}

impl TierAttempt {
    /// Creates an attempt record. `position` is the 1-based index of the
    /// tier in the caller's chain.
    #[must_use]
    pub const fn new(position: usize, tier: AccessTier, outcome: AttemptOutcome) -> Self {
        Self {
            position,
            tier,
            outcome,
        }
    }

    /// Returns the 1-based position in the chain.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the tier tried.
    #[must_use]
    pub const fn tier(&self) -> AccessTier {
        self.tier
    }

    /// Returns the attempt outcome.
    #[must_use]
    pub const fn outcome(&self) -> &AttemptOutcome {
        &self.outcome
    }
}
