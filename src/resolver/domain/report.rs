//! The result of one resolver invocation.

use super::{AttemptOutcome, InvokeError, TierAttempt};
use crate::envelope::ResponseEnvelope;
use serde_json::Value;
use uuid::Uuid;

/// Everything an invocation produced: its attempts and its outcome.
///
/// Every invocation yields a report, and every report converts to either a
/// result value or an [`InvokeError`].
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationReport {
    invocation_id: Uuid,
    capability: String,
    attempts: Vec<TierAttempt>,
    outcome: Result<Value, InvokeError>,
}

impl InvocationReport {
    /// Assembles a report.
    #[must_use]
    pub const fn new(
        invocation_id: Uuid,
        capability: String,
        attempts: Vec<TierAttempt>,
        outcome: Result<Value, InvokeError>,
    ) -> Self {
        Self {
            invocation_id,
            capability,
            attempts,
            outcome,
        }
    }

    /// Returns the per-invocation identifier, also recorded on the `invoke`
    /// span.
    #[must_use]
    pub const fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }

    /// Returns the capability requested.
    #[must_use]
    pub fn capability(&self) -> &str {
        &self.capability
    }

    /// Returns the tier attempts in order.
    #[must_use]
    pub fn attempts(&self) -> &[TierAttempt] {
        &self.attempts
    }

    /// Returns the 1-based chain positions of every attempted tier.
    #[must_use]
    pub fn attempted_positions(&self) -> Vec<usize> {
        self.attempts.iter().map(TierAttempt::position).collect()
    }

    /// Returns the attempt that produced the final result, if any.
    #[must_use]
    pub fn succeeded_attempt(&self) -> Option<&TierAttempt> {
        self.attempts
            .iter()
            .find(|attempt| *attempt.outcome() == AttemptOutcome::Succeeded)
    }

    /// Returns the outcome.
    #[must_use]
    pub const fn outcome(&self) -> &Result<Value, InvokeError> {
        &self.outcome
    }

    /// Returns whether a tier produced a result.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Renders the outcome as a response envelope.
    #[must_use]
    pub fn envelope(&self) -> ResponseEnvelope {
        match &self.outcome {
            Ok(value) => ResponseEnvelope::ok(value.clone()),
            Err(InvokeError::Business { code, message }) => {
                ResponseEnvelope::failure_with_code(code.as_str(), message.as_str())
                    .with_message(message.as_str())
            }
            Err(err) => {
                let message = err.to_string();
                ResponseEnvelope::failure(err.error_code(), message.as_str()).with_message(message)
            }
        }
    }

    /// Consumes the report, keeping only the outcome.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`InvokeError`] when no tier produced a result.
    pub fn into_result(self) -> Result<Value, InvokeError> {
        self.outcome
    }
}
