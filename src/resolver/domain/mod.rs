//! Domain types for tiered capability access.

mod attempt;
mod error;
mod report;
mod tier;

pub use attempt::{AttemptOutcome, TierAttempt};
pub use error::InvokeError;
pub use report::InvocationReport;
pub use tier::{AccessTier, CallerRole, TierTrail};
