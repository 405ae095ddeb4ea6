//! Mesh policy report aggregation.
//!
//! Domains report load-balancing, timeout and circuit-breaker hints for
//! their services. The aggregator keeps the latest report per service and
//! exposes a merged read view for an external mesh controller.

pub mod domain;
pub mod services;
