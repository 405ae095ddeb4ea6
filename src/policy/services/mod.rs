//! Application services for policy report aggregation.

mod aggregator;

pub use aggregator::{
    PolicyAggregatorError, PolicyAggregatorResult, PolicyReportAggregator, ReportPolicyRequest,
};
