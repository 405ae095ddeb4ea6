//! Aggregates the latest policy report per service.

use crate::envelope::ErrorCode;
use crate::policy::domain::{MeshPolicies, PolicyDomainError, PolicyReport};
use crate::store::{RecordKind, RecordStore, Registered, StoreError, StoreRecord, Versioned};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info};

impl StoreRecord for PolicyReport {
    const KIND: RecordKind = RecordKind::Policy;
}

/// Request payload for reporting a service's policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPolicyRequest {
    service_name: String,
    source: String,
    policies: MeshPolicies,
}

impl ReportPolicyRequest {
    /// Creates a report request.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        source: impl Into<String>,
        policies: MeshPolicies,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            source: source.into(),
            policies,
        }
    }
}

/// Service-level errors for policy aggregation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyAggregatorError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] PolicyDomainError),
    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No report exists for the service.
    #[error("no policy report for service '{0}'")]
    NotFound(String),
}

impl PolicyAggregatorError {
    /// Returns the envelope code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Domain(_) => ErrorCode::ValidationError,
            Self::Store(err) => err.error_code(),
            Self::NotFound(_) => ErrorCode::NotFound,
        }
    }
}

/// Result type for policy aggregation.
pub type PolicyAggregatorResult<T> = Result<T, PolicyAggregatorError>;

/// Collects reported mesh policies; last writer wins per service.
///
/// The aggregator never enforces or rewrites a policy value. Reports and
/// withdrawals share a gate that [`PolicyReportAggregator::aggregate_view`]
/// holds exclusively, so a view never mixes writes made after it started
/// with writes made before. Clones share the gate.
#[derive(Debug)]
pub struct PolicyReportAggregator<C>
where
    C: Clock + Send + Sync,
{
    store: Arc<RecordStore<C>>,
    view_gate: Arc<RwLock<()>>,
}

impl<C> Clone for PolicyReportAggregator<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            view_gate: Arc::clone(&self.view_gate),
        }
    }
}

impl<C> PolicyReportAggregator<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an aggregator over `store`.
    #[must_use]
    pub fn new(store: Arc<RecordStore<C>>) -> Self {
        Self {
            store,
            view_gate: Arc::new(RwLock::new(())),
        }
    }

    /// Stores `request` as the latest report for its service.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyAggregatorError::Domain`] when the service name or
    /// source is blank, and [`PolicyAggregatorError::Store`] when the store
    /// is closed.
    pub fn report(
        &self,
        request: ReportPolicyRequest,
    ) -> PolicyAggregatorResult<Registered<PolicyReport>> {
        let report = PolicyReport::new(request.service_name, request.source, request.policies)?;
        let service = report.service_name();
        let outcome = {
            let _writing = self.view_gate.read().unwrap_or_else(PoisonError::into_inner);
            self.store.upsert(service, report.clone(), service)?
        };
        info!(
            service,
            source = report.source(),
            version = outcome.version(),
            "policy report stored"
        );
        Ok(Registered::new(report, outcome))
    }

    /// Returns the latest report for `service_name`, if any.
    #[must_use]
    pub fn get_report(&self, service_name: &str) -> Option<PolicyReport> {
        self.get_versioned(service_name).map(Versioned::into_record)
    }

    /// Returns the latest report with its `reported_at` time as
    /// [`Versioned::updated_at`].
    #[must_use]
    pub fn get_versioned(&self, service_name: &str) -> Option<Versioned<PolicyReport>> {
        let found = self.store.get_versioned::<PolicyReport>(service_name.trim());
        if found.is_none() {
            debug!(service = service_name, "no policy report");
        }
        found
    }

    /// Returns a point-in-time copy of every report, keyed by service.
    ///
    /// Reports and withdrawals wait while the copy is taken, so the view
    /// matches the registry at a single instant.
    #[must_use]
    pub fn aggregate_view(&self) -> BTreeMap<String, PolicyReport> {
        let _viewing = self.view_gate.write().unwrap_or_else(PoisonError::into_inner);
        self.store
            .list::<PolicyReport, _>(|_| true)
            .into_iter()
            .map(|report| (report.service_name().to_owned(), report))
            .collect()
    }

    /// Removes the report for `service_name`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyAggregatorError::NotFound`] when no report exists.
    pub fn withdraw(&self, service_name: &str) -> PolicyAggregatorResult<PolicyReport> {
        let service = service_name.trim();
        let removed = {
            let _writing = self.view_gate.read().unwrap_or_else(PoisonError::into_inner);
            self.store.remove::<PolicyReport>(service, None)?
        }
        .ok_or_else(|| PolicyAggregatorError::NotFound(service.to_owned()))?;
        info!(service, "policy report withdrawn");
        Ok(removed)
    }

    /// Returns the number of services with a report.
    #[must_use]
    pub fn report_count(&self) -> usize {
        self.store.count(RecordKind::Policy)
    }
}
