//! Traffic policy values reported for a service.

use super::PolicyDomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Load-balancing, timeout and circuit-breaker hints, plus any other keys
/// the reporting domain sent.
///
/// Values are kept exactly as reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshPolicies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load_balancing: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    circuit_breaker: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl MeshPolicies {
    /// Creates an empty policy set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the load-balancing hint.
    #[must_use]
    pub fn with_load_balancing(mut self, value: impl Into<Value>) -> Self {
        self.load_balancing = Some(value.into());
        self
    }

    /// Sets the timeout hint.
    #[must_use]
    pub fn with_timeout(mut self, value: impl Into<Value>) -> Self {
        self.timeout = Some(value.into());
        self
    }

    /// Sets the circuit-breaker configuration.
    #[must_use]
    pub fn with_circuit_breaker(mut self, value: impl Into<Value>) -> Self {
        self.circuit_breaker = Some(value.into());
        self
    }

    /// Adds an unrecognised policy key.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Splits a raw policy object into known and extra keys.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyDomainError::MalformedPolicies`] when `payload` is not
    /// an object.
    pub fn from_json(payload: Value) -> Result<Self, PolicyDomainError> {
        let Value::Object(entries) = payload else {
            return Err(PolicyDomainError::MalformedPolicies);
        };
        Ok(Self::from_map(entries))
    }

    fn from_map(entries: Map<String, Value>) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |policies, (key, value)| match key.as_str() {
                "load_balancing" => policies.with_load_balancing(value),
                "timeout" => policies.with_timeout(value),
                "circuit_breaker" => policies.with_circuit_breaker(value),
                _ => policies.with_extra(key, value),
            })
    }

    /// Returns the load-balancing hint, if reported.
    #[must_use]
    pub const fn load_balancing(&self) -> Option<&Value> {
        self.load_balancing.as_ref()
    }

    /// Returns the timeout hint, if reported.
    #[must_use]
    pub const fn timeout(&self) -> Option<&Value> {
        self.timeout.as_ref()
    }

    /// Returns the circuit-breaker configuration, if reported.
    #[must_use]
    pub const fn circuit_breaker(&self) -> Option<&Value> {
        self.circuit_breaker.as_ref()
    }

    /// Returns the unrecognised keys.
    #[must_use]
    pub const fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }
}
