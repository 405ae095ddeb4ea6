//! Response envelope shared by every registry and resolver entry point.
//!
//! Callers at service bootstrap receive an envelope rather than an error so
//! that one failing registration can be logged without aborting startup.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Stable machine-readable failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A record was malformed or incomplete.
    ValidationError,
    /// A record is owned by a different identity.
    Conflict,
    /// The requested record does not exist.
    NotFound,
    /// A resolver tier's backing service could not be reached.
    DependencyUnavailable,
    /// Every resolver tier was exhausted.
    CapabilityUnavailable,
    /// The caller aborted the operation.
    Cancelled,
    /// The registry has been closed.
    RegistryClosed,
    /// A resolved capability reported a failure without its own code.
    BusinessError,
}

impl ErrorCode {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Conflict => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::DependencyUnavailable => "DEPENDENCY_UNAVAILABLE",
            Self::CapabilityUnavailable => "CAPABILITY_UNAVAILABLE",
            Self::Cancelled => "CANCELLED",
            Self::RegistryClosed => "REGISTRY_CLOSED",
            Self::BusinessError => "BUSINESS_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform `{success, data?, error?, error_code?, message?}` response.
///
/// `data` and `error` are mutually exclusive and `error_code` is always set
/// on failure; the constructors are the only way to build an envelope in
/// code, so both hold by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ResponseEnvelope {
    /// Creates a successful envelope carrying `data`.
    #[must_use]
    pub const fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
            message: None,
        }
    }

    /// Creates a successful envelope without a payload.
    #[must_use]
    pub const fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            error_code: None,
            message: None,
        }
    }

    /// Creates a failed envelope with one of the crate's error codes.
    #[must_use]
    pub fn failure(code: ErrorCode, error: impl Into<String>) -> Self {
        Self::failure_with_code(code.as_str(), error)
    }

    /// Creates a failed envelope with a caller-supplied error code.
    ///
    /// Used to pass business error codes from a resolved capability through
    /// unchanged.
    #[must_use]
    pub fn failure_with_code(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            error_code: Some(code.into()),
            message: None,
        }
    }

    /// Attaches a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns whether the operation succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Returns the success payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Returns the failure description, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the failure code, if any.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    /// Returns the optional human-readable message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns whether this is a failure carrying `code`.
    #[must_use]
    pub fn has_error_code(&self, code: ErrorCode) -> bool {
        self.error_code() == Some(code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, ResponseEnvelope};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn ok_envelope_has_data_and_no_error() {
        let envelope = ResponseEnvelope::ok(json!({"pages": 3}));

        assert!(envelope.success());
        assert_eq!(envelope.data(), Some(&json!({"pages": 3})));
        assert!(envelope.error().is_none());
        assert!(envelope.error_code().is_none());
    }

    #[rstest]
    fn failure_envelope_always_carries_code() {
        let envelope = ResponseEnvelope::failure(ErrorCode::Conflict, "owned elsewhere")
            .with_message("route already claimed");

        assert!(!envelope.success());
        assert!(envelope.data().is_none());
        assert_eq!(envelope.error_code(), Some("CONFLICT"));
        assert!(envelope.has_error_code(ErrorCode::Conflict));
        assert_eq!(envelope.message(), Some("route already claimed"));
    }

    #[rstest]
    fn serialised_envelope_omits_absent_fields() {
        let value = serde_json::to_value(ResponseEnvelope::ok_empty()).expect("serialise");

        assert_eq!(value, json!({"success": true}));
    }

    #[rstest]
    #[case(ErrorCode::ValidationError, "VALIDATION_ERROR")]
    #[case(ErrorCode::CapabilityUnavailable, "CAPABILITY_UNAVAILABLE")]
    #[case(ErrorCode::Cancelled, "CANCELLED")]
    fn error_code_serialises_to_wire_form(#[case] code: ErrorCode, #[case] expected: &str) {
        assert_eq!(code.as_str(), expected);
        let value = serde_json::to_value(code).expect("serialise");
        assert_eq!(value, json!(expected));
    }
}
