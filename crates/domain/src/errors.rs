//! Error types used throughout the screening client
//!
//! Two layers:
//! - [`Failure`] classifies a single HTTP attempt. It is the `Err` side of
//!   [`RequestOutcome`], which the executor's retry branch matches on.
//! - [`ScreeningError`] is what callers receive from every public operation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::impl_wire_name_conversions;

/// Classification of a failed HTTP attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The server answered 401 or 403
    AuthRejected,
    /// The transport exceeded the configured timeout
    Timeout,
    /// DNS, socket or refused-connection class error
    ConnectionFailed,
    /// Any other non-success HTTP status
    ProtocolError,
    /// A success response whose body is not valid JSON
    ParseFailed,
}

impl_wire_name_conversions!(FailureKind {
    AuthRejected => "auth_rejected",
    Timeout => "timeout",
    ConnectionFailed => "connection_failed",
    ProtocolError => "protocol_error",
    ParseFailed => "parse_failed",
});

/// One classified failure, with whatever the server told us
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {detail}")]
pub struct Failure {
    /// Failure class
    pub kind: FailureKind,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Server error code (the `"error"` member of a JSON error body)
    pub code: Option<String>,
    /// Human-readable detail
    pub detail: String,
}

impl Failure {
    /// Classify a non-success HTTP status
    ///
    /// 401 and 403 become [`FailureKind::AuthRejected`], every other status
    /// [`FailureKind::ProtocolError`].
    pub fn from_status(status: u16, code: Option<String>) -> Self {
        let kind = match status {
            401 | 403 => FailureKind::AuthRejected,
            _ => FailureKind::ProtocolError,
        };
        let detail = match &code {
            Some(code) => format!("status {status}: {code}"),
            None => format!("status {status}"),
        };
        Self { kind, status: Some(status), code, detail }
    }

    /// A transport-level connection failure
    pub fn connection(detail: impl Into<String>) -> Self {
        Self::bare(FailureKind::ConnectionFailed, detail)
    }

    /// A success response that could not be decoded
    pub fn parse(detail: impl Into<String>) -> Self {
        Self::bare(FailureKind::ParseFailed, detail)
    }

    /// A transport timeout
    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::bare(FailureKind::Timeout, detail)
    }

    fn bare(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self { kind, status: None, code: None, detail: detail.into() }
    }

    /// Whether the executor may re-authenticate and retry after this failure
    ///
    /// Every class except [`FailureKind::Timeout`] is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind != FailureKind::Timeout
    }
}

/// Tagged result of one HTTP attempt: a parsed JSON payload or a failure
pub type RequestOutcome = std::result::Result<serde_json::Value, Failure>;

/// Main error type for screening operations
#[derive(Debug, Error)]
pub enum ScreeningError {
    /// Either stage of the OAuth exchange (or the refresh) failed
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Status returned by the auth endpoint, if it answered
        status: Option<u16>,
        /// Error code returned by the auth endpoint, if any
        code: Option<String>,
        /// Human-readable detail
        message: String,
    },

    /// The transport exceeded the configured timeout
    ///
    /// Never retried and never folded into [`ScreeningError::Request`], so
    /// a circuit breaker around the client can key off it.
    #[error("Timed out after {timeout:?} calling {url}")]
    Timeout {
        /// URL of the call that timed out
        url: String,
        /// Configured timeout
        timeout: Duration,
    },

    /// The request failed on both attempts; carries the second failure
    #[error("Request failed: {0}")]
    Request(Failure),

    /// The configuration cannot drive a session
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScreeningError {
    /// Build an authentication error from a failed token exchange
    pub fn authentication(failure: Failure) -> Self {
        Self::Authentication { status: failure.status, code: failure.code, message: failure.detail }
    }

    /// True for [`ScreeningError::Timeout`]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => *status,
            Self::Request(failure) => failure.status,
            Self::Timeout { .. } | Self::Config(_) => None,
        }
    }

    /// Server error code carried by the error, if any
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Authentication { code, .. } => code.as_deref(),
            Self::Request(failure) => failure.code.as_deref(),
            Self::Timeout { .. } | Self::Config(_) => None,
        }
    }
}

/// Result type alias for screening operations
pub type Result<T> = std::result::Result<T, ScreeningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(Failure::from_status(401, None).kind, FailureKind::AuthRejected);
        assert_eq!(Failure::from_status(403, None).kind, FailureKind::AuthRejected);
        assert_eq!(Failure::from_status(400, None).kind, FailureKind::ProtocolError);
        assert_eq!(Failure::from_status(503, None).kind, FailureKind::ProtocolError);
    }

    #[test]
    fn status_failure_detail_includes_code() {
        let failure = Failure::from_status(400, Some("invalid_request".into()));
        assert_eq!(failure.detail, "status 400: invalid_request");
        assert_eq!(failure.to_string(), "protocol_error: status 400: invalid_request");

        let bare = Failure::from_status(500, None);
        assert_eq!(bare.detail, "status 500");
    }

    #[test]
    fn only_timeouts_are_not_retryable() {
        assert!(Failure::from_status(401, None).is_retryable());
        assert!(Failure::from_status(500, None).is_retryable());
        assert!(Failure::connection("refused").is_retryable());
        assert!(Failure::parse("expected value").is_retryable());
        assert!(!Failure::timeout("deadline").is_retryable());
    }

    #[test]
    fn failure_kind_wire_names() {
        assert_eq!(FailureKind::ConnectionFailed.to_string(), "connection_failed");
        assert_eq!("PARSE_FAILED".parse::<FailureKind>().unwrap(), FailureKind::ParseFailed);
        assert_eq!(
            serde_json::to_value(FailureKind::AuthRejected).unwrap(),
            serde_json::json!("auth_rejected")
        );
    }

    #[test]
    fn screening_error_accessors() {
        let auth = ScreeningError::authentication(Failure::from_status(
            401,
            Some("invalid_grant".into()),
        ));
        assert_eq!(auth.status_code(), Some(401));
        assert_eq!(auth.error_code(), Some("invalid_grant"));
        assert!(!auth.is_timeout());
        assert!(auth.to_string().contains("invalid_grant"));

        let timeout = ScreeningError::Timeout {
            url: "https://api.example.com/x".into(),
            timeout: Duration::from_secs(3),
        };
        assert!(timeout.is_timeout());
        assert_eq!(timeout.status_code(), None);

        let request = ScreeningError::Request(Failure::from_status(400, Some("bad".into())));
        assert_eq!(request.error_code(), Some("bad"));
        assert_eq!(request.status_code(), Some(400));
    }
}
