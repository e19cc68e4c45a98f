//! The structured error returned by Google compute APIs.
//!
//! An [`ApiError`] carries the HTTP status code, the top-level message and an
//! ordered list of `(reason, message)` entries. It is a plain
//! [`std::error::Error`] with no source, so intermediate layers can wrap it
//! with `#[source]`, `anyhow::Context` or a boxed error and the classifier in
//! [`crate::classify`] still finds it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `(reason, message)` entry of an [`ApiError`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    /// API-defined reason code, e.g. `"notFound"`.
    #[serde(default)]
    pub reason: String,
    /// Human-readable description of this entry.
    #[serde(default)]
    pub message: String,
}

/// Failure reported by the remote compute API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiError {
    /// HTTP status code of the failed response.
    pub code: u16,
    /// Top-level error message.
    pub message: String,
    /// Reason entries, in the order the API reported them. May be empty.
    pub errors: Vec<ErrorItem>,
    /// Typed `details` objects from the response envelope, kept undecoded.
    pub details: Vec<serde_json::Value>,
    /// Raw response body.
    pub body: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: EnvelopeBody,
}

#[derive(Deserialize)]
struct EnvelopeBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorItem>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

impl ApiError {
    /// Create an error with no reason entries.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Append a reason entry.
    pub fn with_reason(mut self, reason: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.push(ErrorItem {
            reason: reason.into(),
            message: message.into(),
        });
        self
    }

    /// Build an error from a non-success HTTP response.
    ///
    /// The Google JSON envelope (`{"error": {...}}`) is decoded when present.
    /// The status code always comes from `status`, never from the body, and
    /// the raw body is retained either way.
    pub fn from_response(status: u16, body: &str) -> Self {
        let mut err = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self {
                code: status,
                message: envelope.error.message,
                errors: envelope.error.errors,
                details: envelope.error.details,
                body: String::new(),
            },
            Err(_) => Self::new(status, ""),
        };
        err.body = body.to_string();
        err
    }

    /// Iterate over the reason codes in API order.
    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|item| item.reason.as_str())
    }

    /// Returns `true` if any entry carries `reason`. An empty `reason` never
    /// matches.
    pub fn has_reason(&self, reason: &str) -> bool {
        !reason.is_empty() && self.reasons().any(|r| r == reason)
    }

    /// Returns `true` for transient failures: HTTP 429, any 5xx, or a
    /// rate-limit / backend reason.
    pub fn is_retryable(&self) -> bool {
        matches!(self.code, 429 | 500..=599)
            || self.reasons().any(|r| {
                matches!(
                    r,
                    "rateLimitExceeded" | "userRateLimitExceeded" | "backendError"
                )
            })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() && self.message.is_empty() {
            return write!(
                f,
                "googleapi: got HTTP response code {} with body: {}",
                self.code, self.body
            );
        }

        write!(f, "googleapi: Error {}: {}", self.code, self.message)?;
        if !self.details.is_empty() {
            if let Ok(details) = serde_json::to_string_pretty(&self.details) {
                write!(f, "\nDetails:\n{}", details)?;
            }
        }

        match self.errors.as_slice() {
            [] => Ok(()),
            [only] if only.message == self.message => write!(f, ", {}", only.reason),
            items => {
                write!(f, "\nMore details:")?;
                for item in items {
                    write!(f, "\nReason: {}, Message: {}", item.reason, item.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Map an HTTP response to `Ok(())` for 2xx and to an [`ApiError`] otherwise.
pub fn check_response(status: u16, body: &str) -> std::result::Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    Err(ApiError::from_response(status, body))
}
