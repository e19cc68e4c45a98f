//! Error types for endpoint construction and configuration.
//!
//! Failures reported by the remote compute API are modelled separately by
//! [`ApiError`](crate::googleapi::ApiError); this module only covers errors
//! raised by the crate itself.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ComputeError>;

/// Errors produced while deriving a compute endpoint or reading its
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    /// The base endpoint is not of the form
    /// `<scheme>://<host>/<path-prefix>/<version-segment>/`.
    #[error("Malformed endpoint '{endpoint}': {reason}")]
    MalformedEndpoint {
        /// The endpoint exactly as supplied by the caller.
        endpoint: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The requested API variant cannot be used as a version segment.
    #[error("Invalid API variant: {0}")]
    InvalidVariant(String),

    /// Invalid configuration value (unknown API version, bad env var, etc.).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ComputeError {
    pub(crate) fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::MalformedEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}
