//! Caller-facing endpoint configuration.
//!
//! [`ComputeEndpointConfig`] can be embedded in a larger JSON configuration or
//! read from the environment, and resolves to a concrete endpoint through
//! [`construct_compute_endpoint`].

use crate::endpoint::{ApiVersion, construct_compute_endpoint};
use crate::error::{ComputeError, Result};
use serde::{Deserialize, Serialize};

/// Endpoint used when none is configured.
pub const DEFAULT_COMPUTE_ENDPOINT: &str = "https://compute.googleapis.com/compute/v1/";

/// Overrides [`ComputeEndpointConfig::endpoint`] in [`ComputeEndpointConfig::from_env`].
pub const ENDPOINT_ENV: &str = "GCE_COMPUTE_ENDPOINT";

/// Overrides [`ComputeEndpointConfig::api_version`] in [`ComputeEndpointConfig::from_env`].
pub const API_VERSION_ENV: &str = "GCE_COMPUTE_API_VERSION";

/// Which compute endpoint to talk to and at which API version.
///
/// # Example JSON
///
/// ```json
/// {
///   "endpoint": "https://www.googleapis.com/compute/staging_v1/",
///   "api_version": "beta"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeEndpointConfig {
    /// Base endpoint. `None` means [`DEFAULT_COMPUTE_ENDPOINT`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Requested API channel. Defaults to [`ApiVersion::V1`].
    pub api_version: ApiVersion,
}

impl ComputeEndpointConfig {
    /// Read the configuration from [`ENDPOINT_ENV`] and [`API_VERSION_ENV`].
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let endpoint = env_var(ENDPOINT_ENV)?;
        let api_version = match env_var(API_VERSION_ENV)? {
            Some(raw) => raw.parse().map_err(|_| {
                ComputeError::Config(format!(
                    "{} env var holds unknown API version '{}'",
                    API_VERSION_ENV, raw
                ))
            })?,
            None => ApiVersion::default(),
        };
        Ok(Self {
            endpoint,
            api_version,
        })
    }

    /// Parse the configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ComputeError::Config(format!("Invalid endpoint config: {}", e)))
    }

    /// Produce the endpoint for [`api_version`](Self::api_version).
    pub fn resolve(&self) -> Result<String> {
        let base = match &self.endpoint {
            Some(endpoint) => {
                tracing::debug!(endpoint = %endpoint, "Using configured compute endpoint");
                endpoint.as_str()
            }
            None => {
                tracing::debug!(endpoint = DEFAULT_COMPUTE_ENDPOINT, "Using default compute endpoint");
                DEFAULT_COMPUTE_ENDPOINT
            }
        };
        construct_compute_endpoint(base, self.api_version)
    }
}

/// Read `name`, treating unset and blank values alike.
fn env_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ComputeError::Config(format!(
            "{} env var is not valid UTF-8",
            name
        ))),
    }
}
