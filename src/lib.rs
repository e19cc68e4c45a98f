//! Support layer for Google Compute Engine API clients.
//!
//! Two independent, stateless pieces:
//!
//! - **Error classification**: [`is_gce_error`](classify::is_gce_error) reports
//!   whether an error, or anything it wraps, is a structured
//!   [`ApiError`](googleapi::ApiError) carrying a given reason code such as
//!   `"notFound"`. Wrapping depth is unbounded; the search walks the
//!   `source()` chain via [`chain`].
//! - **Endpoint construction**:
//!   [`construct_compute_endpoint`](endpoint::construct_compute_endpoint)
//!   rewrites the version segment of a base endpoint for the requested
//!   variant, keeping the `staging_` qualifier when the base has one.
//!
//! # Quick start
//!
//! ```rust
//! use gce_compute::classify::{is_gce_error, reason};
//! use gce_compute::endpoint::{ApiVersion, construct_compute_endpoint};
//! use gce_compute::googleapi::ApiError;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let err = ApiError::new(404, "Not found").with_reason(reason::NOT_FOUND, "Not found");
//! let wrapped = anyhow::Error::new(err).context("deleting disk");
//! let wrapped: &(dyn std::error::Error + 'static) = wrapped.as_ref();
//! assert!(is_gce_error(Some(wrapped), reason::NOT_FOUND));
//!
//! let endpoint = construct_compute_endpoint(
//!     "https://www.googleapis.com/compute/staging_v1/",
//!     ApiVersion::Alpha,
//! )?;
//! assert_eq!(endpoint, "https://www.googleapis.com/compute/staging_alpha/");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod chain;
pub mod classify;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod googleapi;

pub use classify::{GceErrorExt, is_gce_error};
pub use endpoint::{ApiVersion, construct_compute_endpoint};
pub use error::{ComputeError, Result};
pub use googleapi::{ApiError, ErrorItem};
