//! Classification of (possibly wrapped) compute API errors.
//!
//! Everything here is total: any error shape, including no error at all,
//! yields an answer rather than a failure. Only the first [`ApiError`] found
//! in a chain is consulted.

use crate::chain::find_source;
use crate::googleapi::ApiError;
use std::error::Error;

/// Reason codes defined by the compute API.
pub mod reason {
    pub const NOT_FOUND: &str = "notFound";
    pub const ALREADY_EXISTS: &str = "alreadyExists";
    pub const INVALID: &str = "invalid";
    pub const CONFLICT: &str = "conflict";
    pub const RESOURCE_IN_USE_BY_ANOTHER_RESOURCE: &str = "resourceInUseByAnotherResource";
    pub const QUOTA_EXCEEDED: &str = "quotaExceeded";
    pub const RATE_LIMIT_EXCEEDED: &str = "rateLimitExceeded";
    pub const USER_RATE_LIMIT_EXCEEDED: &str = "userRateLimitExceeded";
}

fn structured<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a ApiError> {
    let api = find_source::<ApiError>(err)?;
    tracing::trace!(
        code = api.code,
        reasons = api.errors.len(),
        "Found structured API error in chain"
    );
    Some(api)
}

/// Returns `true` if `err`, or any error it wraps, is an [`ApiError`] with an
/// entry whose reason equals `reason`.
///
/// `None` and an empty `reason` both yield `false`.
pub fn is_gce_error(err: Option<&(dyn Error + 'static)>, reason: &str) -> bool {
    if reason.is_empty() {
        return false;
    }
    err.and_then(structured)
        .is_some_and(|api| api.has_reason(reason))
}

/// [`is_gce_error`] for [`reason::NOT_FOUND`].
pub fn is_gce_not_found_error(err: Option<&(dyn Error + 'static)>) -> bool {
    is_gce_error(err, reason::NOT_FOUND)
}

/// [`is_gce_error`] for [`reason::INVALID`].
pub fn is_gce_invalid_error(err: Option<&(dyn Error + 'static)>) -> bool {
    is_gce_error(err, reason::INVALID)
}

/// [`is_gce_error`] for [`reason::ALREADY_EXISTS`].
pub fn is_gce_already_exists_error(err: Option<&(dyn Error + 'static)>) -> bool {
    is_gce_error(err, reason::ALREADY_EXISTS)
}

/// Method-call form of [`is_gce_error`] for the error shapes callers usually
/// hold.
pub trait GceErrorExt {
    /// See [`is_gce_error`](fn@is_gce_error).
    fn is_gce_error(&self, reason: &str) -> bool;

    /// Shorthand for [`reason::NOT_FOUND`].
    fn is_gce_not_found(&self) -> bool {
        self.is_gce_error(reason::NOT_FOUND)
    }

    /// Shorthand for [`reason::ALREADY_EXISTS`].
    fn is_gce_already_exists(&self) -> bool {
        self.is_gce_error(reason::ALREADY_EXISTS)
    }
}

impl GceErrorExt for dyn Error + 'static {
    fn is_gce_error(&self, reason: &str) -> bool {
        is_gce_error(Some(self), reason)
    }
}

impl GceErrorExt for dyn Error + Send + Sync + 'static {
    fn is_gce_error(&self, reason: &str) -> bool {
        is_gce_error(Some(self), reason)
    }
}

impl GceErrorExt for ApiError {
    fn is_gce_error(&self, reason: &str) -> bool {
        self.has_reason(reason)
    }
}

#[cfg(feature = "anyhow")]
impl GceErrorExt for anyhow::Error {
    fn is_gce_error(&self, reason: &str) -> bool {
        let err: &(dyn Error + Send + Sync + 'static) = self.as_ref();
        is_gce_error(Some(err), reason)
    }
}

/// Coarse category of a compute API failure, derived from its reasons.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The resource does not exist (`notFound`).
    NotFound,
    /// The resource is already present (`alreadyExists`).
    AlreadyExists,
    /// The resource is held or modified by another operation.
    Conflict,
    /// The request was rejected as invalid (`invalid`).
    Invalid,
    /// Per-user or per-project request rate exceeded.
    RateLimited,
    /// A resource quota is exhausted (`quotaExceeded`).
    QuotaExceeded,
    /// Catch-all. Since this enum is non-exhaustive, match it with `_`.
    Unknown,
}

impl ErrorClass {
    fn from_reason(r: &str) -> Option<Self> {
        match r {
            reason::NOT_FOUND => Some(Self::NotFound),
            reason::ALREADY_EXISTS => Some(Self::AlreadyExists),
            reason::CONFLICT | reason::RESOURCE_IN_USE_BY_ANOTHER_RESOURCE => Some(Self::Conflict),
            reason::INVALID => Some(Self::Invalid),
            reason::RATE_LIMIT_EXCEEDED | reason::USER_RATE_LIMIT_EXCEEDED => {
                Some(Self::RateLimited)
            }
            reason::QUOTA_EXCEEDED => Some(Self::QuotaExceeded),
            _ => None,
        }
    }
}

/// Classify by the first recognised reason of the first [`ApiError`] in the
/// chain.
pub fn classify(err: &(dyn Error + 'static)) -> ErrorClass {
    structured(err)
        .and_then(|api| api.reasons().find_map(ErrorClass::from_reason))
        .unwrap_or(ErrorClass::Unknown)
}

/// Status-derived code for surfacing a compute failure to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalCode {
    /// HTTP 403.
    PermissionDenied,
    /// HTTP 400.
    InvalidArgument,
    /// HTTP 429.
    ResourceExhausted,
    /// HTTP 404.
    NotFound,
    /// Any other status, or no structured error at all.
    Internal,
}

/// Map the HTTP status of the first [`ApiError`] in the chain. Chains without
/// one, and statuses outside the user-error set, are [`CanonicalCode::Internal`].
pub fn canonical_code(err: &(dyn Error + 'static)) -> CanonicalCode {
    match structured(err).map(|api| api.code) {
        Some(403) => CanonicalCode::PermissionDenied,
        Some(400) => CanonicalCode::InvalidArgument,
        Some(429) => CanonicalCode::ResourceExhausted,
        Some(404) => CanonicalCode::NotFound,
        _ => CanonicalCode::Internal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> ApiError {
        ApiError::new(404, "Not found").with_reason(reason::NOT_FOUND, "Not found")
    }

    #[derive(Debug, thiserror::Error)]
    #[error("encountered not found: {0}")]
    struct Annotated(#[source] ApiError);

    #[test]
    fn empty_reason_never_matches() {
        let err = ApiError::new(400, "bad").with_reason("", "blank");
        assert!(!is_gce_error(Some(&err), ""));
    }

    #[test]
    fn annotated_chain_is_searched() {
        let nested = Annotated(ApiError::new(400, "bad").with_reason(reason::INVALID, "bad"));
        assert!(is_gce_invalid_error(Some(&nested)));
        assert!(!is_gce_not_found_error(Some(&nested)));
        assert!(!is_gce_already_exists_error(Some(&nested)));
    }

    #[test]
    fn ext_trait_on_boxed_error() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(Annotated(not_found()));
        assert!(boxed.is_gce_not_found());
        assert!(!boxed.is_gce_already_exists());
    }

    #[test]
    fn classify_maps_reasons() {
        assert_eq!(classify(&not_found()), ErrorClass::NotFound);
        let in_use = ApiError::new(400, "in use")
            .with_reason("unknownThing", "x")
            .with_reason(reason::RESOURCE_IN_USE_BY_ANOTHER_RESOURCE, "in use");
        assert_eq!(classify(&Annotated(in_use)), ErrorClass::Conflict);
        assert_eq!(classify(&std::fmt::Error), ErrorClass::Unknown);
    }

    #[test]
    fn canonical_code_uses_status() {
        assert_eq!(canonical_code(&not_found()), CanonicalCode::NotFound);
        assert_eq!(
            canonical_code(&ApiError::new(429, "slow")),
            CanonicalCode::ResourceExhausted
        );
        assert_eq!(
            canonical_code(&ApiError::new(503, "down")),
            CanonicalCode::Internal
        );
        assert_eq!(canonical_code(&std::fmt::Error), CanonicalCode::Internal);
    }
}
