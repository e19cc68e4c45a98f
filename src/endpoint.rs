//! Versioned compute endpoint construction.
//!
//! A compute endpoint has the shape
//! `<scheme>://<host>/<path-prefix>/<version-segment>/`. The version segment
//! is either a bare variant (`v1`, `beta`, `alpha`) or a staging-qualified one
//! (`staging_v1`). Rewriting an endpoint for another variant replaces only
//! that segment and keeps the staging qualifier if the base had one.

use crate::error::{ComputeError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

/// Prefix marking a staging deployment in the version segment.
pub const STAGING_PREFIX: &str = "staging_";

/// The compute API channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// The stable API. This is the default.
    #[default]
    V1,
    Beta,
    Alpha,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::Beta => "beta",
            Self::Alpha => "alpha",
        }
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "v1" => Ok(Self::V1),
            "beta" => Ok(Self::Beta),
            "alpha" => Ok(Self::Alpha),
            other => Err(ComputeError::Config(format!(
                "Unknown API version '{}', expected one of v1, beta, alpha",
                other
            ))),
        }
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A base endpoint split around its version segment.
struct VersionedEndpoint {
    url: Url,
    prefix: Vec<String>,
    version: String,
}

impl VersionedEndpoint {
    fn parse(base: &str) -> Result<Self> {
        if has_dot_segment(base) {
            return Err(ComputeError::malformed(base, "dot segment in path"));
        }
        let url = Url::parse(base).map_err(|e| ComputeError::malformed(base, e.to_string()))?;
        if !url.has_host() {
            return Err(ComputeError::malformed(base, "missing host"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ComputeError::malformed(base, "unexpected query or fragment"));
        }

        let mut segments: Vec<String> = url
            .path_segments()
            .ok_or_else(|| ComputeError::malformed(base, "URL cannot carry a path"))?
            .map(str::to_string)
            .collect();

        // A trailing slash leaves one empty segment at the end.
        if segments.pop().as_deref() != Some("") {
            return Err(ComputeError::malformed(base, "missing trailing slash"));
        }
        if segments.iter().any(String::is_empty) {
            return Err(ComputeError::malformed(base, "empty path segment"));
        }
        let version = segments
            .pop()
            .ok_or_else(|| ComputeError::malformed(base, "missing version segment"))?;
        if segments.is_empty() {
            return Err(ComputeError::malformed(base, "missing path prefix"));
        }

        Ok(Self {
            url,
            prefix: segments,
            version,
        })
    }

    fn is_staging(&self) -> bool {
        self.version
            .strip_prefix(STAGING_PREFIX)
            .is_some_and(|bare| !bare.is_empty())
    }

    fn with_version(mut self, segment: &str) -> Result<String> {
        let path = format!("/{}/{}/", self.prefix.join("/"), segment);
        self.url.set_path(&path);
        if self.url.path() != path {
            return Err(ComputeError::InvalidVariant(format!(
                "'{}' does not survive as a literal path segment",
                segment
            )));
        }
        Ok(self.url.into())
    }
}

/// Returns `true` if the raw path of `base` has a `.` or `..` segment,
/// including percent-encoded forms. Both `/` and `\` count as separators.
fn has_dot_segment(base: &str) -> bool {
    let Some((_, rest)) = base.split_once("://") else {
        return false;
    };
    let Some(path_start) = rest.find(['/', '\\']) else {
        return false;
    };
    let path = &rest[path_start..];
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

/// Variants are restricted to ASCII alphanumerics, `_` and `-`, and may not
/// carry the staging prefix themselves.
fn validate_variant(variant: &str) -> Result<()> {
    if variant.is_empty() {
        return Err(ComputeError::InvalidVariant("variant is empty".to_string()));
    }
    if !variant
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
    {
        return Err(ComputeError::InvalidVariant(format!(
            "'{}' may only contain ASCII letters, digits, '_' and '-'",
            variant
        )));
    }
    if variant.starts_with(STAGING_PREFIX) {
        return Err(ComputeError::InvalidVariant(format!(
            "'{}' already carries the staging prefix; pass the bare version",
            variant
        )));
    }
    Ok(())
}

fn version_segment(staging: bool, variant: &str) -> String {
    if staging {
        format!("{}{}", STAGING_PREFIX, variant)
    } else {
        variant.to_string()
    }
}

/// Rewrite the version segment of `base` to `variant`.
///
/// A staging base (`.../staging_v1/`) yields `staging_<variant>`; any other
/// base yields `<variant>` regardless of its current version. Scheme, host and
/// path prefix are preserved, as is the trailing slash.
///
/// # Errors
///
/// [`ComputeError::MalformedEndpoint`] if `base` does not have the versioned
/// shape or contains dot segments, [`ComputeError::InvalidVariant`] if
/// `variant` is empty, leaves the `[A-Za-z0-9_-]` charset, or already starts
/// with [`STAGING_PREFIX`]. No partially rewritten URL is ever returned.
pub fn construct_compute_endpoint(base: &str, variant: impl AsRef<str>) -> Result<String> {
    let variant = variant.as_ref();
    let result = validate_variant(variant).and_then(|()| {
        let endpoint = VersionedEndpoint::parse(base)?;
        let staging = endpoint.is_staging();
        let segment = version_segment(staging, variant);
        Ok((staging, endpoint.with_version(&segment)?))
    });

    match result {
        Ok((staging, endpoint)) => {
            tracing::debug!(base, variant, staging, endpoint = %endpoint, "Constructed compute endpoint");
            Ok(endpoint)
        }
        Err(e) => {
            tracing::warn!(base, variant, error = %e, "Rejected compute endpoint");
            Err(e)
        }
    }
}

/// Returns `true` if the version segment of `base` carries the staging prefix.
pub fn is_staging_endpoint(base: &str) -> Result<bool> {
    Ok(VersionedEndpoint::parse(base)?.is_staging())
}
