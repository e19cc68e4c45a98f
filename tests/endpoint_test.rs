//! Endpoint construction for staging and production bases.

use gce_compute::config::{ComputeEndpointConfig, DEFAULT_COMPUTE_ENDPOINT};
use gce_compute::endpoint::{ApiVersion, construct_compute_endpoint, is_staging_endpoint};
use gce_compute::error::ComputeError;

#[test]
fn valid_staging_alpha() {
    let endpoint =
        construct_compute_endpoint("https://www.googleapis.com/compute/staging_v1/", "alpha")
            .unwrap();
    assert_eq!(endpoint, "https://www.googleapis.com/compute/staging_alpha/");
}

#[test]
fn regular_v1() {
    let endpoint =
        construct_compute_endpoint("https://www.googleapis.com/compute/v1/", "v1").unwrap();
    assert_eq!(endpoint, "https://www.googleapis.com/compute/v1/");
}

#[test]
fn regular_beta() {
    let endpoint =
        construct_compute_endpoint("https://www.googleapis.com/compute/v1/", "beta").unwrap();
    assert_eq!(endpoint, "https://www.googleapis.com/compute/beta/");
}

#[test]
fn base_version_is_irrelevant_for_production() {
    for base in [
        "https://compute.googleapis.com/compute/v1/",
        "https://compute.googleapis.com/compute/alpha/",
        "https://compute.googleapis.com/compute/beta/",
    ] {
        assert_eq!(
            construct_compute_endpoint(base, ApiVersion::Alpha).unwrap(),
            "https://compute.googleapis.com/compute/alpha/"
        );
    }
}

#[test]
fn free_form_variant_tokens_are_accepted() {
    assert_eq!(
        construct_compute_endpoint("https://www.googleapis.com/compute/staging_v1/", "v2internal")
            .unwrap(),
        "https://www.googleapis.com/compute/staging_v2internal/"
    );
}

#[test]
fn staging_detection() {
    assert!(is_staging_endpoint("https://www.googleapis.com/compute/staging_beta/").unwrap());
    assert!(!is_staging_endpoint("https://www.googleapis.com/compute/beta/").unwrap());
    assert!(is_staging_endpoint("https://www.googleapis.com/compute/").is_err());
}

#[test]
fn missing_version_segment_is_malformed() {
    let err = construct_compute_endpoint("https://www.googleapis.com/compute/", "beta").unwrap_err();
    assert!(matches!(err, ComputeError::MalformedEndpoint { .. }));
    assert!(err.to_string().contains("missing path prefix"));
}

#[test]
fn config_resolves_against_staging_base() {
    let config = ComputeEndpointConfig::from_json_str(
        r#"{"endpoint": "https://www.googleapis.com/compute/staging_v1/", "api_version": "beta"}"#,
    )
    .unwrap();
    assert_eq!(
        config.resolve().unwrap(),
        "https://www.googleapis.com/compute/staging_beta/"
    );
}

#[test]
fn config_serializes_version_lowercase() {
    let config = ComputeEndpointConfig {
        endpoint: None,
        api_version: ApiVersion::Beta,
    };
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json, serde_json::json!({ "api_version": "beta" }));
    assert_eq!(
        ComputeEndpointConfig::default().resolve().unwrap(),
        DEFAULT_COMPUTE_ENDPOINT
    );
}
