//! Integration test helpers for the age gate.
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`
//! and stand in for the verification provider and Shopify with `wiremock`
//! servers, so no network access or credentials are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p age-gate-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::Arc;

use age_gate_api::verifier::{AgeVerifier, ProviderError, Verification};
use age_gate_api::{AgeGateConfig, AppState, create_router};
use age_gate_core::Email;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

/// Load configuration from a fixed set of variables (environment ignored).
pub fn config(vars: &[(&str, &str)]) -> AgeGateConfig {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    AgeGateConfig::from_lookup(|key| map.get(key).cloned()).expect("test configuration is valid")
}

/// Router built from configuration exactly as `main` builds it.
pub fn app(vars: &[(&str, &str)]) -> Router {
    let state = AppState::new(&config(vars)).expect("failed to build state");
    create_router(state)
}

/// Router whose verifier is `verifier` and with Shopify disabled.
pub fn app_with_verifier(verifier: Arc<dyn AgeVerifier>) -> Router {
    let state =
        AppState::with_parts(&config(&[]), Some(verifier), None).expect("failed to build state");
    create_router(state)
}

/// Configuration pointing the provider at a wiremock server.
pub fn provider_vars(provider_uri: &str) -> Vec<(String, String)> {
    vec![
        (
            "AGE_VERIFY_API_URL".to_string(),
            format!("{provider_uri}/v1/verify"),
        ),
        ("AGE_VERIFY_API_KEY".to_string(), "k_test_9Zr4".to_string()),
        ("UPSTREAM_TIMEOUT_SECS".to_string(), "2".to_string()),
    ]
}

/// Configuration pointing Shopify at `store` (a wiremock URI or dead port).
pub fn shopify_vars(store: &str) -> Vec<(String, String)> {
    vec![
        ("SHOPIFY_STORE".to_string(), store.to_string()),
        (
            "SHOPIFY_ADMIN_ACCESS_TOKEN".to_string(),
            "shpat_test_4c1f".to_string(),
        ),
    ]
}

/// Borrow owned variable pairs as `&str` pairs.
pub fn borrow_vars(vars: &[(String, String)]) -> Vec<(&str, &str)> {
    vars.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// A response with its body fully read.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body should be valid JSON")
    }

    /// A header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Send one request through the router.
pub async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .expect("failed to build request");

    let response = app.oneshot(request).await.expect("failed to make request");

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body")
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// `POST /verify-age` with a raw body.
pub async fn post_verify(app: Router, body: &str) -> TestResponse {
    send(app, Method::POST, "/verify-age", Some(body)).await
}

/// Assert the three CORS headers are present with `origin`.
pub fn assert_cors(response: &TestResponse, origin: &str) {
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some(origin),
        "missing or wrong Access-Control-Allow-Origin"
    );
    assert_eq!(
        response.header("access-control-allow-methods"),
        Some("POST, OPTIONS")
    );
    assert_eq!(
        response.header("access-control-allow-headers"),
        Some("Content-Type")
    );
}

/// Verifier that panics, for exercising the panic boundary.
#[derive(Debug, Clone, Copy)]
pub struct PanickingVerifier;

#[async_trait]
impl AgeVerifier for PanickingVerifier {
    #[allow(clippy::panic)]
    async fn verify(&self, _email: &Email) -> Result<Verification, ProviderError> {
        panic!("verifier exploded");
    }
}

/// Verifier with a fixed answer.
#[derive(Debug, Clone)]
pub struct FixedVerifier(pub Verification);

#[async_trait]
impl AgeVerifier for FixedVerifier {
    async fn verify(&self, _email: &Email) -> Result<Verification, ProviderError> {
        Ok(self.0.clone())
    }
}
