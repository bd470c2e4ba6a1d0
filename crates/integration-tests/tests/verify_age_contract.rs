//! Request contract of `/verify-age` that holds regardless of the provider.
//!
//! Covers preflight, method gating, missing email, the configuration
//! error, mock mode, and the panic boundary. No upstream is contacted.

use std::sync::Arc;

use age_gate_api::verifier::Verification;
use age_gate_integration_tests::{
    FixedVerifier, PanickingVerifier, app, app_with_verifier, assert_cors, post_verify, send,
};
use axum::http::{Method, StatusCode};
use serde_json::json;

// =============================================================================
// Preflight
// =============================================================================

#[tokio::test]
async fn options_returns_204_with_cors_and_empty_body() {
    let response = send(app(&[]), Method::OPTIONS, "/verify-age", None).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_cors(&response, "*");
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn options_uses_configured_origin() {
    let app = app(&[("VERIFY_ALLOWED_ORIGIN", "https://shop.example.com")]);
    let response = send(app, Method::OPTIONS, "/verify-age", None).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_cors(&response, "https://shop.example.com");
}

#[tokio::test]
async fn options_never_reaches_the_verifier() {
    let app = app_with_verifier(Arc::new(PanickingVerifier));
    let response = send(app, Method::OPTIONS, "/verify-age", None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Method gating
// =============================================================================

#[tokio::test]
async fn other_methods_return_405_json() {
    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let response = send(app(&[]), method.clone(), "/verify-age", None).await;

        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_cors(&response, "*");
        assert_eq!(
            response.json(),
            json!({ "verified": false, "reason": "Method not allowed" })
        );
    }
}

#[tokio::test]
async fn serverless_path_behaves_the_same() {
    let response = send(app(&[]), Method::GET, "/api/verify-age", None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);

    let response = send(app(&[]), Method::OPTIONS, "/api/verify-age", None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Input validation
// =============================================================================

#[tokio::test]
async fn missing_email_returns_400() {
    for body in [r"{}", r#"{"email":""}"#, r#"{"email":"   "}"#, r#"{"email":null}"#] {
        let response = post_verify(app(&[]), body).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_cors(&response, "*");
        assert_eq!(
            response.json(),
            json!({ "verified": false, "reason": "Email required" })
        );
    }
}

#[tokio::test]
async fn unreadable_body_is_treated_as_empty() {
    for body in ["", "not json", "[\"a@b.co\"]"] {
        let response = post_verify(app(&[]), body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body:?}");
        assert_eq!(response.json()["reason"], json!("Email required"));
    }
}

// =============================================================================
// Configuration errors
// =============================================================================

#[tokio::test]
async fn missing_provider_config_returns_500() {
    let response = post_verify(app(&[]), r#"{"email":"adult@example.com"}"#).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response, "*");
    assert_eq!(
        response.json(),
        json!({ "verified": false, "reason": "Server configuration error" })
    );
}

#[tokio::test]
async fn missing_provider_config_returns_500_for_any_email() {
    for body in [r#"{"email":"not-an-address"}"#, r#"{"email":"jo"}"#, r#"{"email":"a@b@c"}"#] {
        let response = post_verify(app(&[]), body).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "body: {body}");
        assert_eq!(
            response.json(),
            json!({ "verified": false, "reason": "Server configuration error" })
        );
    }
}

#[tokio::test]
async fn missing_provider_key_alone_returns_500() {
    let app = app(&[("AGE_VERIFY_API_URL", "https://verify.example.com/v1")]);
    let response = post_verify(app, r#"{"email":"adult@example.com"}"#).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Mock mode
// =============================================================================

#[tokio::test]
async fn mock_mode_returns_fixed_response() {
    let app = app(&[("VERIFY_MODE", "mock")]);
    let response = post_verify(app, r#"{"email":"kid@example.com"}"#).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_cors(&response, "*");
    assert_eq!(
        response.json(),
        json!({ "verified": false, "debug": "mock-response", "email": "kid@example.com" })
    );
}

#[tokio::test]
async fn mock_mode_accepts_any_non_blank_email() {
    let app = app(&[("VERIFY_MODE", "mock")]);
    let response = post_verify(app, r#"{"email":"jo"}"#).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "verified": false, "debug": "mock-response", "email": "jo" })
    );
}

#[tokio::test]
async fn mock_mode_echoes_email_as_submitted() {
    let app = app(&[("VERIFY_MODE", "mock")]);
    let response = post_verify(app, r#"{"email":" Kid@Example.com "}"#).await;

    assert_eq!(response.json()["email"], json!(" Kid@Example.com "));
}

#[tokio::test]
async fn mock_mode_still_requires_email() {
    let app = app(&[("VERIFY_MODE", "mock")]);
    let response = post_verify(app, r"{}").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Injected verifiers
// =============================================================================

#[tokio::test]
async fn injected_verifier_decides_result() {
    let app = app_with_verifier(Arc::new(FixedVerifier(Verification::Verified)));
    let response = post_verify(app, r#"{"email":"adult@example.com"}"#).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "verified": true }));
}

#[tokio::test]
async fn panicking_verifier_returns_json_500_with_cors() {
    let app = app_with_verifier(Arc::new(PanickingVerifier));
    let response = post_verify(app, r#"{"email":"adult@example.com"}"#).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response, "*");
    assert_eq!(
        response.json(),
        json!({ "verified": false, "reason": "Server error" })
    );
}

// =============================================================================
// Ambient
// =============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let response = send(app(&[]), Method::GET, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"ok");
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let response = send(app(&[]), Method::OPTIONS, "/verify-age", None).await;
    let generated = response.header("x-request-id").unwrap_or_default();
    assert_eq!(generated.len(), 36, "expected a UUID, got {generated:?}");

    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/verify-age")
        .header("x-request-id", "edge-123")
        .body(axum::body::Body::empty())
        .expect("failed to build request");
    let response = tower::ServiceExt::oneshot(app(&[]), request)
        .await
        .expect("failed to make request");
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("edge-123")
    );
}
