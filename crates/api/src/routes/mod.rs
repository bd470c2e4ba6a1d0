//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET     /health          - Liveness check
//!
//! POST    /verify-age      - Verify an email, tag the Shopify customer
//! OPTIONS /verify-age      - CORS preflight (204)
//! *       /verify-age      - 405 JSON
//!
//! /api/verify-age          - Same handlers, serverless-style path
//! ```

pub mod verify_age;

use axum::{
    Router,
    routing::{MethodRouter, get, post},
};

use crate::state::AppState;

/// Build the application routes (without middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/verify-age", verify_age_methods())
        .route("/api/verify-age", verify_age_methods())
}

fn verify_age_methods() -> MethodRouter<AppState> {
    post(verify_age::verify_age)
        .options(verify_age::preflight)
        .fallback(verify_age::method_not_allowed)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check upstreams.
async fn health() -> &'static str {
    "ok"
}
