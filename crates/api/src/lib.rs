//! Age Gate API library.
//!
//! This crate provides the `/verify-age` service as a library, allowing the
//! router to be driven directly in tests and embedded elsewhere.
//!
//! # Request flow
//!
//! ```text
//! CORS + method gate -> parse body -> provider.verify(email)
//!     -> verified?     tag Shopify customer (best effort) -> 200 { verified: true }
//!     -> not verified? 200 { verified: false, reason }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
pub mod verifier;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use config::AgeGateConfig;
pub use state::AppState;

/// Build the full application router with its middleware stack.
///
/// Sentry layers are not included; `main` adds them around this router.
pub fn create_router(state: AppState) -> Router {
    routes::routes()
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::cors_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
