//! CORS headers middleware.
//!
//! Stamps the three CORS headers on every response the router produces:
//! success, rejection, preflight, and the JSON 500 built from a panic.
//! Preflight requests themselves are answered by the route (`204`, empty
//! body); this layer only decorates.

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Methods a cross-origin caller may use.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Request headers a cross-origin caller may send.
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Add CORS headers to all responses.
///
/// Headers applied:
/// - `Access-Control-Allow-Origin: <VERIFY_ALLOWED_ORIGIN, default *>`
/// - `Access-Control-Allow-Methods: POST, OPTIONS`
/// - `Access-Control-Allow-Headers: Content-Type`
pub async fn cors_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, state.allow_origin().clone());
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );

    response
}
