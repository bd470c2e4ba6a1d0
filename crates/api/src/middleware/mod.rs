//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`, capture errors and transactions)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (read or generate `x-request-id`)
//! 4. CORS headers (stamped on every response, including panics)
//! 5. `CatchPanicLayer` (turn panics into JSON 500s)

pub mod cors;
pub mod request_id;

pub use cors::cors_headers_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
