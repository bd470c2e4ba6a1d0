//! Unified error handling with Sentry integration.
//!
//! Every failure on `/verify-age` is answered with the same JSON shape as a
//! successful check (`{ "verified": false, "reason": ... }`), never with a
//! plain-text or HTML error page.

use std::any::Any;

use axum::{
    Json,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use age_gate_core::{EmailError, VerifyResponse, reasons};

/// Application-level error type for the age gate.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body has no usable `email`.
    #[error("Email required")]
    MissingEmail,

    /// Method other than POST or OPTIONS.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Method),

    /// Required server configuration is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingEmail => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingEmail => reasons::EMAIL_REQUIRED,
            Self::MethodNotAllowed(_) => reasons::METHOD_NOT_ALLOWED,
            Self::Configuration(_) => reasons::CONFIGURATION_ERROR,
            Self::Internal(_) => reasons::SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Configuration(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        // Don't expose internal error details to clients
        let body = VerifyResponse::rejected(self.reason());

        (self.status(), Json(body)).into_response()
    }
}

impl From<EmailError> for AppError {
    fn from(_: EmailError) -> Self {
        Self::MissingEmail
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Convert a handler panic into the generic server error response.
///
/// Installed through `CatchPanicLayer::custom`.
#[must_use]
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}
