//! Age verification route handlers.
//!
//! `POST /verify-age` forwards the submitted email to the verification
//! provider and, on success, tags the matching Shopify customer. The
//! response only ever distinguishes verified, not verified, bad input, and
//! server error.

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{Method, StatusCode},
    response::IntoResponse,
};
use serde_json::Value;
use tracing::instrument;

use age_gate_core::{Email, VerifyRequest, VerifyResponse};

use crate::error::{AppError, Result};
use crate::services::tag_best_effort;
use crate::state::AppState;
use crate::verifier::Verification;

/// Verify an email address.
///
/// An unreadable or non-JSON body is treated as `{}`. Any non-blank email
/// reaches the provider trimmed but otherwise unchecked. Provider failures
/// degrade to `verified: false` with the failure as `reason`; tagging
/// failures are logged and never change the answer.
#[instrument(skip_all, fields(email = tracing::field::Empty))]
pub async fn verify_age(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<VerifyResponse>> {
    let request = body
        .map(|bytes| VerifyRequest::from_slice(&bytes))
        .unwrap_or_default();

    let submitted = request.email.as_deref().ok_or(AppError::MissingEmail)?;
    let email = Email::parse(submitted)?;
    tracing::Span::current().record("email", email.as_str());

    let verifier = state.verifier().ok_or_else(|| {
        AppError::Configuration("verification provider URL or API key not set".to_string())
    })?;

    let verification = match verifier.verify(&email).await {
        Ok(verification) => verification,
        Err(e) => {
            tracing::warn!(error = %e, "Verification provider call failed");
            Verification::Rejected {
                reason: Value::String(e.to_string()),
            }
        }
    };

    let response = match verification {
        Verification::Verified => {
            tag_best_effort(state.tagger(), &email).await;
            VerifyResponse::verified()
        }
        Verification::Rejected { reason } => VerifyResponse::not_verified(reason),
        Verification::Stubbed => VerifyResponse::mock(submitted),
    };

    tracing::info!(verified = response.verified, "Verification complete");
    Ok(Json(response))
}

/// Answer a CORS preflight.
///
/// The CORS layer adds the headers; the body stays empty.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Reject any method other than POST and OPTIONS.
pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    AppError::MethodNotAllowed(method)
}
