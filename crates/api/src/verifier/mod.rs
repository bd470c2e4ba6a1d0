//! Age-verification providers.
//!
//! # Architecture
//!
//! The handler depends only on the [`AgeVerifier`] capability. Two
//! implementations exist:
//!
//! - [`HttpVerifier`] - calls the third-party provider over HTTPS
//! - [`MockVerifier`] - never calls out; used for front-end integration work
//!
//! Which one is installed is decided once at startup from
//! [`VerifierMode`](crate::config::VerifierMode).
//!
//! # Example
//!
//! ```rust,ignore
//! use age_gate_api::verifier::{AgeVerifier, Verification};
//!
//! match verifier.verify(&email).await? {
//!     Verification::Verified => tag_customer(&email).await,
//!     Verification::Rejected { reason } => tracing::info!(%reason, "not verified"),
//!     Verification::Stubbed => {}
//! }
//! ```

mod http;
mod mock;

pub use http::HttpVerifier;
pub use mock::MockVerifier;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use age_gate_core::Email;

/// Errors that can occur when calling a verification provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// API key cannot be used as a header value.
    #[error("Invalid API key format: {0}")]
    InvalidApiKey(String),
}

/// Outcome of a single verification call.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    /// Provider asserted the person is age-verified.
    Verified,
    /// Provider answered but did not assert verification.
    ///
    /// `reason` is the provider's raw output: the parsed JSON body, or the
    /// body text when it was not JSON.
    Rejected { reason: Value },
    /// Mock verifier answered without contacting anyone.
    Stubbed,
}

/// A capability that decides whether an email belongs to a verified adult.
#[async_trait]
pub trait AgeVerifier: Send + Sync {
    /// Verify a single email address.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the provider cannot be reached or answers
    /// with a failure status. Callers treat this as "not verified".
    async fn verify(&self, email: &Email) -> Result<Verification, ProviderError>;
}

/// Decides whether a provider response signals success.
///
/// The response is verified when any configured top-level field holds the
/// JSON boolean `true`. Truthy strings and numbers do not count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessPredicate {
    fields: Vec<String>,
}

impl Default for SuccessPredicate {
    fn default() -> Self {
        Self {
            fields: vec!["verified".to_string(), "age_verified".to_string()],
        }
    }
}

impl SuccessPredicate {
    /// Build from a comma-separated field list; falls back to the default
    /// fields when the list is blank.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let fields: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if fields.is_empty() {
            Self::default()
        } else {
            Self { fields }
        }
    }

    /// Configured field names.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether `response` signals success.
    #[must_use]
    pub fn is_verified(&self, response: &Value) -> bool {
        self.fields
            .iter()
            .any(|field| response.get(field).and_then(Value::as_bool) == Some(true))
    }

    /// Classify a parsed provider response.
    #[must_use]
    pub fn classify(&self, response: Value) -> Verification {
        if self.is_verified(&response) {
            Verification::Verified
        } else {
            Verification::Rejected { reason: response }
        }
    }
}
