//! Request and response bodies for `/verify-age`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reason strings returned to callers.
///
/// Front-end code matches on these, so they are part of the public contract.
pub mod reasons {
    /// Request used a method other than POST or OPTIONS.
    pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
    /// Body had no usable `email` field.
    pub const EMAIL_REQUIRED: &str = "Email required";
    /// Verification provider credentials are not configured.
    pub const CONFIGURATION_ERROR: &str = "Server configuration error";
    /// Catch-all for unexpected failures.
    pub const SERVER_ERROR: &str = "Server error";
    /// Marker placed in `debug` by the mock verifier.
    pub const MOCK_RESPONSE: &str = "mock-response";
}

/// Inbound body for `POST /verify-age`.
///
/// Parsing never fails: an unreadable body, a non-object body, or a
/// non-string `email` all produce `email: None`, which the handler reports
/// as "Email required".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VerifyRequest {
    /// Submitted email address, untrimmed.
    #[serde(default)]
    pub email: Option<String>,
}

impl VerifyRequest {
    /// Parse a raw request body, never failing.
    #[must_use]
    pub fn from_slice(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        let email = value
            .get("email")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);

        Self { email }
    }
}

/// Outbound JSON body for every `/verify-age` response except preflight.
///
/// Optional fields are omitted from the JSON when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the provider asserted the person is age-verified.
    pub verified: bool,
    /// Rejection reason string, or the raw provider output when not verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Value>,
    /// Debug marker set by the mock verifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
    /// Echo of the submitted email (mock verifier only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl VerifyResponse {
    /// A positive verification result.
    #[must_use]
    pub const fn verified() -> Self {
        Self {
            verified: true,
            reason: None,
            debug: None,
            email: None,
        }
    }

    /// A negative result carrying the provider's diagnostic output.
    #[must_use]
    pub const fn not_verified(reason: Value) -> Self {
        Self {
            verified: false,
            reason: Some(reason),
            debug: None,
            email: None,
        }
    }

    /// A rejection before or around verification (bad input, bad config).
    #[must_use]
    pub fn rejected(reason: &str) -> Self {
        Self::not_verified(Value::String(reason.to_owned()))
    }

    /// The fixed answer of the mock verifier.
    #[must_use]
    pub fn mock(email: &str) -> Self {
        Self {
            verified: false,
            reason: None,
            debug: Some(reasons::MOCK_RESPONSE.to_owned()),
            email: Some(email.to_owned()),
        }
    }
}
