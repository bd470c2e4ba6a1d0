//! HTTP client for the third-party age-verification provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use age_gate_core::Email;

use super::{AgeVerifier, ProviderError, SuccessPredicate, Verification};
use crate::config::ProviderConfig;

/// Verifier backed by the provider's HTTP API.
///
/// Sends `POST <url>` with `Authorization: Bearer <key>` and body
/// `{ "email": ... }`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    client: reqwest::Client,
    url: Url,
    success: SuccessPredicate,
}

impl HttpVerifier {
    /// Create a new provider client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .map_err(|e| ProviderError::InvalidApiKey(e.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            success: config.success.clone(),
        })
    }
}

#[async_trait]
impl AgeVerifier for HttpVerifier {
    #[instrument(skip(self), fields(email = %email, provider = %self.url))]
    async fn verify(&self, email: &Email) -> Result<Verification, ProviderError> {
        let body = serde_json::json!({ "email": email.as_str() });

        let response = self.client.post(self.url.clone()).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        // A body that is not JSON is an absent result, reported verbatim.
        let verification = match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => self.success.classify(parsed),
            Err(e) => {
                tracing::warn!(error = %e, "Provider response was not JSON");
                Verification::Rejected {
                    reason: Value::String(text),
                }
            }
        };

        tracing::info!(
            verified = matches!(verification, Verification::Verified),
            "Provider answered"
        );
        Ok(verification)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn verifier(server: &MockServer, timeout: Duration) -> HttpVerifier {
        let config = ProviderConfig {
            url: Url::parse(&format!("{}/v1/check", server.uri())).unwrap(),
            api_key: SecretString::from("k_live_7Qm2"),
            success: SuccessPredicate::default(),
        };
        HttpVerifier::new(&config, timeout).unwrap()
    }

    fn email() -> Email {
        Email::parse("adult@example.com").unwrap()
    }

    #[tokio::test]
    async fn test_sends_bearer_token_and_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/check"))
            .and(header("authorization", "Bearer k_live_7Qm2"))
            .and(body_json(json!({ "email": "adult@example.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "verified": true })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = verifier(&server, Duration::from_secs(5))
            .verify(&email())
            .await
            .unwrap();
        assert_eq!(outcome, Verification::Verified);
    }

    #[tokio::test]
    async fn test_negative_answer_keeps_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "verified": false, "reason": "under_age" })),
            )
            .mount(&server)
            .await;

        let outcome = verifier(&server, Duration::from_secs(5))
            .verify(&email())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Verification::Rejected {
                reason: json!({ "verified": false, "reason": "under_age" })
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_rejected_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let outcome = verifier(&server, Duration::from_secs(5))
            .verify(&email())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Verification::Rejected {
                reason: json!("<html>oops</html>")
            }
        );
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = verifier(&server, Duration::from_secs(5))
            .verify(&email())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 502, .. }));
        assert_eq!(err.to_string(), "Provider returned 502: bad gateway");
    }

    #[tokio::test]
    async fn test_timeout_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "verified": true }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = verifier(&server, Duration::from_millis(200))
            .verify(&email())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Http(ref e) if e.is_timeout()));
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let config = ProviderConfig {
            url: Url::parse("https://verify.example.com/check").unwrap(),
            api_key: SecretString::from("bad\nkey"),
            success: SuccessPredicate::default(),
        };
        assert!(matches!(
            HttpVerifier::new(&config, Duration::from_secs(1)),
            Err(ProviderError::InvalidApiKey(_))
        ));
    }
}
