//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::http::header::InvalidHeaderValue;

use crate::config::{AgeGateConfig, VerifierMode};
use crate::services::CustomerTagger;
use crate::shopify::{AdminClient, ShopifyError};
use crate::verifier::{AgeVerifier, HttpVerifier, MockVerifier, ProviderError};

/// Error building application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid VERIFY_ALLOWED_ORIGIN: {0}")]
    InvalidOrigin(#[from] InvalidHeaderValue),
    #[error("verification provider: {0}")]
    Provider(#[from] ProviderError),
    #[error("shopify client: {0}")]
    Shopify(#[from] ShopifyError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Everything in it is
/// immutable after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    allow_origin: HeaderValue,
    verifier: Option<Arc<dyn AgeVerifier>>,
    tagger: Option<CustomerTagger>,
}

impl AppState {
    /// Build state from configuration, constructing the upstream clients.
    ///
    /// In live mode without provider credentials the verifier is left unset;
    /// requests then fail with a configuration error instead of startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the allowed origin is not a valid header value or
    /// an HTTP client cannot be built.
    pub fn new(config: &AgeGateConfig) -> Result<Self, StateError> {
        let verifier: Option<Arc<dyn AgeVerifier>> = match (config.mode, config.provider.as_ref()) {
            (VerifierMode::Mock, _) => Some(Arc::new(MockVerifier)),
            (VerifierMode::Live, Some(provider)) => Some(Arc::new(HttpVerifier::new(
                provider,
                config.upstream_timeout,
            )?)),
            (VerifierMode::Live, None) => {
                tracing::warn!(
                    "AGE_VERIFY_API_URL/AGE_VERIFY_API_KEY not set; verification requests will fail"
                );
                None
            }
        };

        let tagger = config
            .shopify
            .as_ref()
            .map(|shopify| {
                AdminClient::new(shopify, config.upstream_timeout)
                    .map(|client| CustomerTagger::new(client, shopify.verified_tag.clone()))
            })
            .transpose()?;

        Self::with_parts(config, verifier, tagger)
    }

    /// Build state from pre-constructed collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the allowed origin is not a valid header value.
    pub fn with_parts(
        config: &AgeGateConfig,
        verifier: Option<Arc<dyn AgeVerifier>>,
        tagger: Option<CustomerTagger>,
    ) -> Result<Self, StateError> {
        let allow_origin = HeaderValue::from_str(&config.allowed_origin)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                allow_origin,
                verifier,
                tagger,
            }),
        })
    }

    /// `Access-Control-Allow-Origin` value.
    #[must_use]
    pub fn allow_origin(&self) -> &HeaderValue {
        &self.inner.allow_origin
    }

    /// The installed verifier, if configured.
    #[must_use]
    pub fn verifier(&self) -> Option<&dyn AgeVerifier> {
        self.inner.verifier.as_deref()
    }

    /// The customer tagger, if Shopify is configured.
    #[must_use]
    pub fn tagger(&self) -> Option<&CustomerTagger> {
        self.inner.tagger.as_ref()
    }
}
