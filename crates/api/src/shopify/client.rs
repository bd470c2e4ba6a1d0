//! Shopify Admin REST client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;

use age_gate_core::{Email, TagSet};

use super::ShopifyError;
use super::types::{
    Customer, CustomerResponse, CustomerSearchResponse, CustomerTagsUpdate,
    CustomerTagsUpdateFields,
};
use crate::config::ShopifyAdminConfig;

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Fallback when a 429 arrives without `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Shopify Admin REST API client.
///
/// Cheaply cloneable; the underlying connection pool is shared.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns error if the access token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &ShopifyAdminConfig, timeout: Duration) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();

        let mut token = HeaderValue::from_str(config.access_token.expose_secret())
            .map_err(|e| ShopifyError::InvalidToken(e.to_string()))?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url: config.admin_base_url(),
            }),
        })
    }

    /// Search customers by email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn search_customers_by_email(
        &self,
        email: &Email,
    ) -> Result<Vec<Customer>, ShopifyError> {
        let query = format!("email:{email}");
        let url = format!(
            "{}/customers/search.json?query={}",
            self.inner.base_url,
            urlencoding::encode(&query)
        );

        let response = self.inner.client.get(&url).send().await?;
        let search: CustomerSearchResponse = read_json(response).await?;

        tracing::debug!(count = search.customers.len(), "Customer search finished");
        Ok(search.customers)
    }

    /// Replace a customer's tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, tags), fields(customer_id = id))]
    pub async fn update_customer_tags(
        &self,
        id: u64,
        tags: &TagSet,
    ) -> Result<Customer, ShopifyError> {
        let url = format!("{}/customers/{id}.json", self.inner.base_url);
        let tags = tags.to_string();
        let body = CustomerTagsUpdate {
            customer: CustomerTagsUpdateFields { id, tags: &tags },
        };

        let response = self.inner.client.put(&url).json(&body).send().await?;
        let updated: CustomerResponse = read_json(response).await?;

        Ok(updated.customer)
    }
}

/// Map error statuses and decode a successful JSON body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ShopifyError> {
    let status = response.status();

    // Check for rate limiting
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to >= 0, Shopify sends small values
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map_or(DEFAULT_RETRY_AFTER_SECS, |secs| secs.ceil().max(0.0) as u64);
        return Err(ShopifyError::RateLimited(retry_after));
    }

    // Check for unauthorized
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ShopifyError::Unauthorized(format!(
            "Admin API rejected access token ({status})"
        )));
    }

    let text = response.text().await?;

    if !status.is_success() {
        return Err(ShopifyError::Api {
            status: status.as_u16(),
            message: text,
        });
    }

    Ok(serde_json::from_str(&text)?)
}
