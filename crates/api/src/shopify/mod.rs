//! Shopify Admin REST API client (customer search and tag updates only).
//!
//! # Security
//!
//! The Admin API access token can read and modify every customer in the
//! store. It is held as a `SecretString`, sent only in the
//! `X-Shopify-Access-Token` header, and never logged.
//!
//! # Endpoints
//!
//! - `GET  /admin/api/{version}/customers/search.json?query=email:{email}`
//! - `PUT  /admin/api/{version}/customers/{id}.json`

mod client;
pub mod types;

pub use client::AdminClient;
pub use types::Customer;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Access token cannot be used as a header value.
    #[error("Invalid access token format: {0}")]
    InvalidToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::Api {
            status: 422,
            message: "tags is invalid".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 422 - tags is invalid");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(2);
        assert_eq!(err.to_string(), "Rate limited, retry after 2 seconds");
    }

    #[test]
    fn test_unauthorized_error() {
        let err = ShopifyError::Unauthorized("Invalid API key or access token".to_string());
        assert_eq!(
            err.to_string(),
            "Unauthorized: Invalid API key or access token"
        );
    }
}
