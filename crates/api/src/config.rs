//! Age gate configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Verification provider (required in `live` mode)
//! - `AGE_VERIFY_API_URL` - Provider endpoint receiving `POST { email }`
//! - `AGE_VERIFY_API_KEY` - Provider bearer token
//!
//! When either is missing the service still starts, but every POST carrying
//! an email is answered with a configuration error.
//!
//! ## Optional
//! - `AGE_GATE_HOST` - Bind address (default: 127.0.0.1)
//! - `AGE_GATE_PORT` - Listen port (default: 3000)
//! - `VERIFY_ALLOWED_ORIGIN` - CORS allowed origin (default: `*`)
//! - `VERIFY_MODE` - `live` or `mock` (default: live)
//! - `AGE_VERIFY_SUCCESS_FIELDS` - Comma-separated provider fields that mark
//!   success (default: `verified,age_verified`)
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ADMIN_ACCESS_TOKEN` - Admin API access token
//! - `SHOPIFY_API_VERSION` - Admin REST API version (default: 2024-10)
//! - `SHOPIFY_VERIFIED_TAG` - Tag added to verified customers (default: age-verified)
//! - `UPSTREAM_TIMEOUT_SECS` - Timeout for outbound HTTP calls (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::verifier::SuccessPredicate;

const DEFAULT_ALLOWED_ORIGIN: &str = "*";
const DEFAULT_API_VERSION: &str = "2024-10";
const DEFAULT_VERIFIED_TAG: &str = "age-verified";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "placeholder",
    "replace-me",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which verifier answers `/verify-age`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifierMode {
    /// Call the configured provider.
    #[default]
    Live,
    /// Never call out; always answer with the fixed mock response.
    Mock,
}

impl FromStr for VerifierMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" | "production" => Ok(Self::Live),
            "mock" | "debug" => Ok(Self::Mock),
            other => Err(format!("expected 'live' or 'mock', got '{other}'")),
        }
    }
}

/// Age gate application configuration.
#[derive(Debug, Clone)]
pub struct AgeGateConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Value of `Access-Control-Allow-Origin`
    pub allowed_origin: String,
    /// Live provider or mock
    pub mode: VerifierMode,
    /// Verification provider, if both URL and key are set
    pub provider: Option<ProviderConfig>,
    /// Shopify Admin API, if both store and token are set
    pub shopify: Option<ShopifyAdminConfig>,
    /// Timeout applied to every outbound HTTP call
    pub upstream_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Age-verification provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Endpoint receiving `POST { "email": ... }`
    pub url: Url,
    /// Bearer token sent in `Authorization`
    pub api_key: SecretString,
    /// Fields of the provider response that signal success
    pub success: SuccessPredicate,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("success", &self.success)
            .finish()
    }
}

/// Shopify Admin REST API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyAdminConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com), or a full base
    /// URL such as `http://127.0.0.1:8080` for local testing
    pub store: String,
    /// Admin API access token
    pub access_token: SecretString,
    /// Admin API version (e.g., 2024-10)
    pub api_version: String,
    /// Tag added to verified customers
    pub verified_tag: String,
}

impl std::fmt::Debug for ShopifyAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdminConfig")
            .field("store", &self.store)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("verified_tag", &self.verified_tag)
            .finish()
    }
}

impl ShopifyAdminConfig {
    /// Base URL of the Admin REST API, without trailing slash.
    #[must_use]
    pub fn admin_base_url(&self) -> String {
        let store = self.store.trim().trim_end_matches('/');
        let origin = if store.starts_with("http://") || store.starts_with("https://") {
            store.to_string()
        } else {
            format!("https://{store}")
        };
        format!("{origin}/admin/api/{}", self.api_version)
    }
}

impl AgeGateConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed, or if a
    /// secret looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// See [`AgeGateConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env
            .or_default("AGE_GATE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("AGE_GATE_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("AGE_GATE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("AGE_GATE_PORT".to_string(), e.to_string()))?;
        let allowed_origin = env.or_default("VERIFY_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN);
        let mode = env
            .or_default("VERIFY_MODE", "live")
            .parse::<VerifierMode>()
            .map_err(|e| ConfigError::InvalidEnvVar("VERIFY_MODE".to_string(), e))?;
        let upstream_timeout = parse_timeout(&env)?;

        Ok(Self {
            host,
            port,
            allowed_origin,
            mode,
            provider: ProviderConfig::from_env(&env)?,
            shopify: ShopifyAdminConfig::from_env(&env)?,
            upstream_timeout,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ProviderConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (Some(url), Some(api_key)) = (
            env.optional("AGE_VERIFY_API_URL"),
            env.optional("AGE_VERIFY_API_KEY"),
        ) else {
            return Ok(None);
        };

        let url = Url::parse(&url).map_err(|e| {
            ConfigError::InvalidEnvVar("AGE_VERIFY_API_URL".to_string(), e.to_string())
        })?;
        let api_key = validated_secret(api_key, "AGE_VERIFY_API_KEY")?;
        let success = env
            .optional("AGE_VERIFY_SUCCESS_FIELDS")
            .map_or_else(SuccessPredicate::default, |raw| SuccessPredicate::parse(&raw));

        Ok(Some(Self {
            url,
            api_key,
            success,
        }))
    }
}

impl ShopifyAdminConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (Some(store), Some(access_token)) = (
            env.optional("SHOPIFY_STORE"),
            env.optional("SHOPIFY_ADMIN_ACCESS_TOKEN"),
        ) else {
            return Ok(None);
        };

        Ok(Some(Self {
            store,
            access_token: validated_secret(access_token, "SHOPIFY_ADMIN_ACCESS_TOKEN")?,
            api_version: env.or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            verified_tag: env.or_default("SHOPIFY_VERIFIED_TAG", DEFAULT_VERIFIED_TAG),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup that treats blank values as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn parse_timeout<F>(env: &Env<F>) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let key = "UPSTREAM_TIMEOUT_SECS";
    let secs = env
        .optional(key)
        .map_or(Ok(DEFAULT_UPSTREAM_TIMEOUT_SECS), |raw| raw.parse::<u64>())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }

    Ok(Duration::from_secs(secs))
}

/// Reject secrets that are obviously copied from a template.
fn validated_secret(value: String, var_name: &str) -> Result<SecretString, ConfigError> {
    let lower = value.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(SecretString::from(value))
}
