//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `SALEOR_API_URL` - Saleor GraphQL endpoint (e.g., <https://shop.example.com/graphql/>)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SALEOR_CHANNEL` - Sales channel slug (default: default-channel)
//! - `SALEOR_LOCALE` - Default shopper language code (default: `EN_US`)
//! - `SALEOR_APP_TOKEN` - App token sent as a bearer token
//! - `SALEOR_CACHE_TTL_SECS` - Checkout snapshot cache TTL (default: 60)
//! - `CHECKOUT_PAYMENT_GATEWAY` - Payment gateway ID (default: mirumee.payments.dummy)
//! - `CHECKOUT_PAYMENT_TOKEN` - Placeholder payment token (default: 4242 4242 4242 4242)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use duka_core::PaymentGatewayId;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::checkout::session::normalize_locale;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const MIN_APP_TOKEN_CHARS: usize = 20;

/// Gateway used for cash or mobile money on delivery.
pub const DEFAULT_PAYMENT_GATEWAY: &str = "mirumee.payments.dummy";

/// Placeholder token accepted by the dummy gateway.
pub const DEFAULT_PAYMENT_TOKEN: &str = "4242 4242 4242 4242";

/// Fragments of sample `.env` values, matched case-insensitively.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "placeholder",
    "example",
    "saleor-app-token",
    "app_token",
    "dummy",
    "xxxx",
    "todo",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Saleor API configuration
    pub saleor: SaleorConfig,
    /// Checkout payment settings
    pub payment: PaymentConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced in Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Saleor GraphQL API configuration.
///
/// Implements `Debug` manually to redact the app token.
#[derive(Clone)]
pub struct SaleorConfig {
    /// GraphQL endpoint URL
    pub api_url: String,
    /// Sales channel slug
    pub channel: String,
    /// Language code used when the shopper session carries none
    pub default_locale: String,
    /// Optional app token (server-side only)
    pub app_token: Option<SecretString>,
    /// How long fetched checkouts stay cached
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for SaleorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaleorConfig")
            .field("api_url", &self.api_url)
            .field("channel", &self.channel)
            .field("default_locale", &self.default_locale)
            .field("app_token", &self.app_token.as_ref().map(|_| "[REDACTED]"))
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Payment settings applied to every checkout submission.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Gateway the payment is created against
    pub gateway: PaymentGatewayId,
    /// Opaque token passed with the payment
    pub token: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            gateway: PaymentGatewayId::new(DEFAULT_PAYMENT_GATEWAY),
            token: DEFAULT_PAYMENT_TOKEN.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_url("STOREFRONT_BASE_URL")?;

        let saleor = SaleorConfig::from_env()?;
        let payment = PaymentConfig::from_env();

        Ok(Self {
            host,
            port,
            base_url,
            saleor,
            payment,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl SaleorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let app_token = get_optional_env("SALEOR_APP_TOKEN")
            .map(|token| {
                check_app_token(&token, "SALEOR_APP_TOKEN")?;
                Ok(SecretString::from(token))
            })
            .transpose()?;

        let locale = get_env_or_default("SALEOR_LOCALE", "EN_US");
        let default_locale = normalize_locale(&locale).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "SALEOR_LOCALE".to_string(),
                format!("'{locale}' is not a language code"),
            )
        })?;

        Ok(Self {
            api_url: get_required_url("SALEOR_API_URL")?,
            channel: get_env_or_default("SALEOR_CHANNEL", "default-channel"),
            default_locale,
            app_token,
            cache_ttl: Duration::from_secs(parse_env("SALEOR_CACHE_TTL_SECS", "60")?),
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Self {
        Self {
            gateway: PaymentGatewayId::new(get_env_or_default(
                "CHECKOUT_PAYMENT_GATEWAY",
                DEFAULT_PAYMENT_GATEWAY,
            )),
            token: get_env_or_default("CHECKOUT_PAYMENT_TOKEN", DEFAULT_PAYMENT_TOKEN),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable that must be an absolute http(s) URL.
fn get_required_url(key: &str) -> Result<String, ConfigError> {
    let value = get_required_env(key)?;
    validate_url(&value, key)?;
    Ok(value)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default literal.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a value is an absolute http(s) URL.
fn validate_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(())
}

/// Average bits of information per character, from character frequencies.
fn bits_per_char(token: &str) -> f64 {
    let mut counts: HashMap<char, u32> = HashMap::new();
    for c in token.chars() {
        *counts.entry(c).or_default() += 1;
    }
    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    counts
        .into_values()
        .map(|n| {
            let share = f64::from(n) / total;
            -share * share.log2()
        })
        .sum()
}

/// Reject app tokens copied from a sample `.env` or typed by hand.
///
/// Saleor generates app tokens as long random strings.
fn check_app_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| Err(ConfigError::InsecureSecret(var_name.to_string(), reason));

    if token.chars().count() < MIN_APP_TOKEN_CHARS {
        return insecure(format!(
            "shorter than {MIN_APP_TOKEN_CHARS} characters; copy the token from the Saleor dashboard"
        ));
    }

    let lower = token.to_lowercase();
    if let Some(word) = PLACEHOLDER_PATTERNS.iter().find(|w| lower.contains(*w)) {
        return insecure(format!("looks like sample text (contains '{word}')"));
    }

    let bits = bits_per_char(token);
    if bits < MIN_ENTROPY_BITS_PER_CHAR {
        return insecure(format!(
            "too repetitive ({bits:.2} bits/char, need {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Configuration pointing at a local Saleor, for tests across the crate.
    pub(crate) fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            saleor: SaleorConfig {
                api_url: "http://localhost:8000/graphql/".to_string(),
                channel: "default-channel".to_string(),
                default_locale: "EN_US".to_string(),
                app_token: None,
                cache_ttl: Duration::from_secs(60),
            },
            payment: PaymentConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    #[test]
    fn test_bits_per_char() {
        assert!(bits_per_char("").abs() < f64::EPSILON);
        assert!((bits_per_char("abab") - 1.0).abs() < 0.01);
        assert!((bits_per_char("ññ") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_app_token_from_sample_env() {
        let result = check_app_token("your-saleor-app-token-goes-here", "SALEOR_APP_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(var, _)) if var == "SALEOR_APP_TOKEN"));
    }

    #[test]
    fn test_app_token_too_short() {
        let result = check_app_token("kT9q", "SALEOR_APP_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_app_token_repetitive() {
        let result = check_app_token("abababababababababababababab", "SALEOR_APP_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_app_token_generated() {
        assert!(check_app_token("Zr4pQx8LmN2vKc7TgW1bYh5JdF0sEa", "SALEOR_APP_TOKEN").is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://shop.example.com/graphql/", "TEST_URL").is_ok());
        assert!(validate_url("http://localhost:8000/graphql/", "TEST_URL").is_ok());
        assert!(matches!(
            validate_url("ftp://shop.example.com", "TEST_URL"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            validate_url("not a url", "TEST_URL"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_payment_defaults() {
        let payment = PaymentConfig::default();
        assert_eq!(payment.gateway.as_str(), "mirumee.payments.dummy");
        assert_eq!(payment.token, "4242 4242 4242 4242");
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_saleor_config_debug_redacts_token() {
        let mut config = test_config().saleor;
        config.app_token = Some(SecretString::from("super_secret_app_token"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("localhost:8000"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_app_token"));
    }
}
