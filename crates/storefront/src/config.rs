//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WHATSAPP_ACCESS_TOKEN` - WhatsApp Business API bearer token (high entropy)
//! - `WHATSAPP_PHONE_NUMBER_ID` - Sending phone number ID from the Meta dashboard
//! - `WHATSAPP_RECIPIENT_PHONE` - Shop phone number that receives notifications
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3001)
//! - `STOREFRONT_BASE_URL` - Public URL, decides secure cookies (default: <http://localhost:3001>)
//! - `ALLOWED_ORIGINS` - Comma-separated CORS origins (default: <http://localhost:5173>)
//! - `RATE_LIMIT_MAX` - Requests allowed per window and client IP (default: 100)
//! - `RATE_LIMIT_WINDOW_SECS` - Rate limit window in seconds (default: 900)
//! - `FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping (default: 50.00)
//! - `FLAT_SHIPPING_FEE` - Shipping below the threshold (default: 5.00)
//! - `WHATSAPP_API_BASE` - Graph API base (default: <https://graph.facebook.com/v18.0>)
//! - `WHATSAPP_TIMEOUT_MS` - Per-message send timeout (default: 30000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::collections::HashMap;
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use icedelights_core::{Price, ShippingPolicy};
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default Graph API base for WhatsApp Cloud messages.
pub const DEFAULT_WHATSAPP_API_BASE: &str = "https://graph.facebook.com/v18.0";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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
    pub base_url: Url,
    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,
    /// Per-IP request limit
    pub rate_limit: RateLimitConfig,
    /// Shipping rule applied to session carts
    pub shipping: ShippingPolicy,
    /// WhatsApp Business API configuration
    pub whatsapp: WhatsAppConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Fixed-window style rate limit expressed as a request budget per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window (also the burst size)
    pub max_requests: u32,
    /// Length of the window
    pub window: Duration,
}

impl RateLimitConfig {
    /// Time to regain one request of budget.
    #[must_use]
    pub fn replenish_interval(&self) -> Duration {
        self.window / self.max_requests.max(1)
    }
}

impl Default for RateLimitConfig {
    /// 100 requests per 15 minutes.
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

/// WhatsApp Business API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct WhatsAppConfig {
    /// Graph API base URL, including the API version
    pub api_base: Url,
    /// Bearer token for the Graph API
    pub access_token: SecretString,
    /// Sending phone number ID
    pub phone_number_id: String,
    /// Phone number that receives notifications
    pub recipient_phone: String,
    /// Upper bound on a single send
    pub timeout: Duration,
}

impl std::fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field("api_base", &self.api_base.as_str())
            .field("access_token", &"[REDACTED]")
            .field("phone_number_id", &self.phone_number_id)
            .field("recipient_phone", &self.recipient_phone)
            .field("timeout", &self.timeout)
            .finish()
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_env(&vars, "STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env(&vars, "STOREFRONT_PORT", "3001")?;
        let base_url = parse_url(&vars, "STOREFRONT_BASE_URL", "http://localhost:3001")?;
        let allowed_origins = parse_origins(
            "ALLOWED_ORIGINS",
            &get_env_or_default(&vars, "ALLOWED_ORIGINS", "http://localhost:5173"),
        )?;

        let sentry_sample_rate = parse_rate(&vars, "SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_rate(&vars, "SENTRY_TRACES_SAMPLE_RATE", "0.1")?;

        Ok(Self {
            host,
            port,
            base_url,
            allowed_origins,
            rate_limit: RateLimitConfig::from_lookup(&vars)?,
            shipping: shipping_from_lookup(&vars)?,
            whatsapp: WhatsAppConfig::from_lookup(&vars)?,
            sentry_dsn: get_optional_env(&vars, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&vars, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies must be marked `Secure`.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

impl RateLimitConfig {
    fn from_lookup(vars: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_requests: u32 = parse_env(vars, "RATE_LIMIT_MAX", "100")?;
        if max_requests == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "RATE_LIMIT_MAX".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let window_secs: u64 = parse_env(vars, "RATE_LIMIT_WINDOW_SECS", "900")?;
        if window_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "RATE_LIMIT_WINDOW_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        })
    }
}

impl WhatsAppConfig {
    fn from_lookup(vars: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_ms: u64 = parse_env(vars, "WHATSAPP_TIMEOUT_MS", "30000")?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "WHATSAPP_TIMEOUT_MS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_base: parse_url(vars, "WHATSAPP_API_BASE", DEFAULT_WHATSAPP_API_BASE)?,
            access_token: get_validated_secret(vars, "WHATSAPP_ACCESS_TOKEN")?,
            phone_number_id: get_required_env(vars, "WHATSAPP_PHONE_NUMBER_ID")?,
            recipient_phone: get_required_env(vars, "WHATSAPP_RECIPIENT_PHONE")?,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn shipping_from_lookup(
    vars: &impl Fn(&str) -> Option<String>,
) -> Result<ShippingPolicy, ConfigError> {
    Ok(ShippingPolicy::new(
        parse_price(vars, "FREE_SHIPPING_THRESHOLD", "50.00")?,
        parse_price(vars, "FLAT_SHIPPING_FEE", "5.00")?,
    ))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    get_optional_env(vars, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    vars(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(vars, key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get_env_or_default(vars, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an absolute http(s) URL.
fn parse_url(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<Url, ConfigError> {
    let url: Url = parse_env(vars, key, default)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a non-negative money amount such as `50.00`.
fn parse_price(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<Price, ConfigError> {
    let amount: Decimal = parse_env(vars, key, default)?;
    Price::new(amount).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a Sentry sample rate in `0.0..=1.0`.
fn parse_rate(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(vars, key, default)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Split a comma-separated origin list, checking each entry is an origin URL.
fn parse_origins(key: &str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut origins = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let url = Url::parse(entry)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), format!("{entry}: {e}")))?;
        if url.host_str().is_none() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("{entry}: origin must have a host"),
            ));
        }
        origins.push(entry.trim_end_matches('/').to_string());
    }

    if origins.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "at least one origin is required".to_string(),
        ));
    }
    Ok(origins)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by Meta."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret.
fn get_validated_secret(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<SecretString, ConfigError> {
    let value = get_required_env(vars, key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOKEN: &str = "EAAGm0PX4ZCpsBAKd93ZBqLw7r1fYt2Nk8VcUoJ5hTg6";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("WHATSAPP_ACCESS_TOKEN", TOKEN),
            ("WHATSAPP_PHONE_NUMBER_ID", "106540352242922"),
            ("WHATSAPP_RECIPIENT_PHONE", "15551234567"),
        ]
    }

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut pairs = required();
        pairs.extend_from_slice(extra);
        pairs
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&required())).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(config.shipping, ShippingPolicy::default());
        assert_eq!(
            config.whatsapp.api_base.as_str(),
            "https://graph.facebook.com/v18.0"
        );
        assert_eq!(config.whatsapp.timeout, Duration::from_secs(30));
        assert!(!config.secure_cookies());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_whatsapp_credentials() {
        let err = StorefrontConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEnvVar(ref key) if key == "WHATSAPP_ACCESS_TOKEN")
        );

        let err = StorefrontConfig::from_lookup(lookup(&[
            ("WHATSAPP_ACCESS_TOKEN", TOKEN),
            ("WHATSAPP_PHONE_NUMBER_ID", "106540352242922"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEnvVar(ref key) if key == "WHATSAPP_RECIPIENT_PHONE")
        );
    }

    #[test]
    fn test_blank_required_value_is_missing() {
        let pairs = vec![
            ("WHATSAPP_ACCESS_TOKEN", TOKEN),
            ("WHATSAPP_PHONE_NUMBER_ID", "   "),
            ("WHATSAPP_RECIPIENT_PHONE", "15551234567"),
        ];
        let err = StorefrontConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEnvVar(ref key) if key == "WHATSAPP_PHONE_NUMBER_ID")
        );
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let pairs = vec![
            ("WHATSAPP_ACCESS_TOKEN", "your-whatsapp-token"),
            ("WHATSAPP_PHONE_NUMBER_ID", "106540352242922"),
            ("WHATSAPP_RECIPIENT_PHONE", "15551234567"),
        ];
        let err = StorefrontConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_overrides() {
        let pairs = with(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_BASE_URL", "https://icedelights.shop"),
            (
                "ALLOWED_ORIGINS",
                "https://icedelights.shop/, https://www.icedelights.shop",
            ),
            ("RATE_LIMIT_MAX", "10"),
            ("RATE_LIMIT_WINDOW_SECS", "60"),
            ("FREE_SHIPPING_THRESHOLD", "30"),
            ("FLAT_SHIPPING_FEE", "2.50"),
            ("WHATSAPP_TIMEOUT_MS", "1500"),
            ("SENTRY_ENVIRONMENT", "production"),
        ]);
        let config = StorefrontConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.secure_cookies());
        assert_eq!(
            config.allowed_origins,
            vec!["https://icedelights.shop", "https://www.icedelights.shop"]
        );
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.replenish_interval(), Duration::from_secs(6));
        assert_eq!(
            config.shipping,
            ShippingPolicy::new(Price::from_cents(3000), Price::from_cents(250))
        );
        assert_eq!(config.whatsapp.timeout, Duration::from_millis(1500));
        assert_eq!(config.sentry_environment.as_deref(), Some("production"));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("STOREFRONT_PORT", "not-a-port"),
            ("RATE_LIMIT_MAX", "0"),
            ("RATE_LIMIT_WINDOW_SECS", "-5"),
            ("FLAT_SHIPPING_FEE", "-1"),
            ("FREE_SHIPPING_THRESHOLD", "fifty"),
            ("WHATSAPP_TIMEOUT_MS", "0"),
            ("WHATSAPP_API_BASE", "ftp://graph.facebook.com"),
            ("ALLOWED_ORIGINS", " , "),
            ("SENTRY_SAMPLE_RATE", "1.5"),
        ] {
            let err = StorefrontConfig::from_lookup(lookup(&with(&[(key, value)]))).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == key),
                "{key}={value} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_replenish_interval() {
        assert_eq!(
            RateLimitConfig::default().replenish_interval(),
            Duration::from_secs(9)
        );
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength() {
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR").is_err());
        assert!(validate_secret_strength(TOKEN, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_whatsapp_config_debug_redacts_token() {
        let config = StorefrontConfig::from_lookup(lookup(&required())).unwrap();
        let debug_output = format!("{:?}", config.whatsapp);

        assert!(debug_output.contains("106540352242922"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(TOKEN));
    }
}
