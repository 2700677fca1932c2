//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `COSMIC_BUCKET_SLUG` - Cosmic bucket slug
//! - `COSMIC_READ_KEY` - Cosmic bucket read key
//!
//! `COSMIC_*` variables are not required when `STOREFRONT_CONTENT_FIXTURE` is set.
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CONTENT_FIXTURE` - Serve content from a local JSON catalog instead of Cosmic
//! - `STOREFRONT_LOG_FORMAT` - `pretty` (default) or `json`
//! - `COSMIC_API_URL` - API base URL (default: <https://api.cosmicjs.com/v3>)
//! - `COSMIC_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `COSMIC_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `CHECKOUT_FLAT_SHIPPING` - Shipping fee below the free-shipping threshold (default: 9.99)
//! - `CHECKOUT_FREE_SHIPPING_OVER` - Free-shipping threshold (default: 100)
//! - `CHECKOUT_TAX_RATE` - Tax rate as a fraction (default: 0.08)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use styleshop_core::PricingPolicy;
use thiserror::Error;

/// Read keys below this many bits of entropy per character are rejected.
const MIN_KEY_ENTROPY: f64 = 3.0;

/// Fragments that mark a copied-in sample value rather than a real key.
const SAMPLE_KEY_MARKERS: &[&str] = &[
    "your-", "your_", "changeme", "placeholder", "example", "sample", "dummy", "xxx", "todo",
    "replace",
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
    /// Where catalog content comes from
    pub content: ContentConfig,
    /// Shipping and tax rules
    pub pricing: PricingPolicy,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog content source.
#[derive(Debug, Clone)]
pub enum ContentConfig {
    /// Live Cosmic bucket.
    Cosmic(CosmicConfig),
    /// Local JSON catalog fixture.
    Fixture(PathBuf),
}

/// Cosmic REST API configuration.
///
/// Implements `Debug` manually to redact the read key.
#[derive(Clone)]
pub struct CosmicConfig {
    /// API base URL (e.g., <https://api.cosmicjs.com/v3>)
    pub api_url: String,
    /// Bucket slug
    pub bucket_slug: String,
    /// Bucket read key (server-side only)
    pub read_key: SecretString,
    /// Catalog cache time-to-live
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for CosmicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicConfig")
            .field("api_url", &self.api_url)
            .field("bucket_slug", &self.bucket_slug)
            .field("read_key", &"[REDACTED]")
            .field("cache_ttl", &self.cache_ttl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
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
    /// Returns `ConfigError` when a required variable is unset, a value does
    /// not parse, or the Cosmic read key looks like a sample value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is fine.
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| invalid("STOREFRONT_BASE_URL", e))?;

        let content = match get_optional_env("STOREFRONT_CONTENT_FIXTURE") {
            Some(path) => ContentConfig::Fixture(PathBuf::from(path)),
            None => ContentConfig::Cosmic(CosmicConfig::from_env()?),
        };

        let pricing = pricing_from_env()?;
        let log_format = get_env_or_default("STOREFRONT_LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| invalid("STOREFRONT_LOG_FORMAT", e))?;

        Ok(Self {
            host,
            port,
            base_url,
            content,
            pricing,
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
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

impl CosmicConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: get_env_or_default("COSMIC_API_URL", "https://api.cosmicjs.com/v3"),
            bucket_slug: get_required_env("COSMIC_BUCKET_SLUG")?,
            read_key: get_validated_secret("COSMIC_READ_KEY")?,
            cache_ttl: Duration::from_secs(parse_env_or_default::<u64>(
                "COSMIC_CACHE_TTL_SECS",
                "300",
            )?),
            timeout: Duration::from_secs(parse_env_or_default::<u64>("COSMIC_TIMEOUT_SECS", "10")?),
        })
    }
}

fn pricing_from_env() -> Result<PricingPolicy, ConfigError> {
    let defaults = PricingPolicy::default();

    let flat_shipping = decimal_env("CHECKOUT_FLAT_SHIPPING", defaults.flat_shipping)?;
    let free_shipping_over =
        decimal_env("CHECKOUT_FREE_SHIPPING_OVER", defaults.free_shipping_over)?;
    let tax_rate = decimal_env("CHECKOUT_TAX_RATE", defaults.tax_rate)?;

    validate_pricing(PricingPolicy {
        flat_shipping,
        free_shipping_over,
        tax_rate,
    })
}

/// Reject pricing rules that would produce negative or absurd totals.
fn validate_pricing(policy: PricingPolicy) -> Result<PricingPolicy, ConfigError> {
    if policy.flat_shipping.is_sign_negative() {
        return Err(invalid("CHECKOUT_FLAT_SHIPPING", "must not be negative"));
    }
    if policy.free_shipping_over.is_sign_negative() {
        return Err(invalid("CHECKOUT_FREE_SHIPPING_OVER", "must not be negative"));
    }
    if policy.tax_rate.is_sign_negative() || policy.tax_rate > Decimal::ONE {
        return Err(invalid("CHECKOUT_TAX_RATE", "must be between 0 and 1"));
    }
    Ok(policy)
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| invalid(key, e))
}

fn decimal_env(key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
    match get_optional_env(key) {
        Some(raw) => Decimal::from_str(raw.trim()).map_err(|e| invalid(key, e)),
        None => Ok(default),
    }
}

/// Bits of information per character, from the character histogram.
fn bits_per_char(value: &str) -> f64 {
    let mut histogram: BTreeMap<char, u32> = BTreeMap::new();
    let mut total = 0_u32;
    for c in value.chars() {
        *histogram.entry(c).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    histogram
        .into_values()
        .map(|n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}

/// Reject sample values and keys too repetitive to be real.
fn check_read_key(key: &str, value: &str) -> Result<(), ConfigError> {
    let lowered = value.to_ascii_lowercase();
    if let Some(marker) = SAMPLE_KEY_MARKERS.iter().find(|m| lowered.contains(*m)) {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!("looks like a sample value (contains '{marker}')"),
        ));
    }

    let bits = bits_per_char(value);
    if bits < MIN_KEY_ENTROPY {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "only {bits:.2} bits/char (minimum {MIN_KEY_ENTROPY:.1}); copy the key from the bucket's API access settings"
            ),
        ));
    }
    Ok(())
}

fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    check_read_key(key, &value)?;
    Ok(SecretString::from(value))
}
