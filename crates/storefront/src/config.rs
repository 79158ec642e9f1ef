//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `SHOP_API_BASE_URL` - Backend base address including the version prefix
//!   (default: `http://localhost:8080/api/v1`)
//! - `SHOP_CART_ID` - The single cart this client works on (default: 1)
//! - `SHOP_PAGE` - Product page to request (default: 0)
//! - `SHOP_PAGE_SIZE` - Products per page (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::str::FromStr;

use shop_core::CartId;
use thiserror::Error;
use url::Url;

/// Default backend base address.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";
/// Default cart ID.
pub const DEFAULT_CART_ID: CartId = CartId::new(1);
/// Default product page index.
pub const DEFAULT_PAGE: u32 = 0;
/// Default product page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid API base URL {0:?}: {1}")]
    InvalidBaseUrl(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Backend base address, e.g. `http://localhost:8080/api/v1`
    pub api_base_url: Url,
    /// Cart this client reads and mutates
    pub cart_id: CartId,
    /// Product page index
    pub page: u32,
    /// Products per page
    pub page_size: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ShopConfig {
    /// Build a configuration for a backend address and cart, with default paging.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the address is not an absolute
    /// http(s) URL.
    pub fn new(api_base_url: &str, cart_id: CartId) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            cart_id,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sentry_dsn: None,
            sentry_environment: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(
            &lookup("SHOP_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )?;
        let cart_id = parse_or_default(&lookup, "SHOP_CART_ID", DEFAULT_CART_ID)?;
        let page = parse_or_default(&lookup, "SHOP_PAGE", DEFAULT_PAGE)?;
        let page_size = parse_or_default(&lookup, "SHOP_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOP_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_base_url,
            cart_id,
            page,
            page_size,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and validate a backend base address.
///
/// # Errors
///
/// Returns `ConfigError::InvalidBaseUrl` for unparsable or non-http(s) URLs.
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidBaseUrl(value.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(
            value.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidBaseUrl(
            value.to_string(),
            "must not contain a query or fragment".to_string(),
        ));
    }

    Ok(url)
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ShopConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ShopConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/api/v1");
        assert_eq!(config.cart_id, CartId::new(1));
        assert_eq!(config.page, 0);
        assert_eq!(config.page_size, 10);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SHOP_API_BASE_URL", "https://shop.example.com/api/v2/"),
            ("SHOP_CART_ID", "42"),
            ("SHOP_PAGE", "3"),
            ("SHOP_PAGE_SIZE", "25"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();

        assert_eq!(config.api_base_url.host_str(), Some("shop.example.com"));
        assert_eq!(config.cart_id, CartId::new(42));
        assert_eq!(config.page, 3);
        assert_eq!(config.page_size, 25);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_empty_sentry_dsn_is_ignored() {
        let config = load(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_cart_id() {
        let err = load(&[("SHOP_CART_ID", "first")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOP_CART_ID"));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = load(&[("SHOP_PAGE_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOP_PAGE_SIZE"));
    }

    #[test]
    fn test_base_url_validation() {
        assert!(parse_base_url("http://localhost:8080/api/v1").is_ok());
        assert!(matches!(
            parse_base_url("localhost:8080"),
            Err(ConfigError::InvalidBaseUrl(_, _))
        ));
        assert!(matches!(
            parse_base_url("ftp://example.com/api"),
            Err(ConfigError::InvalidBaseUrl(_, _))
        ));
        assert!(matches!(
            parse_base_url("http://example.com/api?x=1"),
            Err(ConfigError::InvalidBaseUrl(_, _))
        ));
    }

    #[test]
    fn test_new_uses_default_paging() {
        let config = ShopConfig::new("http://127.0.0.1:9000/api/v1", CartId::new(7)).unwrap();
        assert_eq!(config.cart_id, CartId::new(7));
        assert_eq!(config.page, DEFAULT_PAGE);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }
}
