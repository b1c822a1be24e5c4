//! Runtime configuration read from `STOREFRONT_*` environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `STOREFRONT_BACKEND_URL` | `https://api.crisper.food` |
//! | `STOREFRONT_TAX_RATE` | `0.0` (tax disabled) |
//! | `STOREFRONT_REQUEST_TIMEOUT_SECS` | `30` |
//! | `STOREFRONT_CART_BUFFER` | `32` |
//! | `STOREFRONT_CURRENCY` | `YER` |

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const BACKEND_URL: &str = "STOREFRONT_BACKEND_URL";
pub const TAX_RATE: &str = "STOREFRONT_TAX_RATE";
pub const REQUEST_TIMEOUT_SECS: &str = "STOREFRONT_REQUEST_TIMEOUT_SECS";
pub const CART_BUFFER: &str = "STOREFRONT_CART_BUFFER";
pub const CURRENCY: &str = "STOREFRONT_CURRENCY";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Base URL of the ordering backend, without a trailing slash.
    pub backend_url: String,
    /// Fraction of the subtotal charged as tax; `0.0` disables tax.
    pub tax_rate: f64,
    pub request_timeout: Duration,
    /// Mailbox size of the cart actor.
    pub cart_buffer: usize,
    /// Currency code shown next to prices.
    pub currency: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            backend_url: "https://api.crisper.food".to_string(),
            tax_rate: 0.0,
            request_timeout: Duration::from_secs(30),
            cart_buffer: 32,
            currency: "YER".to_string(),
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend_url: String = load(&lookup, BACKEND_URL, defaults.backend_url)?;
        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(invalid(BACKEND_URL, &backend_url, "expected an http(s) URL"));
        }

        let tax_rate: f64 = load(&lookup, TAX_RATE, defaults.tax_rate)?;
        if !(0.0..=1.0).contains(&tax_rate) {
            return Err(invalid(TAX_RATE, &tax_rate, "expected a fraction between 0 and 1"));
        }

        let timeout_secs: u64 = load(&lookup, REQUEST_TIMEOUT_SECS, defaults.request_timeout.as_secs())?;
        if timeout_secs == 0 {
            return Err(invalid(REQUEST_TIMEOUT_SECS, &timeout_secs, "must be positive"));
        }

        let cart_buffer: usize = load(&lookup, CART_BUFFER, defaults.cart_buffer)?;
        if cart_buffer == 0 {
            return Err(invalid(CART_BUFFER, &cart_buffer, "must be positive"));
        }

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            tax_rate,
            request_timeout: Duration::from_secs(timeout_secs),
            cart_buffer,
            currency: load(&lookup, CURRENCY, defaults.currency)?,
        })
    }
}

fn load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn invalid(key: &'static str, value: &impl Display, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            (BACKEND_URL, "http://localhost:5086/"),
            (TAX_RATE, "0.1"),
            (REQUEST_TIMEOUT_SECS, "5"),
            (CART_BUFFER, "4"),
            (CURRENCY, "SAR"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url, "http://localhost:5086");
        assert_eq!(config.tax_rate, 0.1);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.cart_buffer, 4);
        assert_eq!(config.currency, "SAR");
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = StorefrontConfig::from_lookup(lookup(&[(TAX_RATE, "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: TAX_RATE, .. }));

        let err = StorefrontConfig::from_lookup(lookup(&[(TAX_RATE, "1.5")])).unwrap_err();
        assert!(err.to_string().contains("between 0 and 1"));

        let err = StorefrontConfig::from_lookup(lookup(&[(CART_BUFFER, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: CART_BUFFER, .. }));

        let err = StorefrontConfig::from_lookup(lookup(&[(BACKEND_URL, "ftp://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: BACKEND_URL, .. }));
    }
}
