//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `WEBSHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `WEBSHOP_PORT` - Listen port (default: 3000)
//! - `WEBSHOP_DATA_DIR` - Directory for the durable cart store (default: data)
//! - `WEBSHOP_PAGE_SIZE` - Products per listing page (default: 8)
//! - `WEBSHOP_SHIPPING_RATE` - Flat shipping for non-empty carts (default: 5.00)
//! - `WEBSHOP_OPTION_MATCHING` - `exact` or `lenient` (default: exact)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use webshop_core::OptionMatching;

use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::checkout::DEFAULT_SHIPPING_RATE;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the durable cart store
    pub data_dir: PathBuf,
    /// Products per listing page (at least 1)
    pub page_size: usize,
    /// Flat shipping charged on non-empty carts
    pub shipping_rate: Decimal,
    /// How cart lookups without options are matched
    pub option_matching: OptionMatching,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: PathBuf::from("data"),
            page_size: DEFAULT_PAGE_SIZE,
            shipping_rate: DEFAULT_SHIPPING_RATE,
            option_matching: OptionMatching::Exact,
            sentry_dsn: None,
            sentry_environment: None,
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
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = parse_or(&lookup, "WEBSHOP_HOST", defaults.host)?;
        let port = parse_or(&lookup, "WEBSHOP_PORT", defaults.port)?;
        let data_dir = lookup("WEBSHOP_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let page_size: usize = parse_or(&lookup, "WEBSHOP_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "WEBSHOP_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let shipping_rate: Decimal =
            parse_or(&lookup, "WEBSHOP_SHIPPING_RATE", defaults.shipping_rate)?;
        if shipping_rate.is_sign_negative() && !shipping_rate.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "WEBSHOP_SHIPPING_RATE".to_string(),
                "cannot be negative".to_string(),
            ));
        }

        let option_matching = parse_or(
            &lookup,
            "WEBSHOP_OPTION_MATCHING",
            defaults.option_matching,
        )?;

        Ok(Self {
            host,
            port,
            data_dir,
            page_size,
            shipping_rate,
            option_matching,
            sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|s| !s.is_empty()),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if it is set, otherwise use `default`.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
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
