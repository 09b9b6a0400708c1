//! CLI command implementations.

pub mod cart;
pub mod catalog;

use thiserror::Error;
use webshop_core::{CartError, SelectedOptions};
use webshop_storefront::config::ConfigError;
use webshop_storefront::storage::StorageError;

/// Errors that can stop a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The data directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart rejected the change.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// No product with this ID.
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// Parse a `NAME=VALUE` option choice.
///
/// # Errors
///
/// Returns a message if there is no `=` or either side is blank.
pub fn parse_option(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(format!("expected NAME=VALUE, got {raw:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}

pub(crate) fn collect_options(options: Vec<(String, String)>) -> SelectedOptions {
    options.into_iter().collect()
}
