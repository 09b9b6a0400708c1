//! A shopper's chosen variant values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Why a [`SelectedOptions`] does not fit a product.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("product has no option named {name:?}")]
    UnknownOption { name: String },
    #[error("{value:?} is not an allowed value for option {name:?}")]
    InvalidValue { name: String, value: String },
}

/// Option name -> chosen value, e.g. `{Size: "M", Color: "Black"}`.
///
/// Backed by an ordered map, so two selections are equal exactly when they
/// hold the same pairs regardless of the order they were chosen in, and the
/// serialized form is stable (keys sorted).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedOptions(BTreeMap<String, String>);

impl SelectedOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any earlier choice.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check every chosen pair against the product's declared options.
    ///
    /// Choosing a subset of the declared options is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error for the first name the product does not declare, or
    /// the first value the named option does not allow.
    pub fn validate_for(&self, product: &Product) -> Result<(), OptionError> {
        for (name, value) in self.iter() {
            let option = product
                .option(name)
                .ok_or_else(|| OptionError::UnknownOption {
                    name: name.to_owned(),
                })?;
            if !option.allows(value) {
                return Err(OptionError::InvalidValue {
                    name: name.to_owned(),
                    value: value.to_owned(),
                });
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SelectedOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Renders as `Color: Black, Size: M`.
impl fmt::Display for SelectedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
