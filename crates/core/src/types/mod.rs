//! Core types for the webshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod options;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use options::{OptionError, SelectedOptions};
pub use order::{Address, CustomerDetails, Order};
pub use price::{Price, PriceError, format_amount};
pub use product::{Category, Product, ProductOption};
pub use status::*;
