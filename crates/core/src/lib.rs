//! Webshop Core - Shared types and the cart line-item engine.
//!
//! This crate provides the domain model used across all webshop components:
//! - `storefront` - JSON API server and persistent cart store
//! - `cli` - Command-line catalog browsing and cart management
//!
//! # Architecture
//!
//! The core crate contains only types and pure algorithms - no I/O, no
//! storage, no HTTP. The cart in [`cart`] is an in-memory value; persisting
//! it and notifying observers is the storefront's job.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, products, options and orders
//! - [`cart`] - Line items, identity matching and cart mutations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartLineItem, OptionMatching};
pub use types::*;
