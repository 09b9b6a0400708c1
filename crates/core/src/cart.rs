//! Cart line items and the in-memory cart.
//!
//! A line item's identity is the pair (product id, selected options). The
//! cart never holds two line items with the same identity: adding an
//! existing identity increases its quantity in place, and a restored cart
//! is settled so duplicates from older data are merged.
//!
//! The cart is a plain value. Persisting it after each mutation and telling
//! observers about changes is the storefront's `CartStore`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{OptionError, Product, ProductId, SelectedOptions};

/// Errors returned by cart mutations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Items are added at least one at a time.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The chosen options do not fit the product.
    #[error("invalid option selection: {0}")]
    InvalidOption(#[from] OptionError),

    /// The cart total would not fit in a decimal amount.
    #[error("cart total is too large")]
    TotalOverflow,
}

/// How a lookup's selected options are compared with a line item's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionMatching {
    /// Options must be equal. No options is its own identity.
    #[default]
    Exact,
    /// A lookup with no options matches the first line item for the
    /// product, whatever options it carries. Compatibility with carts built
    /// by the browser shop.
    Lenient,
}

impl std::fmt::Display for OptionMatching {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

impl std::str::FromStr for OptionMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "lenient" => Ok(Self::Lenient),
            _ => Err(format!("invalid option matching mode: {s}")),
        }
    }
}

/// One product, with chosen options, in some quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Snapshot of the product as of the time it was added.
    pub product: Product,
    pub quantity: u32,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "SelectedOptions::is_empty"
    )]
    pub selected_options: SelectedOptions,
}

impl CartLineItem {
    #[must_use]
    pub const fn new(product: Product, quantity: u32, selected_options: SelectedOptions) -> Self {
        Self {
            product,
            quantity,
            selected_options,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }

    /// Unit price times quantity, or `None` on overflow.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.product.price.checked_times(self.quantity)
    }

    /// Whether this line item answers a lookup for `product_id` with
    /// `options` under the given matching mode.
    #[must_use]
    pub fn matches(
        &self,
        product_id: &ProductId,
        options: &SelectedOptions,
        matching: OptionMatching,
    ) -> bool {
        if self.product.id != *product_id {
            return false;
        }
        match matching {
            OptionMatching::Lenient if options.is_empty() => true,
            _ => self.selected_options == *options,
        }
    }

    fn same_identity(&self, other: &Self) -> bool {
        self.product.id == other.product.id && self.selected_options == other.selected_options
    }
}

/// `selectedOptions: null` loads as no options.
fn null_as_empty<'de, D>(deserializer: D) -> Result<SelectedOptions, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SelectedOptions>::deserialize(deserializer)?.unwrap_or_default())
}

/// An ordered collection of line items.
///
/// New identities append to the end; quantity changes keep position. The
/// total of a cart always fits in a [`Decimal`]: mutations that would
/// overflow it are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
    matching: OptionMatching,
}

impl Cart {
    /// An empty cart using the given matching mode.
    #[must_use]
    pub const fn new(matching: OptionMatching) -> Self {
        Self {
            items: Vec::new(),
            matching,
        }
    }

    /// Rebuild a cart from stored line items.
    ///
    /// Line items with quantity 0 are dropped and line items sharing an
    /// identity are merged into the first one's position.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the settled line items cannot
    /// be totalled.
    pub fn from_items(
        items: Vec<CartLineItem>,
        matching: OptionMatching,
    ) -> Result<Self, CartError> {
        let mut settled: Vec<CartLineItem> = Vec::with_capacity(items.len());
        for item in items.into_iter().filter(|i| i.quantity > 0) {
            match settled.iter_mut().find(|s| s.same_identity(&item)) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => settled.push(item),
            }
        }
        let cart = Self {
            items: settled,
            matching,
        };
        cart.checked_total().ok_or(CartError::TotalOverflow)?;
        Ok(cart)
    }

    #[must_use]
    pub const fn matching(&self) -> OptionMatching {
        self.matching
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The first line item answering the lookup.
    #[must_use]
    pub fn get(&self, product_id: &ProductId, options: &SelectedOptions) -> Option<&CartLineItem> {
        self.items
            .iter()
            .find(|i| i.matches(product_id, options, self.matching))
    }

    /// Add `quantity` of `product` with the chosen options.
    ///
    /// Merges into the matching line item if there is one, otherwise
    /// appends a new line item. Quantities saturate at `u32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity,
    /// [`CartError::InvalidOption`] if the options do not fit the product,
    /// and [`CartError::TotalOverflow`] if the total would overflow. The
    /// cart is unchanged on error.
    pub fn add(
        &mut self,
        product: Product,
        quantity: u32,
        options: SelectedOptions,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        options.validate_for(&product)?;

        let existing = self
            .items
            .iter()
            .enumerate()
            .find(|(_, i)| i.matches(&product.id, &options, self.matching))
            .map(|(index, i)| (index, i.quantity));
        match existing {
            Some((index, current)) => {
                let merged = current.saturating_add(quantity);
                self.total_with(index, merged)
                    .ok_or(CartError::TotalOverflow)?;
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity = merged;
                }
            }
            None => {
                self.checked_total()
                    .zip(product.price.checked_times(quantity))
                    .and_then(|(total, line)| total.checked_add(line))
                    .ok_or(CartError::TotalOverflow)?;
                self.items
                    .push(CartLineItem::new(product, quantity, options));
            }
        }
        Ok(())
    }

    /// Remove every line item answering the lookup.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&mut self, product_id: &ProductId, options: &SelectedOptions) -> bool {
        let before = self.items.len();
        let matching = self.matching;
        self.items
            .retain(|i| !i.matches(product_id, options, matching));
        self.items.len() != before
    }

    /// Set the quantity of the first line item answering the lookup.
    ///
    /// A quantity of 0 removes the line item. Absent line items are left
    /// alone. Returns `true` if the cart changed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the new quantity would
    /// overflow the total. The cart is unchanged on error.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
        options: &SelectedOptions,
    ) -> Result<bool, CartError> {
        let Some(index) = self
            .items
            .iter()
            .position(|i| i.matches(product_id, options, self.matching))
        else {
            return Ok(false);
        };

        if quantity == 0 {
            self.items.remove(index);
            return Ok(true);
        }

        self.total_with(index, quantity)
            .ok_or(CartError::TotalOverflow)?;
        match self.items.get_mut(index) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove everything. Returns `true` if the cart was non-empty.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// Sum of price times quantity over all line items. Not rounded.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()))
    }

    /// [`Cart::total`], or `None` if it does not fit in a [`Decimal`].
    #[must_use]
    pub fn checked_total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| {
                sum.checked_add(item.checked_line_total()?)
            })
    }

    /// The total if the line item at `index` had `quantity` instead.
    fn total_with(&self, index: usize, quantity: u32) -> Option<Decimal> {
        self.items
            .iter()
            .enumerate()
            .try_fold(Decimal::ZERO, |sum, (i, item)| {
                let quantity = if i == index { quantity } else { item.quantity };
                sum.checked_add(item.product.price.checked_times(quantity)?)
            })
    }

    /// Sum of quantities (not the number of line items).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}
