//! Cart management commands.
//!
//! Each command loads the persisted cart, applies one change (which writes
//! the cart back), and prints the result.
//!
//! # Usage
//!
//! ```bash
//! webshop cart add 1 -o Size=L
//! webshop cart update 1 3 -o Size=L
//! webshop cart remove 1 -o Size=L
//! webshop cart clear
//! ```

use std::fmt::Write as _;

use rust_decimal::Decimal;
use webshop_core::{ProductId, SelectedOptions, format_amount};
use webshop_storefront::cart::{CartSnapshot, CartStore};
use webshop_storefront::catalog::ProductRepository;
use webshop_storefront::checkout::OrderSummary;

use super::{CliError, collect_options};

/// Print the cart with its order summary.
#[allow(clippy::print_stdout)]
pub fn show(cart: &CartStore, shipping_rate: Decimal) {
    let summary = OrderSummary::for_items(cart.items(), shipping_rate);
    print!("{}", render_cart(&cart.snapshot(), &summary));
}

/// Add a catalog product. Without `-o` choices a product with options gets
/// its default selection.
///
/// # Errors
///
/// Returns an error for an unknown product, a zero quantity, or options the
/// product does not offer.
pub fn add(
    cart: &mut CartStore,
    catalog: &dyn ProductRepository,
    id: &str,
    quantity: u32,
    options: Vec<(String, String)>,
) -> Result<(), CliError> {
    let product = catalog
        .find_by_id(&ProductId::new(id))
        .cloned()
        .ok_or_else(|| CliError::ProductNotFound(id.to_string()))?;

    let options = if options.is_empty() {
        product.default_options()
    } else {
        collect_options(options)
    };

    tracing::info!(product_id = id, quantity, options = %options, "Adding to cart");
    cart.add_to_cart(product, quantity, options)?;
    Ok(())
}

/// Set a line item's quantity. Without `-o` choices the line item is found
/// the way `add` would have chosen its options. Unknown line items are left
/// alone.
///
/// # Errors
///
/// Returns an error if the new quantity would overflow the cart total.
pub fn update(
    cart: &mut CartStore,
    catalog: &dyn ProductRepository,
    id: &str,
    quantity: i64,
    options: Vec<(String, String)>,
) -> Result<(), CliError> {
    let product_id = ProductId::new(id);
    let options = selection(cart, catalog, &product_id, options);
    cart.update_quantity(&product_id, quantity, &options)?;
    Ok(())
}

/// Remove a line item, resolving missing `-o` choices like [`update`].
/// Unknown line items are left alone.
pub fn remove(
    cart: &mut CartStore,
    catalog: &dyn ProductRepository,
    id: &str,
    options: Vec<(String, String)>,
) {
    let product_id = ProductId::new(id);
    let options = selection(cart, catalog, &product_id, options);
    cart.remove_from_cart(&product_id, &options);
}

fn selection(
    cart: &CartStore,
    catalog: &dyn ProductRepository,
    product_id: &ProductId,
    options: Vec<(String, String)>,
) -> SelectedOptions {
    let chosen = (!options.is_empty()).then(|| collect_options(options));
    catalog.selection_for(product_id, chosen, cart.cart().matching())
}

pub fn clear(cart: &mut CartStore) {
    cart.clear_cart();
}

fn render_cart(snapshot: &CartSnapshot, summary: &OrderSummary) -> String {
    let mut out = String::new();
    if snapshot.items.is_empty() {
        out.push_str("Your cart is empty.\n");
        return out;
    }

    for item in &snapshot.items {
        let _ = write!(out, "{:>3} x {}", item.quantity, item.product.name);
        if !item.selected_options.is_empty() {
            let _ = write!(out, " ({})", item.selected_options);
        }
        let _ = writeln!(out, "  {}", format_amount(item.line_total()));
    }
    let _ = writeln!(out, "Items:    {}", snapshot.item_count);
    let _ = writeln!(out, "Subtotal: {}", format_amount(summary.subtotal));
    let _ = writeln!(out, "Shipping: {}", format_amount(summary.shipping));
    let _ = writeln!(out, "Total:    {}", format_amount(summary.total));
    out
}
