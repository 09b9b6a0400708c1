//! Order summary and order placement.
//!
//! No payment is taken. Placing an order validates the form, snapshots the
//! cart into an [`Order`], logs it, and clears the cart.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use webshop_core::{
    Address, CartLineItem, CustomerDetails, Email, Order, OrderId, OrderStatus, PaymentMethod,
};

use crate::cart::CartStore;

/// Flat shipping charged on any non-empty cart unless configured otherwise.
pub const DEFAULT_SHIPPING_RATE: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

/// Errors from placing an order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// A form field failed validation.
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Money totals shown beside the cart and on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: u64,
}

impl OrderSummary {
    /// Shipping is charged only when there is something to ship. Amounts
    /// saturate at [`Decimal::MAX`].
    #[must_use]
    pub fn for_items(items: &[CartLineItem], shipping_rate: Decimal) -> Self {
        let subtotal = items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()));
        let shipping = if items.is_empty() {
            Decimal::ZERO
        } else {
            shipping_rate
        };
        Self {
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping),
            item_count: items.iter().map(|i| u64::from(i.quantity)).sum(),
        }
    }
}

/// Customer fields as typed into the checkout form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// The checkout form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    pub customer: CustomerForm,
    pub shipping_address: Address,
    /// Absent means "same as shipping".
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl CheckoutRequest {
    fn validate(self) -> Result<(CustomerDetails, Address, Address, PaymentMethod), CheckoutError> {
        let email = Email::parse(&self.customer.email).map_err(|e| CheckoutError::Invalid {
            field: "email",
            reason: e.to_string(),
        })?;
        if self.shipping_address.street.trim().is_empty() {
            return Err(CheckoutError::Invalid {
                field: "shipping_address.street",
                reason: "street is required".to_string(),
            });
        }

        let customer = CustomerDetails {
            first_name: self.customer.first_name.trim().to_string(),
            last_name: self.customer.last_name.trim().to_string(),
            email,
            phone: self.customer.phone.trim().to_string(),
        };
        let billing = self
            .billing_address
            .unwrap_or_else(|| self.shipping_address.clone());
        Ok((customer, self.shipping_address, billing, self.payment_method))
    }
}

/// Turn the current cart into an order and clear the cart.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if there is nothing in the cart, or
/// [`CheckoutError::Invalid`] if the form fails validation. The cart is
/// untouched on error.
pub fn place_order(
    cart: &mut CartStore,
    request: CheckoutRequest,
    shipping_rate: Decimal,
) -> Result<Order, CheckoutError> {
    if cart.items().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let (customer, shipping_address, billing_address, payment_method) = request.validate()?;

    let summary = OrderSummary::for_items(cart.items(), shipping_rate);
    let order = Order {
        id: OrderId::generate(),
        items: cart.items().to_vec(),
        subtotal: summary.subtotal,
        shipping: summary.shipping,
        total: summary.total,
        customer,
        shipping_address,
        billing_address,
        payment_method,
        placed_at: Utc::now(),
        status: OrderStatus::Pending,
    };

    tracing::info!(
        order_id = %order.id,
        line_items = order.items.len(),
        total = %order.total,
        payment_method = %order.payment_method,
        "Order placed"
    );

    cart.clear_cart();
    Ok(order)
}
