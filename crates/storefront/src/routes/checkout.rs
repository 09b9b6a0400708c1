//! Checkout route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use webshop_core::Order;

use crate::checkout::{CheckoutRequest, OrderSummary, place_order};
use crate::error::Result;
use crate::state::AppState;

/// Totals for the checkout page.
#[instrument(skip(state))]
pub async fn summary(State(state): State<AppState>) -> Result<Json<OrderSummary>> {
    let shipping_rate = state.config().shipping_rate;
    let summary = OrderSummary::for_items(state.cart()?.items(), shipping_rate);
    Ok(Json(summary))
}

/// Place an order from the current cart.
#[instrument(skip(state, request))]
pub async fn place(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let shipping_rate = state.config().shipping_rate;
    let mut cart = state.cart()?;
    let order = place_order(&mut cart, request, shipping_rate)?;
    Ok((StatusCode::CREATED, Json(order)))
}
