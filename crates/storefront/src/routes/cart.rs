//! Cart route handlers.
//!
//! Every handler locks the cart for exactly one operation and answers with
//! the resulting [`CartSnapshot`], so clients never need a second round trip
//! to redraw the cart.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use webshop_core::{ProductId, SelectedOptions};

use crate::cart::CartSnapshot;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

const fn default_quantity() -> u32 {
    1
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Absent means the product's default selection.
    #[serde(default)]
    pub selected_options: Option<SelectedOptions>,
}

/// Update quantity request. Zero or negative removes the line item.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Absent resolves the way an add without options does.
    #[serde(default)]
    pub selected_options: Option<SelectedOptions>,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub selected_options: Option<SelectedOptions>,
}

/// Cart count badge payload.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Current cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartSnapshot>> {
    let snapshot = state.cart()?.snapshot();
    Ok(Json(snapshot))
}

/// Total quantity across line items.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<Json<CartCount>> {
    let count = state.cart()?.cart_item_count();
    Ok(Json(CartCount { count }))
}

/// Add a catalog product to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartSnapshot>> {
    let product = state
        .catalog()
        .find_by_id(&request.product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let options = request
        .selected_options
        .unwrap_or_else(|| product.default_options());

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", request.product_id.as_str())]),
    );

    let mut cart = state.cart()?;
    cart.add_to_cart(product, request.quantity, options)?;
    Ok(Json(cart.snapshot()))
}

/// Set a line item's quantity.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartSnapshot>> {
    let mut cart = state.cart()?;
    let options = state.catalog().selection_for(
        &request.product_id,
        request.selected_options,
        cart.cart().matching(),
    );
    cart.update_quantity(&request.product_id, request.quantity, &options)?;
    Ok(Json(cart.snapshot()))
}

/// Remove a line item.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartSnapshot>> {
    let mut cart = state.cart()?;
    let options = state.catalog().selection_for(
        &request.product_id,
        request.selected_options,
        cart.cart().matching(),
    );
    cart.remove_from_cart(&request.product_id, &options);
    Ok(Json(cart.snapshot()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartSnapshot>> {
    let mut cart = state.cart()?;
    cart.clear_cart();
    Ok(Json(cart.snapshot()))
}
