//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /api/categories         - All categories
//! GET  /api/products           - Filtered, sorted, paginated listing
//! GET  /api/products/featured  - Home page products
//! GET  /api/products/{id}      - Product detail with related products
//!
//! # Cart
//! GET  /api/cart               - Cart snapshot
//! GET  /api/cart/count         - Total quantity (header badge)
//! POST /api/cart/add           - Add a product with options
//! POST /api/cart/update        - Set a line item's quantity
//! POST /api/cart/remove        - Remove a line item
//! POST /api/cart/clear         - Empty the cart
//!
//! # Checkout
//! GET  /api/checkout/summary   - Subtotal, shipping and total
//! POST /api/checkout           - Place an order
//! ```

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place))
        .route("/summary", get(checkout::summary))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(products::categories))
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/checkout", checkout_routes())
}
