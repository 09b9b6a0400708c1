//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;
use webshop_core::{Category, Product, ProductId, SelectedOptions};

use crate::catalog::{ProductPage, ProductQuery};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Products shown on the home page.
pub const FEATURED_LIMIT: usize = 4;

/// "You may also like" products on the detail page.
pub const RELATED_LIMIT: usize = 4;

/// Product detail payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    /// The selection a fresh detail page starts with.
    pub default_options: SelectedOptions,
    pub related: Vec<Product>,
}

/// List all categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().categories().to_vec())
}

/// Filtered, sorted, paginated product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ProductPage> {
    Json(state.catalog().search(&query, state.config().page_size))
}

/// Home page products.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(
        state
            .catalog()
            .featured(FEATURED_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// Product detail with related products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>> {
    let catalog = state.catalog();
    let product = catalog
        .find_by_id(&ProductId::new(id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let related = catalog
        .related(product, RELATED_LIMIT)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ProductDetail {
        default_options: product.default_options(),
        product: product.clone(),
        related,
    }))
}
