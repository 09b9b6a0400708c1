//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! webshop catalog list --search coffee
//! webshop catalog show 2
//! ```

use std::fmt::Write as _;

use webshop_core::{Product, ProductId};
use webshop_storefront::catalog::{ProductPage, ProductQuery, ProductRepository};

use super::CliError;

/// Print one page of the listing.
#[allow(clippy::print_stdout)]
pub fn list(catalog: &dyn ProductRepository, query: &ProductQuery, page_size: usize) {
    let page = catalog.search(query, page_size);
    tracing::debug!(matches = page.total_matches, page = page.page, "Listed products");
    print!("{}", render_page(&page));
}

/// Print one product in full.
///
/// # Errors
///
/// Returns [`CliError::ProductNotFound`] for an unknown ID.
#[allow(clippy::print_stdout)]
pub fn show(catalog: &dyn ProductRepository, id: &str) -> Result<(), CliError> {
    let product = catalog
        .find_by_id(&ProductId::new(id))
        .ok_or_else(|| CliError::ProductNotFound(id.to_string()))?;
    print!("{}", render_product(product));
    Ok(())
}

fn render_page(page: &ProductPage) -> String {
    let mut out = String::new();
    if page.products.is_empty() {
        out.push_str("No products found.\n");
        return out;
    }
    for product in &page.products {
        let _ = writeln!(
            out,
            "{:>4}  {:<22} {:>10}  {}",
            product.id, product.name, product.price, product.category
        );
    }
    let _ = writeln!(
        out,
        "Page {} of {} ({} products)",
        page.page, page.total_pages, page.total_matches
    );
    out
}

fn render_product(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", product.name, product.id);
    let _ = writeln!(out, "  Price:    {}", product.price);
    let _ = writeln!(out, "  Category: {}", product.category);
    let _ = writeln!(out, "  In stock: {}", product.stock);
    if let Some(rating) = product.rating {
        let _ = writeln!(
            out,
            "  Rating:   {rating:.1} ({} reviews)",
            product.reviews.unwrap_or(0)
        );
    }
    for option in &product.options {
        let _ = writeln!(out, "  {}: {}", option.name, option.values.join(", "));
    }
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use webshop_storefront::catalog::{DEFAULT_PAGE_SIZE, InMemoryCatalog};

    #[test]
    fn test_render_page_lists_every_match() {
        let page = InMemoryCatalog::demo().search(&ProductQuery::default(), DEFAULT_PAGE_SIZE);
        let out = render_page(&page);
        assert_eq!(out.lines().count(), 7);
        assert!(out.contains("Classic Tee"));
        assert!(out.contains("$29.99"));
        assert!(out.ends_with("Page 1 of 1 (6 products)\n"));
    }

    #[test]
    fn test_render_empty_page() {
        let query = ProductQuery {
            search: Some("nothing like this".to_string()),
            ..ProductQuery::default()
        };
        let page = InMemoryCatalog::demo().search(&query, DEFAULT_PAGE_SIZE);
        assert_eq!(render_page(&page), "No products found.\n");
    }

    #[test]
    fn test_render_product_shows_options() {
        let catalog = InMemoryCatalog::demo();
        let hoodie = catalog.find_by_id(&ProductId::new("2"));
        let out = hoodie.map(render_product).unwrap_or_default();
        assert!(out.starts_with("Modern Hoodie (2)\n"));
        assert!(out.contains("  Size: M, L, XL\n"));
        assert!(out.contains("  Color: Black, Gray\n"));
    }

    #[test]
    fn test_show_unknown_product() {
        let err = show(&InMemoryCatalog::demo(), "99");
        assert!(matches!(err, Err(CliError::ProductNotFound(id)) if id == "99"));
    }
}
