//! Product catalog repository.
//!
//! The catalog is read-only: products and categories are fixed when the
//! repository is built. Lookups return borrowed records; the cart takes
//! its own copy when a product is added.

mod demo;
mod query;

pub use query::{DEFAULT_PAGE_SIZE, ProductPage, ProductQuery, SortOrder};

use webshop_core::{Category, CategoryId, OptionMatching, Product, ProductId, SelectedOptions};

/// Read access to products and categories.
pub trait ProductRepository: Send + Sync {
    /// All products, in catalog order.
    fn products(&self) -> &[Product];

    /// All categories, in display order.
    fn categories(&self) -> &[Category];

    fn find_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products().iter().find(|p| p.id == *id)
    }

    fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories().iter().find(|c| c.id == *id)
    }

    /// Products in the category with slug `category_id`. Unknown slugs
    /// yield nothing.
    fn list_by_category(&self, category_id: &CategoryId) -> Vec<&Product> {
        self.category(category_id).map_or_else(Vec::new, |category| {
            self.products()
                .iter()
                .filter(|p| p.category == category.name)
                .collect()
        })
    }

    /// The first `limit` products, shown on the home page.
    fn featured(&self, limit: usize) -> Vec<&Product> {
        self.products().iter().take(limit).collect()
    }

    /// Other products in the same category, up to `limit`.
    fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products()
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }

    /// The options a cart lookup uses when the caller names none.
    ///
    /// With exact matching that is the product's default selection, the
    /// same one an add without options gets. Lenient matching keeps the
    /// empty selection, which matches any line item for the product.
    /// Products no longer in the catalog resolve to the empty selection.
    fn selection_for(
        &self,
        product_id: &ProductId,
        options: Option<SelectedOptions>,
        matching: OptionMatching,
    ) -> SelectedOptions {
        match (options, matching) {
            (Some(options), _) => options,
            (None, OptionMatching::Lenient) => SelectedOptions::new(),
            (None, OptionMatching::Exact) => self
                .find_by_id(product_id)
                .map(Product::default_options)
                .unwrap_or_default(),
        }
    }

    /// Filter, sort and paginate the catalog.
    fn search(&self, query: &ProductQuery, page_size: usize) -> ProductPage {
        query::run(self, query, page_size)
    }
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl InMemoryCatalog {
    #[must_use]
    pub const fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// The demo shop's six products and five categories.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(demo::products(), demo::categories())
    }
}

impl ProductRepository for InMemoryCatalog {
    fn products(&self) -> &[Product] {
        &self.products
    }

    fn categories(&self) -> &[Category] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_demo_catalog_shape() {
        let catalog = InMemoryCatalog::demo();
        assert_eq!(catalog.products().len(), 6);
        assert_eq!(catalog.categories().len(), 5);
    }

    #[test]
    fn test_find_by_id() {
        let catalog = InMemoryCatalog::demo();
        let tee = catalog.find_by_id(&ProductId::new("1"));
        assert_eq!(tee.map(|p| p.name.as_str()), Some("Classic Tee"));
        assert!(catalog.find_by_id(&ProductId::new("404")).is_none());
    }

    #[test]
    fn test_list_by_category() {
        let catalog = InMemoryCatalog::demo();
        assert_eq!(
            ids(&catalog.list_by_category(&CategoryId::new("apparel"))),
            ["1", "2"]
        );
        assert_eq!(
            ids(&catalog.list_by_category(&CategoryId::new("home-goods"))),
            ["6"]
        );
        assert!(catalog.list_by_category(&CategoryId::new("books")).is_empty());
        assert!(catalog.list_by_category(&CategoryId::new("nope")).is_empty());
    }

    #[test]
    fn test_selection_for_absent_options() {
        let catalog = InMemoryCatalog::demo();
        let tee = ProductId::new("1");

        let exact = catalog.selection_for(&tee, None, OptionMatching::Exact);
        assert_eq!(exact, SelectedOptions::new().with("Size", "S"));

        let lenient = catalog.selection_for(&tee, None, OptionMatching::Lenient);
        assert!(lenient.is_empty());

        let chosen = SelectedOptions::new().with("Size", "XL");
        assert_eq!(
            catalog.selection_for(&tee, Some(chosen.clone()), OptionMatching::Exact),
            chosen
        );

        let gone = catalog.selection_for(&ProductId::new("404"), None, OptionMatching::Exact);
        assert!(gone.is_empty());
    }

    #[test]
    fn test_featured_and_related() {
        let catalog = InMemoryCatalog::demo();
        assert_eq!(ids(&catalog.featured(4)), ["1", "2", "3", "4"]);

        let watch = catalog.find_by_id(&ProductId::new("3")).cloned();
        let related = watch.map(|w| ids(&catalog.related(&w, 4)));
        assert_eq!(related, Some(vec!["4".to_string()]));
    }
}
