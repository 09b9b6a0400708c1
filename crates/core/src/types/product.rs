//! Catalog records: products, their variant options, and categories.
//!
//! Field names serialize in camelCase so product snapshots embedded in a
//! persisted cart keep the layout the browser shop used.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::options::SelectedOptions;
use super::price::Price;

/// A variant dimension a shopper chooses from, e.g. `Size` -> `S, M, L`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

impl ProductOption {
    /// Create an option from a name and its allowed values, in display order.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `value` is one of the allowed values.
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// A product as listed in the catalog.
///
/// Immutable once loaded. A cart line item embeds a full copy, so later
/// catalog edits never change what is already in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    /// Category display label (matches [`Category::name`]).
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ProductOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

impl Product {
    /// Create a product with the required fields; everything else is empty.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            image_url: String::new(),
            category: String::new(),
            stock: 0,
            rating: None,
            reviews: None,
            sku: None,
            options: Vec::new(),
            long_description: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    #[must_use]
    pub fn with_option(mut self, option: ProductOption) -> Self {
        self.options.push(option);
        self
    }

    /// Look up a declared option by name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// The initial selection shown on a product page: the first value of
    /// every option. Options without values are skipped.
    #[must_use]
    pub fn default_options(&self) -> SelectedOptions {
        self.options
            .iter()
            .filter_map(|o| o.values.first().map(|v| (o.name.clone(), v.clone())))
            .collect()
    }
}

/// A browsing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// URL slug, e.g. `home-goods`.
    pub id: CategoryId,
    /// Display label, e.g. `Home Goods`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hoodie() -> Product {
        Product::new("2", "Modern Hoodie", Price::parse("59.99").unwrap())
            .with_option(ProductOption::new("Size", ["M", "L", "XL"]))
            .with_option(ProductOption::new("Color", ["Black", "Gray"]))
    }

    #[test]
    fn test_default_options_pick_first_values() {
        let defaults = hoodie().default_options();
        assert_eq!(defaults.get("Size"), Some("M"));
        assert_eq!(defaults.get("Color"), Some("Black"));
        assert_eq!(defaults.len(), 2);
    }

    #[test]
    fn test_default_options_skip_empty_option() {
        let product = Product::new("9", "Blank", Price::ZERO)
            .with_option(ProductOption::new("Engraving", Vec::<String>::new()));
        assert!(product.default_options().is_empty());
    }

    #[test]
    fn test_camel_case_layout() {
        let mut product = hoodie();
        product.image_url = "https://picsum.photos/400/401".to_string();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["imageUrl"], "https://picsum.photos/400/401");
        assert_eq!(json["price"], "59.99");
        assert!(json.get("rating").is_none());
    }

    #[test]
    fn test_loads_browser_shape() {
        let json = r#"{
            "id": "1", "name": "Classic Tee", "description": "A tee.",
            "price": 29.99, "imageUrl": "x", "category": "Apparel",
            "stock": 100, "rating": 4.5, "reviews": 120, "sku": "TS001",
            "options": [{"name": "Size", "values": ["S", "M"]}]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Price::parse("29.99").unwrap());
        assert_eq!(product.option("Size").map(|o| o.values.len()), Some(2));
        assert_eq!(product.sku.as_deref(), Some("TS001"));
    }
}
