//! Product listing queries: category filter, text search, sort, pages.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use webshop_core::{CategoryId, Product};

use super::ProductRepository;

/// Products per listing page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Listing sort order, keyed by the `sort` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    /// Unrecognised key: catalog order.
    Unsorted,
}

impl SortOrder {
    /// Map a `sort` key to an order. Unknown keys keep catalog order.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "name_asc" => Self::NameAsc,
            "name_desc" => Self::NameDesc,
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            "rating_desc" => Self::RatingDesc,
            _ => Self::Unsorted,
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::NameAsc => by_name(a, b),
            Self::NameDesc => by_name(b, a),
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::RatingDesc => b.rating.unwrap_or(0.0).total_cmp(&a.rating.unwrap_or(0.0)),
            Self::Unsorted => Ordering::Equal,
        }
    }
}

fn by_name(a: &Product, b: &Product) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

/// Listing parameters, as sent in the query string.
///
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Category slug. Unknown slugs do not filter.
    pub category: Option<CategoryId>,
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl ProductQuery {
    fn sort_order(&self) -> SortOrder {
        self.sort
            .as_deref()
            .filter(|s| !s.is_empty())
            .map_or_else(SortOrder::default, SortOrder::from_key)
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
    pub total_matches: usize,
}

pub(super) fn run<R>(repo: &R, query: &ProductQuery, page_size: usize) -> ProductPage
where
    R: ProductRepository + ?Sized,
{
    let category_name = query
        .category
        .as_ref()
        .filter(|c| !c.as_str().is_empty())
        .and_then(|c| repo.category(c))
        .map(|c| c.name.as_str());
    let term = query.search_term();

    let mut matches: Vec<&Product> = repo
        .products()
        .iter()
        .filter(|p| category_name.is_none_or(|name| p.category == name))
        .filter(|p| {
            term.as_deref().is_none_or(|t| {
                p.name.to_lowercase().contains(t) || p.description.to_lowercase().contains(t)
            })
        })
        .collect();

    let order = query.sort_order();
    matches.sort_by(|a, b| order.compare(a, b));

    let page_size = page_size.max(1);
    let total_matches = matches.len();
    let total_pages = u32::try_from(total_matches.div_ceil(page_size)).unwrap_or(u32::MAX);
    let page = query.page.unwrap_or(1).max(1);
    let start = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(page_size);

    let products = matches
        .into_iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    ProductPage {
        products,
        page,
        total_pages,
        total_matches,
    }
}
