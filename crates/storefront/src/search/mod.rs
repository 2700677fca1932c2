//! Catalog filtering and sorting.
//!
//! Search runs over the product list fetched from the content API. There is
//! no index: every request filters and sorts the fetched list in memory.
//!
//! Filters compose with AND:
//! - text: case-insensitive substring of name or description
//! - collection: exact match on the owning collection id
//! - price: inclusive min/max bounds
//! - stock: only products currently in stock
//!
//! All sorts are stable, so products that compare equal keep their input
//! order in every sort mode.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use styleshop_core::{CollectionId, Price, PriceBound, Product};

/// Sort order for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Keep the order returned by the content API.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortMode {
    /// Parse a sort parameter. Unknown values fall back to relevance.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "name-asc" => Self::NameAsc,
            "name-desc" => Self::NameDesc,
            _ => Self::Relevance,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }
}

/// Raw query-string parameters for a search request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub collection: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub in_stock: Option<String>,
    pub sort: Option<String>,
}

/// Parsed filter and sort criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Text to look for; empty means no text constraint.
    ///
    /// Surrounding whitespace is trimmed before matching, so `"shirt "`
    /// matches "Red Shirt".
    pub query: String,
    pub collection: Option<CollectionId>,
    pub min_price: Option<PriceBound>,
    pub max_price: Option<PriceBound>,
    pub in_stock_only: bool,
    pub sort: SortMode,
}

impl SearchCriteria {
    /// Build criteria from raw request parameters.
    ///
    /// Never fails: blank values mean "absent", malformed price bounds are
    /// ignored, and the stock filter is enabled only by exactly `"true"`.
    #[must_use]
    pub fn from_params(params: &SearchParams) -> Self {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };

        Self {
            query: non_blank(&params.q).unwrap_or_default(),
            collection: non_blank(&params.collection).map(CollectionId::new),
            min_price: params.min_price.as_deref().and_then(PriceBound::parse),
            max_price: params.max_price.as_deref().and_then(PriceBound::parse),
            in_stock_only: params.in_stock.as_deref() == Some("true"),
            sort: params.sort.as_deref().map(SortMode::parse).unwrap_or_default(),
        }
    }

    /// Whether a product passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_text(product)
            && self
                .collection
                .as_ref()
                .is_none_or(|c| product.in_collection(c))
            && self.min_price.is_none_or(|min| min.admits_min(product.price))
            && self.max_price.is_none_or(|max| max.admits_max(product.price))
            && (!self.in_stock_only || product.in_stock)
    }

    fn matches_text(&self, product: &Product) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// Filter and sort a product list.
///
/// Pure: the input is left untouched and a new list is returned.
#[must_use]
pub fn search(products: &[Product], criteria: &SearchCriteria) -> Vec<Product> {
    let mut results: Vec<Product> = products
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect();

    // `sort_by` is stable; descending orders compare reversed rather than
    // reversing the sorted list so ties keep input order.
    match criteria.sort {
        SortMode::Relevance => {}
        SortMode::PriceAsc => results.sort_by(|a, b| a.price.cmp(&b.price)),
        SortMode::PriceDesc => results.sort_by(|a, b| b.price.cmp(&a.price)),
        SortMode::NameAsc => results.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortMode::NameDesc => results.sort_by(|a, b| compare_names(&b.name, &a.name)),
    }

    results
}

// =============================================================================
// Name collation
// =============================================================================

/// Compare display names the way a shopper expects.
///
/// Primary comparison ignores case and accents ("éclair" sorts with
/// "eclair"). Names equal at that level are ordered lowercase first, then by
/// code point, so the order is total and deterministic.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let primary = a.chars().flat_map(fold_char).cmp(b.chars().flat_map(fold_char));

    primary
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Fold a character to its lowercase, unaccented base form.
fn fold_char(c: char) -> impl Iterator<Item = char> {
    let base = match c {
        'À'..='Å' | 'à'..='å' | 'Ā'..='ą' => 'a',
        'Ç' | 'ç' | 'Ć'..='č' => 'c',
        'Ď'..='đ' => 'd',
        'È'..='Ë' | 'è'..='ë' | 'Ē'..='ě' => 'e',
        'Ĝ'..='ģ' => 'g',
        'Ì'..='Ï' | 'ì'..='ï' | 'Ĩ'..='ı' => 'i',
        'Ñ' | 'ñ' | 'Ń'..='ň' => 'n',
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' | 'Ō'..='ő' => 'o',
        'Ŕ'..='ř' => 'r',
        'Ś'..='š' => 's',
        'Ţ'..='ť' => 't',
        'Ù'..='Ü' | 'ù'..='ü' | 'Ũ'..='ų' => 'u',
        'Ý' | 'ý' | 'ÿ' | 'Ÿ' => 'y',
        'Ź'..='ž' => 'z',
        other => other,
    };
    base.to_lowercase()
}

// =============================================================================
// Facets
// =============================================================================

/// Summary counts over a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchFacets {
    pub total: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl SearchFacets {
    /// Compute facets for `products`.
    #[must_use]
    pub fn compute(products: &[Product]) -> Self {
        let in_stock = products.iter().filter(|p| p.in_stock).count();
        Self {
            total: products.len(),
            in_stock,
            out_of_stock: products.len() - in_stock,
            min_price: products.iter().map(|p| p.price).min(),
            max_price: products.iter().map(|p| p.price).max(),
        }
    }
}
