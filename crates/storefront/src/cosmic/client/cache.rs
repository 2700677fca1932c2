//! Cache types for content API responses.

use styleshop_core::{Collection, CollectionId, Product};

/// Cache key for products and collections.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Products { collection: Option<CollectionId> },
    Collection(String),
    Collections,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Collection(Box<Collection>),
    Collections(Vec<Collection>),
}
