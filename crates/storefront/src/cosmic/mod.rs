//! Content API access (Cosmic headless CMS).
//!
//! # Architecture
//!
//! - The CMS is the source of truth for products, collections and reviews.
//!   Nothing is synced locally; handlers call through [`ContentSource`].
//! - [`CosmicClient`] talks to the Cosmic REST API with `reqwest` and caches
//!   catalog lists via `moka`.
//! - [`InMemoryContent`] serves a fixed catalog, loaded from a JSON fixture
//!   for offline runs or built directly in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use styleshop_storefront::cosmic::{ContentSource, CosmicClient, ProductFilter};
//!
//! let client = CosmicClient::new(&cosmic_config)?;
//! let products = client.fetch_products(&ProductFilter::default()).await?;
//! ```

mod client;
mod memory;
pub mod types;

pub use client::CosmicClient;
pub use memory::{Catalog, InMemoryContent};

use async_trait::async_trait;
use styleshop_core::{Collection, CollectionId, Product, ProductId, Review};
use thiserror::Error;

/// Errors that can occur when fetching content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The content API found nothing matching the query.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the content API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Non-success HTTP status other than 404 and 429.
    #[error("Content API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// Local fixture could not be loaded.
    #[error("Fixture error: {0}")]
    Fixture(String),
}

impl ContentError {
    /// Whether this error means "nothing matched" rather than a failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Treat a "not found" list response as an empty list.
///
/// The content API answers 404 when a query matches no objects.
///
/// # Errors
///
/// Passes through every error other than [`ContentError::NotFound`].
pub fn empty_if_not_found<T>(
    result: Result<Vec<T>, ContentError>,
) -> Result<Vec<T>, ContentError> {
    match result {
        Err(ContentError::NotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}

/// Server-side scoping applied when fetching the product list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductFilter {
    /// Only products owned by this collection.
    pub collection: Option<CollectionId>,
}

impl ProductFilter {
    /// Filter scoped to one collection.
    #[must_use]
    pub const fn in_collection(collection: CollectionId) -> Self {
        Self {
            collection: Some(collection),
        }
    }
}

/// A source of catalog content.
///
/// Implementations perform no retries; callers decide how to surface errors.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch products, optionally scoped to a collection.
    async fn fetch_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ContentError>;

    /// Fetch a single product by slug.
    async fn fetch_product(&self, slug: &str) -> Result<Product, ContentError>;

    /// Fetch a single product by ID.
    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Product, ContentError>;

    /// Fetch all collections.
    async fn fetch_collections(&self) -> Result<Vec<Collection>, ContentError>;

    /// Fetch a single collection by slug.
    async fn fetch_collection(&self, slug: &str) -> Result<Collection, ContentError>;

    /// Fetch the reviews written for a product.
    async fn fetch_reviews_for_product(&self, id: &ProductId)
    -> Result<Vec<Review>, ContentError>;

    /// Fetch the most recent reviews across all products.
    async fn fetch_reviews(&self, limit: usize) -> Result<Vec<Review>, ContentError>;
}
