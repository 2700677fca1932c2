//! In-memory content source.
//!
//! Serves a fixed [`Catalog`] with the same "not found" behavior as the CMS:
//! queries that match nothing fail with [`ContentError::NotFound`].

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use styleshop_core::{Collection, Product, ProductId, Review};

use crate::cosmic::{ContentError, ContentSource, ProductFilter};

/// A complete catalog snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Content source backed by an in-memory [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryContent {
    catalog: Catalog,
}

impl InMemoryContent {
    /// Serve the given catalog.
    #[must_use]
    pub const fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Load a catalog from a JSON fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Fixture`] if the file cannot be read, or
    /// [`ContentError::Parse`] if it is not a valid catalog.
    pub fn from_json_file(path: &Path) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ContentError::Fixture(format!("{}: {e}", path.display())))?;
        let catalog: Catalog = serde_json::from_str(&raw)?;

        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            collections = catalog.collections.len(),
            reviews = catalog.reviews.len(),
            "Loaded content fixture"
        );

        Ok(Self::new(catalog))
    }

    /// The catalog being served.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

fn non_empty<T>(items: Vec<T>, what: &str) -> Result<Vec<T>, ContentError> {
    if items.is_empty() {
        Err(ContentError::NotFound(what.to_string()))
    } else {
        Ok(items)
    }
}

#[async_trait]
impl ContentSource for InMemoryContent {
    async fn fetch_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ContentError> {
        let products = self
            .catalog
            .products
            .iter()
            .filter(|p| filter.collection.as_ref().is_none_or(|c| p.in_collection(c)))
            .cloned()
            .collect();
        non_empty(products, "products")
    }

    async fn fetch_product(&self, slug: &str) -> Result<Product, ContentError> {
        self.catalog
            .products
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(format!("product {slug}")))
    }

    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Product, ContentError> {
        self.catalog
            .products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(format!("product {id}")))
    }

    async fn fetch_collections(&self) -> Result<Vec<Collection>, ContentError> {
        non_empty(self.catalog.collections.clone(), "collections")
    }

    async fn fetch_collection(&self, slug: &str) -> Result<Collection, ContentError> {
        self.catalog
            .collections
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(format!("collection {slug}")))
    }

    async fn fetch_reviews_for_product(
        &self,
        id: &ProductId,
    ) -> Result<Vec<Review>, ContentError> {
        let reviews = self
            .catalog
            .reviews
            .iter()
            .filter(|r| r.product_id.as_ref() == Some(id))
            .cloned()
            .collect();
        non_empty(reviews, "reviews")
    }

    async fn fetch_reviews(&self, limit: usize) -> Result<Vec<Review>, ContentError> {
        let reviews = self.catalog.reviews.iter().take(limit).cloned().collect();
        non_empty(reviews, "reviews")
    }
}
