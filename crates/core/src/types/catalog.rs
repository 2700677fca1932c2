//! Catalog records: products, collections and their images.
//!
//! These are read-only values produced by the content API client. Optional
//! metadata is modeled with `Option` so every read site has to handle the
//! missing case.

use serde::{Deserialize, Serialize};

use super::id::{CollectionId, ProductId};
use super::price::Price;

/// An image hosted by the content API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Original file URL.
    pub url: String,
    /// imgix URL supporting on-the-fly resizing, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imgix_url: Option<String>,
}

impl Image {
    /// URL for a resized rendition, falling back to the original file.
    #[must_use]
    pub fn sized_url(&self, width: u32, height: u32) -> String {
        self.imgix_url.as_ref().map_or_else(
            || self.url.clone(),
            |base| format!("{base}?w={width}&h={height}&fit=crop&auto=format,compress"),
        )
    }
}

/// A reference from a product to the collection that owns it.
///
/// The content API returns either a bare ID or an expanded object depending on
/// query depth, so `slug` and `name` may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: CollectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CollectionRef {
    /// A reference that carries only the ID.
    #[must_use]
    pub const fn bare(id: CollectionId) -> Self {
        Self {
            id,
            slug: None,
            name: None,
        }
    }
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub collection: Option<CollectionRef>,
    pub in_stock: bool,
}

impl Product {
    /// ID of the owning collection, if any.
    #[must_use]
    pub fn collection_id(&self) -> Option<&CollectionId> {
        self.collection.as_ref().map(|c| &c.id)
    }

    /// Whether this product belongs to the given collection.
    #[must_use]
    pub fn in_collection(&self, id: &CollectionId) -> bool {
        self.collection_id() == Some(id)
    }
}

/// A named grouping of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<Image>,
}

impl Collection {
    /// Reference to this collection suitable for embedding in a product.
    #[must_use]
    pub fn to_ref(&self) -> CollectionRef {
        CollectionRef {
            id: self.id.clone(),
            slug: Some(self.slug.clone()),
            name: Some(self.name.clone()),
        }
    }
}
