//! Wire types for the Cosmic REST API.
//!
//! These mirror the JSON the CMS returns and are converted into the core
//! records by the client's `conversions` module. Everything optional in the
//! CMS schema is optional here too.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Envelope for `GET /objects` responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectsResponse<M> {
    #[serde(default = "Vec::new")]
    pub objects: Vec<CosmicObject<M>>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Fields shared by every CMS object.
#[derive(Debug, Clone, Deserialize)]
pub struct CosmicObject<M> {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    pub metadata: M,
}

/// A file metafield.
#[derive(Debug, Clone, Deserialize)]
pub struct CosmicFile {
    pub url: String,
    #[serde(default)]
    pub imgix_url: Option<String>,
}

/// An object relationship: an ID at depth 0, the full object at depth >= 1.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ObjectRef<M> {
    Expanded(Box<CosmicObject<M>>),
    Id(String),
}

/// `collections` object metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub collection_image: Option<CosmicFile>,
}

/// `products` object metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub product_image: Option<CosmicFile>,
    #[serde(default)]
    pub collection: Option<ObjectRef<CollectionMetadata>>,
    #[serde(default)]
    pub in_stock: bool,
}

/// Select-dropdown value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectValue {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// `reviews` object metadata.
///
/// The linked product is only needed for its ID, so its metadata is skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewMetadata {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub rating: SelectValue,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub product: Option<ObjectRef<serde::de::IgnoredAny>>,
}
