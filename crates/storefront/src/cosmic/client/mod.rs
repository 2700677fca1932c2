//! Cosmic REST API client implementation.
//!
//! Uses `reqwest` for HTTP against the bucket's `/objects` endpoint.
//! Caches product and collection lookups using `moka` (TTL from config).
//! Reviews are always fetched fresh.

mod cache;
mod conversions;

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use styleshop_core::{Collection, Product, ProductId, Review};
use tracing::{debug, instrument};

use crate::config::CosmicConfig;
use crate::cosmic::types::{
    CollectionMetadata, CosmicObject, ObjectsResponse, ProductMetadata, ReviewMetadata,
};
use crate::cosmic::{ContentError, ContentSource, ProductFilter};

use cache::{CacheKey, CacheValue};
use conversions::{convert_collection, convert_product, convert_products, convert_review};

/// Object properties requested on every query.
const OBJECT_PROPS: &str = "id,slug,title,metadata,created_at";

/// Longest slice of an error body kept in logs and errors.
const ERROR_BODY_PREVIEW: usize = 500;

fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}

// =============================================================================
// CosmicClient
// =============================================================================

/// Client for the Cosmic REST API.
///
/// Cheap to clone; all clones share one connection pool and cache.
#[derive(Clone)]
pub struct CosmicClient {
    inner: Arc<CosmicClientInner>,
}

struct CosmicClientInner {
    client: reqwest::Client,
    objects_url: String,
    read_key: SecretString,
    cache: Cache<CacheKey, CacheValue>,
}

impl CosmicClient {
    /// Create a new content API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend
    /// initialization fails).
    pub fn new(config: &CosmicConfig) -> Result<Self, ContentError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("styleshop-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let objects_url = format!(
            "{}/buckets/{}/objects",
            config.api_url.trim_end_matches('/'),
            config.bucket_slug
        );

        Ok(Self {
            inner: Arc::new(CosmicClientInner {
                client,
                objects_url,
                read_key: config.read_key.clone(),
                cache,
            }),
        })
    }

    /// Run an object query and return the raw wire objects.
    async fn find<M: DeserializeOwned>(
        &self,
        query: &serde_json::Value,
        limit: Option<usize>,
    ) -> Result<Vec<CosmicObject<M>>, ContentError> {
        let query_json = query.to_string();

        let mut request = self.inner.client.get(&self.inner.objects_url).query(&[
            ("read_key", self.inner.read_key.expose_secret()),
            ("query", query_json.as_str()),
            ("props", OBJECT_PROPS),
            ("depth", "1"),
        ]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string())]);
        }

        let response = request.send().await?;
        let status = response.status();

        // The API answers 404 when nothing matches the query
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(query = %query_json, "No objects matched");
            return Err(ContentError::NotFound(query_json));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ContentError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&body),
                "Content API returned non-success status"
            );
            return Err(ContentError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let parsed: ObjectsResponse<M> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&body),
                "Failed to parse content API response"
            );
            ContentError::Parse(e)
        })?;

        debug!(count = parsed.objects.len(), total = ?parsed.total, "Fetched objects");
        Ok(parsed.objects)
    }

    /// Run a query expected to match one object.
    async fn find_one<M: DeserializeOwned>(
        &self,
        query: &serde_json::Value,
    ) -> Result<CosmicObject<M>, ContentError> {
        self.find(query, Some(1))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound(query.to_string()))
    }

    fn products_query(filter: &ProductFilter) -> serde_json::Value {
        let mut query = json!({ "type": "products" });
        if let Some(collection) = &filter.collection {
            query["metadata.collection"] = json!(collection.as_str());
        }
        query
    }
}

#[async_trait]
impl ContentSource for CosmicClient {
    #[instrument(skip(self))]
    async fn fetch_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ContentError> {
        let cache_key = CacheKey::Products {
            collection: filter.collection.clone(),
        };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let objects = self
            .find::<ProductMetadata>(&Self::products_query(filter), None)
            .await?;
        let products = convert_products(objects);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn fetch_product(&self, slug: &str) -> Result<Product, ContentError> {
        let cache_key = CacheKey::Product(slug.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let object = self
            .find_one::<ProductMetadata>(&json!({ "type": "products", "slug": slug }))
            .await?;
        let product = convert_product(object)
            .ok_or_else(|| ContentError::NotFound(format!("product {slug}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // Cart adds go through here, so the price is always read fresh
    #[instrument(skip(self), fields(product_id = %id))]
    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Product, ContentError> {
        let object = self
            .find_one::<ProductMetadata>(&json!({ "type": "products", "id": id.as_str() }))
            .await?;

        convert_product(object).ok_or_else(|| ContentError::NotFound(format!("product {id}")))
    }

    #[instrument(skip(self))]
    async fn fetch_collections(&self) -> Result<Vec<Collection>, ContentError> {
        if let Some(CacheValue::Collections(collections)) =
            self.inner.cache.get(&CacheKey::Collections).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let collections: Vec<Collection> = self
            .find::<CollectionMetadata>(&json!({ "type": "collections" }), None)
            .await?
            .into_iter()
            .map(convert_collection)
            .collect();

        self.inner
            .cache
            .insert(
                CacheKey::Collections,
                CacheValue::Collections(collections.clone()),
            )
            .await;

        Ok(collections)
    }

    #[instrument(skip(self))]
    async fn fetch_collection(&self, slug: &str) -> Result<Collection, ContentError> {
        let cache_key = CacheKey::Collection(slug.to_string());

        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let object = self
            .find_one::<CollectionMetadata>(&json!({ "type": "collections", "slug": slug }))
            .await?;
        let collection = convert_collection(object);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collection(Box::new(collection.clone())))
            .await;

        Ok(collection)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn fetch_reviews_for_product(
        &self,
        id: &ProductId,
    ) -> Result<Vec<Review>, ContentError> {
        let objects = self
            .find::<ReviewMetadata>(
                &json!({ "type": "reviews", "metadata.product": id.as_str() }),
                None,
            )
            .await?;

        Ok(objects.into_iter().map(convert_review).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_reviews(&self, limit: usize) -> Result<Vec<Review>, ContentError> {
        let objects = self
            .find::<ReviewMetadata>(&json!({ "type": "reviews" }), Some(limit))
            .await?;

        Ok(objects.into_iter().map(convert_review).collect())
    }
}
