//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use styleshop_core::{CollectionId, Product, RatingSummary, Review};
use tracing::instrument;

use crate::cosmic::{ProductFilter, empty_if_not_found};
use crate::error::Result;
use crate::state::AppState;

/// Number of products on the home page and in "you may also like".
const SHOWCASE_SIZE: usize = 3;

/// Product listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Only products in this collection (by ID).
    pub collection: Option<String>,
}

/// Product detail response body.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub reviews: Vec<Review>,
    pub rating: RatingSummary,
    /// Other catalog products, in catalog order.
    pub related: Vec<Product>,
}

/// List products, optionally scoped to one collection.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = ProductFilter {
        collection: query
            .collection
            .filter(|c| !c.trim().is_empty())
            .map(CollectionId::new),
    };

    let products = empty_if_not_found(state.content().fetch_products(&filter).await)?;
    Ok(Json(products))
}

/// Products featured on the home page: the first few in catalog order.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let mut products =
        empty_if_not_found(state.content().fetch_products(&ProductFilter::default()).await)?;
    products.truncate(SHOWCASE_SIZE);
    Ok(Json(products))
}

/// Show a product with its reviews, rating summary and related products.
///
/// Failed reviews or related-products fetches degrade to empty lists rather
/// than failing the whole page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = state.content().fetch_product(&slug).await?;

    let reviews = empty_if_not_found(state.content().fetch_reviews_for_product(&product.id).await)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, product_id = %product.id, "Failed to fetch reviews");
            Vec::new()
        });

    let rating = RatingSummary::from_reviews(&reviews);
    if rating.ignored > 0 {
        tracing::debug!(ignored = rating.ignored, "Ignored malformed review ratings");
    }

    let catalog = state.content().fetch_products(&ProductFilter::default()).await;
    let related = empty_if_not_found(catalog)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, product_id = %product.id, "Failed to fetch related products");
            Vec::new()
        })
        .into_iter()
        .filter(|p| p.id != product.id)
        .take(SHOWCASE_SIZE)
        .collect();

    Ok(Json(ProductDetail {
        product,
        reviews,
        rating,
        related,
    }))
}
