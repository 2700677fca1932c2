//! Collection route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use styleshop_core::{Collection, Product};
use tracing::instrument;

use crate::cosmic::{ProductFilter, empty_if_not_found};
use crate::error::Result;
use crate::state::AppState;

/// Collection detail response body.
#[derive(Debug, Serialize)]
pub struct CollectionDetail {
    pub collection: Collection,
    pub products: Vec<Product>,
}

/// List all collections.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    let collections = empty_if_not_found(state.content().fetch_collections().await)?;
    Ok(Json(collections))
}

/// Show a collection and the products it owns.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CollectionDetail>> {
    let collection = state.content().fetch_collection(&slug).await?;

    let filter = ProductFilter::in_collection(collection.id.clone());
    let products = empty_if_not_found(state.content().fetch_products(&filter).await)?;

    Ok(Json(CollectionDetail {
        collection,
        products,
    }))
}
