//! Search route handler.
//!
//! Fetches the product list (scoped upstream by collection when given) and
//! filters and sorts it in memory. Unlike the other routes, failures here keep
//! a fixed response shape rather than going through [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use styleshop_core::Product;
use tracing::instrument;

use crate::cosmic::{ProductFilter, empty_if_not_found};
use crate::search::{self, SearchCriteria, SearchFacets, SearchParams};
use crate::state::AppState;

/// Search response body.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub total: usize,
    /// The query as the shopper typed it.
    pub query: String,
    pub facets: SearchFacets,
}

/// Filter and sort the catalog.
#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let criteria = SearchCriteria::from_params(&params);
    let query = params.q.unwrap_or_default();

    let filter = ProductFilter {
        collection: criteria.collection.clone(),
    };

    match empty_if_not_found(state.content().fetch_products(&filter).await) {
        Ok(products) => {
            let products = search::search(&products, &criteria);
            let facets = SearchFacets::compute(&products);
            tracing::debug!(
                results = products.len(),
                sort = criteria.sort.as_str(),
                "Search complete"
            );
            Json(SearchResponse {
                total: products.len(),
                products,
                query,
                facets,
            })
            .into_response()
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to search products" })),
            )
                .into_response()
        }
    }
}
