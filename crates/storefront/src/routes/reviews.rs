//! Review route handlers.

use axum::{Json, extract::State};
use styleshop_core::Review;
use tracing::instrument;

use crate::cosmic::empty_if_not_found;
use crate::error::Result;
use crate::state::AppState;

/// Number of reviews shown on the home page.
const FEATURED_REVIEWS: usize = 3;

/// Featured customer reviews.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Review>>> {
    let reviews = empty_if_not_found(state.content().fetch_reviews(FEATURED_REVIEWS).await)?;
    Ok(Json(reviews))
}
