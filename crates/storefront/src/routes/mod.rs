//! HTTP route handlers for storefront.
//!
//! All routes speak JSON. Errors are `{ "error": "<message>" }`.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Health check
//!
//! # Catalog
//! GET  /api/search                - Filter and sort products
//! GET  /api/products              - Product listing (?collection=<id>)
//! GET  /api/products/featured     - First products in catalog order, for the home page
//! GET  /api/products/{slug}       - Product detail with reviews, rating and related products
//! GET  /api/collections           - Collection listing
//! GET  /api/collections/{slug}    - Collection detail with its products
//! GET  /api/reviews/featured      - Featured reviews for the home page
//!
//! # Cart (session-owned)
//! GET  /api/cart                  - Cart contents and totals
//! GET  /api/cart/count            - Header badge count
//! POST /api/cart/add              - Add a product
//! POST /api/cart/update           - Set a line's quantity (0 removes)
//! POST /api/cart/remove           - Remove a line
//! POST /api/cart/clear            - Empty the cart
//!
//! # Checkout
//! POST /api/checkout              - Place a simulated order
//! ```

pub mod cart;
pub mod checkout;
pub mod collections;
pub mod products;
pub mod reviews;
pub mod search;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Unwrap a JSON body, turning rejections into JSON `400` errors.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{slug}", get(products::show))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{slug}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search::search))
        .nest("/api/products", product_routes())
        .nest("/api/collections", collection_routes())
        .route("/api/reviews/featured", get(reviews::featured))
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::checkout))
}
