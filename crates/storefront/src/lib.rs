//! StyleShop Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod cosmic;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod state;

use axum::{Router, extract::Request, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full storefront application with its middleware stack.
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the content API.
async fn health() -> &'static str {
    "ok"
}
