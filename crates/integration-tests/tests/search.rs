//! Integration tests for the search endpoint.

use axum::http::StatusCode;
use serde_json::Value;
use styleshop_integration_tests::TestApp;

fn names(body: &Value) -> Vec<&str> {
    body["products"]
        .as_array()
        .map(|products| {
            products
                .iter()
                .filter_map(|p| p["name"].as_str())
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_search_by_name() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/search?q=shirt").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(names(&resp.body), vec!["Red Shirt"]);
    assert_eq!(resp.body["total"], 1);
    assert_eq!(resp.body["query"], "shirt");
}

#[tokio::test]
async fn test_search_matches_description() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/search?q=POCKET").await;

    assert_eq!(names(&resp.body), vec!["Canvas Tote"]);
}

#[tokio::test]
async fn test_search_without_criteria_returns_catalog_in_order() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/search").await;

    assert_eq!(
        names(&resp.body),
        vec!["Red Shirt", "Blue Hat", "Linen Shorts", "Canvas Tote"]
    );
    assert_eq!(resp.body["total"], 4);
    assert_eq!(resp.body["query"], "");
}

#[tokio::test]
async fn test_min_price_keeps_out_of_stock_products() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/search?minPrice=25").await;

    assert_eq!(names(&resp.body), vec!["Blue Hat", "Linen Shorts"]);
}

#[tokio::test]
async fn test_malformed_price_is_ignored() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/search?minPrice=abc&maxPrice=").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["total"], 4);
}

#[tokio::test]
async fn test_in_stock_with_price_sort() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/search?inStock=true&sort=price-asc").await;

    assert_eq!(
        names(&resp.body),
        vec!["Canvas Tote", "Red Shirt", "Linen Shorts"]
    );
    assert_eq!(resp.body["facets"]["out_of_stock"], 0);
}

#[tokio::test]
async fn test_in_stock_requires_exact_true() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/search?inStock=1").await;

    assert_eq!(resp.body["total"], 4);
}

#[tokio::test]
async fn test_collection_scope_with_name_sort() {
    let mut app = TestApp::fixture();
    let resp = app
        .get("/api/search?collection=col-summer&sort=name-desc")
        .await;

    assert_eq!(names(&resp.body), vec!["Red Shirt", "Linen Shorts"]);
}

#[tokio::test]
async fn test_unknown_sort_keeps_upstream_order() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/search?sort=newest").await;

    assert_eq!(
        names(&resp.body),
        vec!["Red Shirt", "Blue Hat", "Linen Shorts", "Canvas Tote"]
    );
}

#[tokio::test]
async fn test_upstream_not_found_is_empty_success() {
    let mut app = TestApp::empty();
    let resp = app.get("/api/search?q=anything").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["products"], serde_json::json!([]));
    assert_eq!(resp.body["total"], 0);
    assert_eq!(resp.body["query"], "anything");
}

#[tokio::test]
async fn test_upstream_failure_is_server_error() {
    let mut app = TestApp::failing();
    let resp = app.get("/api/search?q=shirt").await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body["error"], "Failed to search products");
}

#[tokio::test]
async fn test_request_id_header() {
    let mut app = TestApp::fixture();

    let resp = app.get("/api/search").await;
    let generated = resp
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(generated.len(), 36, "expected a UUID request id");
}
