//! Integration tests for product, collection and review endpoints.

use axum::http::StatusCode;
use styleshop_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::failing();
    let resp = app.get("/health").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn test_product_listing() {
    let mut app = TestApp::fixture();

    let resp = app.get("/api/products").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_array().map(Vec::len), Some(4));

    let resp = app.get("/api/products?collection=col-accessories").await;
    assert_eq!(resp.body.as_array().map(Vec::len), Some(1));
    assert_eq!(resp.body[0]["slug"], "blue-hat");
}

#[tokio::test]
async fn test_product_detail_with_reviews() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/products/red-shirt").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["product"]["name"], "Red Shirt");
    assert_eq!(resp.body["product"]["price"], 20.0);
    assert_eq!(resp.body["reviews"].as_array().map(Vec::len), Some(2));
    assert_eq!(resp.body["rating"]["average"], 4.5);
    assert_eq!(resp.body["rating"]["count"], 2);
}

fn slugs(list: &serde_json::Value) -> Vec<&str> {
    list.as_array()
        .map(|items| items.iter().filter_map(|p| p["slug"].as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_product_detail_lists_related_products() {
    let mut app = TestApp::fixture();

    let resp = app.get("/api/products/red-shirt").await;
    assert_eq!(
        slugs(&resp.body["related"]),
        vec!["blue-hat", "linen-shorts", "canvas-tote"]
    );

    let resp = app.get("/api/products/linen-shorts").await;
    assert_eq!(
        slugs(&resp.body["related"]),
        vec!["red-shirt", "blue-hat", "canvas-tote"]
    );
}

#[tokio::test]
async fn test_featured_products() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/products/featured").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        slugs(&resp.body),
        vec!["red-shirt", "blue-hat", "linen-shorts"]
    );
}

#[tokio::test]
async fn test_product_without_reviews() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/products/canvas-tote").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["reviews"], serde_json::json!([]));
    assert!(resp.body["rating"]["average"].is_null());
    assert!(resp.body["product"]["collection"].is_null());
}

#[tokio::test]
async fn test_missing_product_is_404() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/products/no-such-thing").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.body["error"].is_string());
}

#[tokio::test]
async fn test_collections() {
    let mut app = TestApp::fixture();

    let resp = app.get("/api/collections").await;
    assert_eq!(resp.body.as_array().map(Vec::len), Some(2));

    let resp = app.get("/api/collections/summer-essentials").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["collection"]["name"], "Summer Essentials");
    assert_eq!(resp.body["products"].as_array().map(Vec::len), Some(2));

    let resp = app.get("/api/collections/winter").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_featured_reviews() {
    let mut app = TestApp::fixture();
    let resp = app.get("/api/reviews/featured").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_empty_catalog_lists_are_empty() {
    let mut app = TestApp::empty();

    for uri in [
        "/api/products",
        "/api/products/featured",
        "/api/collections",
        "/api/reviews/featured",
    ] {
        let resp = app.get(uri).await;
        assert_eq!(resp.status, StatusCode::OK, "{uri}");
        assert_eq!(resp.body, serde_json::json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let mut app = TestApp::failing();

    for uri in [
        "/api/products",
        "/api/products/red-shirt",
        "/api/collections",
    ] {
        let resp = app.get(uri).await;
        assert_eq!(resp.status, StatusCode::BAD_GATEWAY, "{uri}");
        assert_eq!(resp.body["error"], "External service error", "{uri}");
    }
}
