//! Integration tests for StyleShop.
//!
//! Tests drive the full storefront router (middleware included) in-process
//! with `tower::ServiceExt::oneshot`; no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p styleshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Product, collection and review endpoints
//! - `search` - Search filtering, sorting and upstream failure handling
//! - `cart` - Session-owned carts and checkout

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use styleshop_core::{Collection, PricingPolicy, Product, ProductId, Review};
use styleshop_storefront::config::{ContentConfig, LogFormat, StorefrontConfig};
use styleshop_storefront::cosmic::{ContentError, ContentSource, InMemoryContent, ProductFilter};
use styleshop_storefront::state::AppState;
use tower::ServiceExt;

/// Path to the catalog fixture shipped with the storefront crate.
#[must_use]
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/fixtures/catalog.json")
}

/// Configuration suitable for in-process tests.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        content: ContentConfig::Fixture(fixture_path()),
        pricing: PricingPolicy::default(),
        log_format: LogFormat::Pretty,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A content source whose every call fails like an upstream outage.
#[derive(Debug, Default)]
pub struct FailingContent;

fn outage() -> ContentError {
    ContentError::Status {
        status: 503,
        body: "upstream unavailable".to_string(),
    }
}

#[async_trait]
impl ContentSource for FailingContent {
    async fn fetch_products(&self, _filter: &ProductFilter) -> Result<Vec<Product>, ContentError> {
        Err(outage())
    }

    async fn fetch_product(&self, _slug: &str) -> Result<Product, ContentError> {
        Err(outage())
    }

    async fn fetch_product_by_id(&self, _id: &ProductId) -> Result<Product, ContentError> {
        Err(outage())
    }

    async fn fetch_collections(&self) -> Result<Vec<Collection>, ContentError> {
        Err(outage())
    }

    async fn fetch_collection(&self, _slug: &str) -> Result<Collection, ContentError> {
        Err(outage())
    }

    async fn fetch_reviews_for_product(
        &self,
        _id: &ProductId,
    ) -> Result<Vec<Review>, ContentError> {
        Err(outage())
    }

    async fn fetch_reviews(&self, _limit: usize) -> Result<Vec<Review>, ContentError> {
        Err(outage())
    }
}

/// Wraps a content source and stalls every product-by-id lookup.
///
/// Lets a test hold `POST /api/cart/add` inside its upstream fetch while
/// other requests from the same session run.
pub struct SlowLookupContent {
    inner: Arc<dyn ContentSource>,
    delay: Duration,
}

impl SlowLookupContent {
    #[must_use]
    pub fn new(inner: Arc<dyn ContentSource>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl ContentSource for SlowLookupContent {
    async fn fetch_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ContentError> {
        self.inner.fetch_products(filter).await
    }

    async fn fetch_product(&self, slug: &str) -> Result<Product, ContentError> {
        self.inner.fetch_product(slug).await
    }

    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Product, ContentError> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_product_by_id(id).await
    }

    async fn fetch_collections(&self) -> Result<Vec<Collection>, ContentError> {
        self.inner.fetch_collections().await
    }

    async fn fetch_collection(&self, slug: &str) -> Result<Collection, ContentError> {
        self.inner.fetch_collection(slug).await
    }

    async fn fetch_reviews_for_product(
        &self,
        id: &ProductId,
    ) -> Result<Vec<Review>, ContentError> {
        self.inner.fetch_reviews_for_product(id).await
    }

    async fn fetch_reviews(&self, limit: usize) -> Result<Vec<Review>, ContentError> {
        self.inner.fetch_reviews(limit).await
    }
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body, or the raw text as a JSON string if it was not JSON.
    pub body: Value,
}

/// An in-process storefront with a cookie jar of one session.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront serving `content`.
    #[must_use]
    pub fn with_content(content: Arc<dyn ContentSource>) -> Self {
        let state = AppState::with_content(test_config(), content);
        Self {
            router: styleshop_storefront::app(state),
            cookie: None,
        }
    }

    /// Storefront serving the bundled fixture catalog.
    ///
    /// # Panics
    ///
    /// Panics if the fixture cannot be loaded.
    #[must_use]
    pub fn fixture() -> Self {
        let content = InMemoryContent::from_json_file(&fixture_path())
            .expect("Failed to load catalog fixture");
        Self::with_content(Arc::new(content))
    }

    /// Storefront serving an empty catalog (every query is "not found").
    #[must_use]
    pub fn empty() -> Self {
        Self::with_content(Arc::new(InMemoryContent::default()))
    }

    /// Storefront whose content API is down.
    #[must_use]
    pub fn failing() -> Self {
        Self::with_content(Arc::new(FailingContent))
    }

    /// The same storefront seen from a new browser with no session.
    #[must_use]
    pub fn fresh_session(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// The session cookie currently held, if any.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post_json(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    /// Send a POST request with a raw body labelled as JSON.
    pub async fn post_raw(&mut self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        let session_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|pair| pair.trim().to_string());
        if session_cookie.is_some() {
            self.cookie = session_cookie;
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
