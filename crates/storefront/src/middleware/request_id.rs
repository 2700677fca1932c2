//! Request ID middleware for request tracing and correlation.
//!
//! Reuses the `x-request-id` header from an upstream proxy when it is
//! well-formed, otherwise generates a UUID v4. The ID is recorded on the
//! current span, tagged on the Sentry scope, stored in request extensions as
//! [`RequestId`], and echoed on the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The current request's ID, available to handlers via `Extension<RequestId>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Accept an upstream ID only if it is short printable ASCII.
fn is_valid_request_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_valid_request_id(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
