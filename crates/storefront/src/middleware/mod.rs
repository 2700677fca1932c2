//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-memory store)

pub mod request_id;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, SESSION_EXPIRY, create_session_layer};
