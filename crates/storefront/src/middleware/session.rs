//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. Sessions (and the carts
//! they own) do not survive a restart.

use std::time::Duration;

use tower_sessions::cookie::time::Duration as CookieDuration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "styleshop_session";

/// Inactivity period after which a session and its cart are dropped (7 days).
pub const SESSION_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let expiry = CookieDuration::try_from(SESSION_EXPIRY).unwrap_or(CookieDuration::WEEK);

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(expiry))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
