//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartSessions;
use crate::config::{ContentConfig, StorefrontConfig};
use crate::cosmic::{ContentError, ContentSource, CosmicClient, InMemoryContent};
use crate::middleware::session::SESSION_EXPIRY;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the content source, carts and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    content: Arc<dyn ContentSource>,
    carts: CartSessions,
}

impl AppState {
    /// Create application state, building the content source from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the Cosmic client cannot be built or the content
    /// fixture cannot be loaded.
    pub fn new(config: StorefrontConfig) -> Result<Self, ContentError> {
        let content: Arc<dyn ContentSource> = match &config.content {
            ContentConfig::Cosmic(cosmic) => Arc::new(CosmicClient::new(cosmic)?),
            ContentConfig::Fixture(path) => Arc::new(InMemoryContent::from_json_file(path)?),
        };

        Ok(Self::with_content(config, content))
    }

    /// Create application state around an existing content source.
    #[must_use]
    pub fn with_content(config: StorefrontConfig, content: Arc<dyn ContentSource>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                carts: CartSessions::new(SESSION_EXPIRY),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the catalog content source.
    #[must_use]
    pub fn content(&self) -> &dyn ContentSource {
        self.inner.content.as_ref()
    }

    /// Get the live cart registry.
    #[must_use]
    pub fn carts(&self) -> &CartSessions {
        &self.inner.carts
    }
}
