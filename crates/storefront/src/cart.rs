//! Session-owned carts.
//!
//! Each session holds a [`CartToken`] under [`session_keys::CART_TOKEN`]; the
//! cart itself lives in [`CartSessions`], one `Mutex<Cart>` per token. Handlers
//! take the [`SessionCart`] extractor and lock it for the whole
//! read-modify-write, so concurrent requests from one session never
//! interleave.
//!
//! Carts idle out on the same schedule as sessions. An expired session's
//! token is never presented again, so its cart is simply evicted.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use moka::future::Cache;
use styleshop_core::Cart;
use tokio::sync::{Mutex, MutexGuard};
use tower_sessions::Session;
use tracing::debug;

use crate::error::AppError;
use crate::models::{CartToken, session_keys};
use crate::state::AppState;

/// Upper bound on live carts held in memory.
const MAX_CARTS: u64 = 100_000;

/// Registry of live carts keyed by session token.
///
/// Cheap to clone; clones share the same carts.
#[derive(Clone)]
pub struct CartSessions {
    carts: Cache<CartToken, Arc<Mutex<Cart>>>,
}

impl CartSessions {
    /// Create a registry whose carts expire after `idle` without access.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            carts: Cache::builder()
                .max_capacity(MAX_CARTS)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// The cart for `token`, created empty on first access.
    pub async fn cart(&self, token: CartToken) -> Arc<Mutex<Cart>> {
        self.carts
            .get_with(token, async {
                debug!(cart_token = %token, "Starting new cart");
                Arc::new(Mutex::new(Cart::new()))
            })
            .await
    }
}

/// Read the session's cart token, creating one if absent.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn cart_token(session: &Session) -> Result<CartToken, tower_sessions::session::Error> {
    if let Some(token) = session.get::<CartToken>(session_keys::CART_TOKEN).await? {
        return Ok(token);
    }

    let token = CartToken::generate();
    session.insert(session_keys::CART_TOKEN, token).await?;
    Ok(token)
}

/// Extractor for the current session's cart.
///
/// Requires the session layer; creates the token and cart on first use.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(cart: SessionCart) -> impl IntoResponse {
///     let cart = cart.lock().await;
///     Json(cart.item_count())
/// }
/// ```
pub struct SessionCart {
    token: CartToken,
    cart: Arc<Mutex<Cart>>,
}

impl SessionCart {
    /// Lock the cart for a read-modify-write.
    pub async fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().await
    }

    #[must_use]
    pub const fn token(&self) -> CartToken {
        self.token
    }
}

impl FromRequestParts<AppState> for SessionCart {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("Session layer missing".to_string()))?;

        let token = cart_token(session)
            .await
            .map_err(|e| AppError::Internal(format!("Session error: {e}")))?;

        Ok(Self {
            token,
            cart: state.carts().cart(token).await,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use styleshop_core::{Price, Product, ProductId};

    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            slug: id.to_string(),
            name: id.to_string(),
            description: None,
            price: Price::new(Decimal::from(10)).unwrap(),
            image: None,
            collection: None,
            in_stock: true,
        }
    }

    #[tokio::test]
    async fn test_same_token_same_cart() {
        let carts = CartSessions::new(Duration::from_secs(60));
        let token = CartToken::generate();

        carts.cart(token).await.lock().await.add(product("a"), 2);
        let cart = carts.cart(token).await;
        assert_eq!(cart.lock().await.item_count(), 2);

        let other = carts.cart(CartToken::generate()).await;
        assert!(other.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let carts = CartSessions::new(Duration::from_secs(60));
        let token = CartToken::generate();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let carts = carts.clone();
                tokio::spawn(async move {
                    let cart = carts.cart(token).await;
                    cart.lock().await.add(product("a"), 1);
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let cart = carts.cart(token).await;
        let cart = cart.lock().await;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 20);
    }
}
