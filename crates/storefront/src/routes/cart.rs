//! Cart route handlers.
//!
//! Every handler works on the session's own cart via [`SessionCart`]. Product
//! data for adds is always fetched from the content API by ID, so prices
//! never come from the client.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use styleshop_core::{Cart, CartItem, CartTotals, PricingPolicy, Product, ProductId};
use tracing::instrument;

use crate::cart::SessionCart;
use crate::cosmic::ContentError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::json_body;
use crate::state::AppState;

/// One cart line as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product: Product,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: rust_decimal::Decimal,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product.clone(),
            quantity: item.quantity(),
            line_total: item.line_total(),
        }
    }
}

/// Cart contents with derived totals.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub totals: CartTotals,
}

impl CartView {
    /// Snapshot a cart under `policy`.
    #[must_use]
    pub fn new(cart: &Cart, policy: &PricingPolicy) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            item_count: cart.item_count(),
            totals: CartTotals::for_cart(cart, policy),
        }
    }
}

/// Header badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub product_id: ProductId,
    /// Defaults to one.
    pub quantity: Option<i64>,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove-line request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCart {
    pub product_id: ProductId,
}

/// Show the cart.
#[instrument(skip(state, cart), fields(cart_token = %cart.token()))]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> Json<CartView> {
    let cart = cart.lock().await;
    Json(CartView::new(&cart, &state.config().pricing))
}

/// Cart count badge.
#[instrument(skip(cart), fields(cart_token = %cart.token()))]
pub async fn count(cart: SessionCart) -> Json<CartCount> {
    let count = cart.lock().await.item_count();
    Json(CartCount { count })
}

/// Add a product to the cart.
#[instrument(skip(state, cart, payload), fields(cart_token = %cart.token()))]
pub async fn add(
    State(state): State<AppState>,
    cart: SessionCart,
    payload: std::result::Result<Json<AddToCart>, JsonRejection>,
) -> Result<Json<CartView>> {
    let request = json_body(payload)?;

    // Fetch before locking so a slow upstream never holds the cart
    let product = state
        .content()
        .fetch_product_by_id(&request.product_id)
        .await
        .map_err(|e| match e {
            ContentError::NotFound(_) => {
                AppError::NotFound(format!("product {}", request.product_id))
            }
            other => AppError::Content(other),
        })?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("product_id", product.id.as_str())],
    );

    let mut cart = cart.lock().await;
    cart.add(product, request.quantity.unwrap_or(1));
    Ok(Json(CartView::new(&cart, &state.config().pricing)))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(state, cart, payload), fields(cart_token = %cart.token()))]
pub async fn update(
    State(state): State<AppState>,
    cart: SessionCart,
    payload: std::result::Result<Json<UpdateQuantity>, JsonRejection>,
) -> Result<Json<CartView>> {
    let request = json_body(payload)?;

    let mut cart = cart.lock().await;
    cart.update_quantity(&request.product_id, request.quantity);
    Ok(Json(CartView::new(&cart, &state.config().pricing)))
}

/// Remove a line from the cart.
#[instrument(skip(state, cart, payload), fields(cart_token = %cart.token()))]
pub async fn remove(
    State(state): State<AppState>,
    cart: SessionCart,
    payload: std::result::Result<Json<RemoveFromCart>, JsonRejection>,
) -> Result<Json<CartView>> {
    let request = json_body(payload)?;

    let mut cart = cart.lock().await;
    cart.remove(&request.product_id);
    Ok(Json(CartView::new(&cart, &state.config().pricing)))
}

/// Empty the cart.
#[instrument(skip(state, cart), fields(cart_token = %cart.token()))]
pub async fn clear(State(state): State<AppState>, cart: SessionCart) -> Json<CartView> {
    let mut cart = cart.lock().await;
    cart.clear();
    Json(CartView::new(&cart, &state.config().pricing))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;
    use styleshop_core::Price;

    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            slug: id.to_string(),
            name: id.to_string(),
            description: None,
            price: Price::new(Decimal::from(price)).unwrap(),
            image: None,
            collection: None,
            in_stock: true,
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add(product("p1", 20), 1);
        cart.add(product("p2", 10), 3);

        let view = CartView::new(&cart, &PricingPolicy::default());
        assert_eq!(view.item_count, 4);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[1].line_total, Decimal::from(30));
        assert_eq!(view.totals.subtotal, Decimal::from(50));
        assert_eq!(view.totals.shipping, Decimal::new(999, 2));
        assert_eq!(view.totals.tax, Decimal::from(4));
    }

    #[test]
    fn test_cart_view_json_shape() {
        let mut cart = Cart::new();
        cart.add(product("p1", 20), 2);

        let json = serde_json::to_value(CartView::new(&cart, &PricingPolicy::default())).unwrap();
        assert_eq!(json["item_count"], 2);
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][0]["line_total"], 40.0);
        assert_eq!(json["totals"]["subtotal"], 40.0);
    }
}
