//! Checkout route handler.
//!
//! Checkout is simulated: the order is validated, priced, acknowledged with an
//! order number and the cart is torn down. No payment is taken and nothing is
//! persisted.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use styleshop_core::{CartTotals, Email};
use tracing::instrument;
use uuid::Uuid;

use crate::cart::SessionCart;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::cart::CartItemView;
use crate::routes::json_body;
use crate::state::AppState;

/// Shipping and contact details submitted at checkout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl CheckoutRequest {
    /// Check every field is present and the email is plausible.
    fn validate(&self) -> Result<Email> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("country", &self.country),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Email::parse(&self.email)
            .map_err(|e| AppError::BadRequest(format!("Invalid email address: {e}")))
    }
}

/// Order acknowledgement.
#[derive(Debug, Serialize)]
pub struct OrderConfirmation {
    pub order_number: String,
    pub email: Email,
    pub items: Vec<CartItemView>,
    pub totals: CartTotals,
    pub placed_at: DateTime<Utc>,
}

/// Short human-friendly order number, e.g. `SS-1A2B3C4D`.
fn order_number() -> String {
    let id: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    format!("SS-{}", id.to_uppercase())
}

/// Place a simulated order for the session's cart.
#[instrument(skip(state, cart, payload), fields(cart_token = %cart.token()))]
pub async fn checkout(
    State(state): State<AppState>,
    cart: SessionCart,
    payload: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<OrderConfirmation>> {
    let request = json_body(payload)?;
    let email = request.validate()?;

    let confirmation = {
        let mut cart = cart.lock().await;
        if cart.is_empty() {
            return Err(AppError::BadRequest("Your cart is empty".to_string()));
        }

        let confirmation = OrderConfirmation {
            order_number: order_number(),
            email,
            items: cart.items().iter().map(CartItemView::from).collect(),
            totals: CartTotals::for_cart(&cart, &state.config().pricing),
            placed_at: Utc::now(),
        };
        // The cart stays registered to the session. An add that resolved it
        // before this lock still lands in the cart the session will read next.
        cart.clear();
        confirmation
    };

    add_breadcrumb(
        "checkout",
        "Order placed",
        &[("order_number", confirmation.order_number.as_str())],
    );
    tracing::info!(
        order_number = %confirmation.order_number,
        items = confirmation.items.len(),
        total = %confirmation.totals.total,
        "Order placed"
    );

    Ok(Json(confirmation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CheckoutRequest {
        CheckoutRequest {
            email: "alex@example.com".to_string(),
            first_name: "Alex".to_string(),
            last_name: "Doe".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            country: "US".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let request = CheckoutRequest {
            city: "  ".to_string(),
            country: String::new(),
            ..valid_request()
        };

        match request.validate() {
            Err(AppError::BadRequest(msg)) => {
                assert!(msg.contains("city"));
                assert!(msg.contains("country"));
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let request = CheckoutRequest {
            email: "not-an-email".to_string(),
            ..valid_request()
        };
        assert!(matches!(request.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_order_number_format() {
        let number = order_number();
        assert!(number.starts_with("SS-"));
        assert_eq!(number.len(), 11);
        assert_ne!(number, order_number());
    }
}
