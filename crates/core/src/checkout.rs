//! Derived checkout amounts: shipping, tax and grand total.
//!
//! Totals are recomputed from the cart subtotal on every read and never stored.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;

/// Store pricing rules applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Shipping fee charged when the subtotal does not exceed the threshold.
    pub flat_shipping: Decimal,
    /// Subtotals strictly above this ship free.
    pub free_shipping_over: Decimal,
    /// Sales tax as a fraction of the subtotal (0.08 = 8%).
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            flat_shipping: Decimal::new(999, 2),
            free_shipping_over: Decimal::from(100),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

impl PricingPolicy {
    /// Shipping charged for `subtotal`.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_shipping_over {
            Decimal::ZERO
        } else {
            self.flat_shipping
        }
    }

    /// Tax on `subtotal`, rounded half-up to cents.
    #[must_use]
    pub fn tax_for(&self, subtotal: Decimal) -> Decimal {
        (subtotal * self.tax_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Amounts shown on the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl CartTotals {
    /// Compute totals for a subtotal under `policy`.
    ///
    /// An empty cart (zero subtotal) owes nothing, not a shipping fee.
    #[must_use]
    pub fn compute(subtotal: Decimal, policy: &PricingPolicy) -> Self {
        if subtotal.is_zero() {
            return Self {
                subtotal,
                shipping: Decimal::ZERO,
                tax: Decimal::ZERO,
                total: Decimal::ZERO,
            };
        }

        let shipping = policy.shipping_for(subtotal);
        let tax = policy.tax_for(subtotal);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Compute totals for a cart.
    #[must_use]
    pub fn for_cart(cart: &Cart, policy: &PricingPolicy) -> Self {
        Self::compute(cart.total(), policy)
    }

    /// Whether this order qualifies for free shipping.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_under_threshold_pays_shipping() {
        let totals = CartTotals::compute(d("50"), &PricingPolicy::default());
        assert_eq!(totals.shipping, d("9.99"));
        assert_eq!(totals.tax, d("4.00"));
        assert_eq!(totals.total, d("63.99"));
        assert!(!totals.ships_free());
    }

    #[test]
    fn test_exactly_threshold_pays_shipping() {
        let totals = CartTotals::compute(d("100"), &PricingPolicy::default());
        assert_eq!(totals.shipping, d("9.99"));
    }

    #[test]
    fn test_over_threshold_ships_free() {
        let totals = CartTotals::compute(d("100.01"), &PricingPolicy::default());
        assert!(totals.ships_free());
        assert_eq!(totals.tax, d("8.00"));
        assert_eq!(totals.total, d("108.01"));
    }

    #[test]
    fn test_empty_subtotal_is_zero() {
        let totals = CartTotals::compute(Decimal::ZERO, &PricingPolicy::default());
        assert_eq!(totals.total, Decimal::ZERO);
        assert_eq!(totals.shipping, Decimal::ZERO);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        let policy = PricingPolicy::default();
        // 0.08 * 10.0625 = 0.805
        assert_eq!(policy.tax_for(d("10.0625")), d("0.81"));
    }

    #[test]
    fn test_serializes_numbers() {
        let totals = CartTotals::compute(d("50"), &PricingPolicy::default());
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["shipping"], serde_json::json!(9.99));
        assert_eq!(json["subtotal"], serde_json::json!(50.0));
    }
}
