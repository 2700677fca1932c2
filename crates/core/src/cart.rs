//! Cart aggregation.
//!
//! A [`Cart`] is an insertion-ordered list of [`CartItem`]s holding at most one
//! entry per product ID. Quantities are always at least one: reducing an item
//! to zero removes it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// A product selection and how many units of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    quantity: u32,
}

impl CartItem {
    /// Number of units, always `>= 1`.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// The current session's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

/// Clamp a caller-supplied quantity into the stored range.
fn to_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is incremented,
    /// otherwise a new item is appended. Non-positive quantities count as one.
    pub fn add(&mut self, product: Product, quantity: i64) {
        let quantity = to_quantity(quantity);

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartItem { product, quantity });
    }

    /// Set the quantity of an item. A quantity of zero or less removes it.
    ///
    /// Does nothing if the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| &i.product.id == product_id) {
            item.quantity = to_quantity(quantity);
        }
    }

    /// Remove an item. Does nothing if the product is not in the cart.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|i| &i.product.id != product_id);
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all items; zero when empty.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the item for a product.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product.id == product_id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
