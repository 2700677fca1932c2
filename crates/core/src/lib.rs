//! StyleShop Core - Shared types and pure storefront logic.
//!
//! This crate provides the types and aggregations used by the storefront:
//! - [`types`] - Newtype IDs, prices, emails, catalog and review records
//! - [`cart`] - The per-session cart and its quantity rules
//! - [`checkout`] - Shipping, tax and grand-total derivation
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks. This keeps it lightweight and allows it to be used
//! anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod types;

pub use cart::{Cart, CartItem};
pub use checkout::{CartTotals, PricingPolicy};
pub use types::*;
