//! Core types for StyleShop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod email;
pub mod id;
pub mod price;
pub mod review;

pub use catalog::{Collection, CollectionRef, Image, Product};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceBound, PriceError, format_usd};
pub use review::{Rating, RatingSummary, Review};
