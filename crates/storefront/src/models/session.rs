//! Session-related types.
//!
//! The session holds only a token; the cart itself lives in
//! [`CartSessions`](crate::cart::CartSessions).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle a session uses to find its cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartToken(Uuid);

impl CartToken {
    /// Generate a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CartToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the session's cart token.
    pub const CART_TOKEN: &str = "cart_token";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_token_serializes_as_bare_uuid() {
        let token = CartToken::generate();
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, format!("\"{token}\""));

        let back: CartToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(CartToken::generate(), CartToken::generate());
    }
}
