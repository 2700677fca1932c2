//! Newtype IDs for type-safe entity references.
//!
//! The content API identifies every object with an opaque string, so the
//! `define_id!` macro wraps `String` rather than a numeric key. Distinct types
//! keep a collection ID from being passed where a product ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use styleshop_core::define_id;
/// define_id!(ProductId);
/// define_id!(CollectionId);
///
/// let product_id = ProductId::new("65f1c0a2");
/// let collection_id = CollectionId::new("65f1c0a2");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = collection_id;
/// assert_eq!(product_id.as_str(), collection_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CollectionId);
define_id!(ReviewId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = ProductId::new("abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");

        let parsed: ProductId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_display_and_conversions() {
        let id = CollectionId::from("summer");
        assert_eq!(id.to_string(), "summer");
        assert_eq!(id.as_str(), "summer");
        assert_eq!(id.into_inner(), "summer".to_string());
    }
}
