//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive from the content API as JSON numbers. They are held
//! as [`Decimal`] so cart totals and tax never accumulate float error, and
//! serialized back out as plain numbers.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Prices cannot be below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount in the store's currency (USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Line price for `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_usd(self.0))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Default Decimal visitor accepts both JSON numbers and numeric strings.
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

/// A user-supplied price limit, such as a `minPrice` query parameter.
///
/// Any finite non-negative number is a valid bound, including ones that do
/// not fit in a [`Decimal`]. Those saturate instead of being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBound {
    /// A representable amount.
    At(Price),
    /// Larger than any representable price.
    AboveRange,
    /// Positive but smaller than the smallest representable step.
    BelowPrecision,
}

impl PriceBound {
    /// Parse a bound. Accepts plain decimals (`"19.99"`) and scientific
    /// notation (`"2.5e1"`).
    ///
    /// Returns `None` for blank, malformed, non-finite or negative input so
    /// callers can treat the bound as absent.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let value: f64 = trimmed.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }

        // The decimal parse keeps "19.99" exact; the float is only the fallback.
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .or_else(|_| Decimal::try_from(value))
            .ok();

        match amount {
            Some(amount) if !(amount.is_zero() && value > 0.0) => {
                Price::new(amount).ok().map(Self::At)
            }
            _ if value >= 1.0 => Some(Self::AboveRange),
            _ => Some(Self::BelowPrecision),
        }
    }

    /// Whether `price` satisfies this bound as a minimum.
    #[must_use]
    pub fn admits_min(self, price: Price) -> bool {
        match self {
            Self::At(min) => price >= min,
            Self::AboveRange => false,
            Self::BelowPrecision => !price.amount().is_zero(),
        }
    }

    /// Whether `price` satisfies this bound as a maximum.
    #[must_use]
    pub fn admits_max(self, price: Price) -> bool {
        match self {
            Self::At(max) => price <= max,
            Self::AboveRange => true,
            Self::BelowPrecision => price.amount().is_zero(),
        }
    }
}

/// Format an amount as dollars with two decimal places (e.g. `$19.99`).
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_negative_price_rejected() {
        assert_eq!(
            Price::new(d("-1")),
            Err(PriceError::Negative(d("-1")))
        );
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    fn at(s: &str) -> PriceBound {
        PriceBound::At(Price::new(d(s)).unwrap())
    }

    #[test]
    fn test_parse_bound_valid() {
        assert_eq!(PriceBound::parse("25"), Some(at("25")));
        assert_eq!(PriceBound::parse(" 19.99 "), Some(at("19.99")));
        assert_eq!(PriceBound::parse("2.5e1"), Some(at("25")));
        assert_eq!(PriceBound::parse("0"), Some(PriceBound::At(Price::ZERO)));
        assert_eq!(PriceBound::parse("-0"), Some(PriceBound::At(Price::ZERO)));
    }

    #[test]
    fn test_parse_bound_ignores_garbage() {
        assert!(PriceBound::parse("").is_none());
        assert!(PriceBound::parse("   ").is_none());
        assert!(PriceBound::parse("abc").is_none());
        assert!(PriceBound::parse("NaN").is_none());
        assert!(PriceBound::parse("inf").is_none());
        assert!(PriceBound::parse("-5").is_none());
        assert!(PriceBound::parse("-1e-30").is_none());
    }

    #[test]
    fn test_parse_bound_saturates_out_of_range() {
        assert_eq!(PriceBound::parse("1e30"), Some(PriceBound::AboveRange));
        assert_eq!(
            PriceBound::parse("100000000000000000000000000000"),
            Some(PriceBound::AboveRange)
        );
        assert_eq!(PriceBound::parse("1e-30"), Some(PriceBound::BelowPrecision));
    }

    #[test]
    fn test_bound_admits() {
        let zero = Price::ZERO;
        let ten = Price::new(d("10")).unwrap();

        assert!(at("10").admits_min(ten));
        assert!(!at("10.01").admits_min(ten));
        assert!(at("10").admits_max(ten));
        assert!(!at("9.99").admits_max(ten));

        assert!(!PriceBound::AboveRange.admits_min(ten));
        assert!(PriceBound::AboveRange.admits_max(ten));

        assert!(!PriceBound::BelowPrecision.admits_min(zero));
        assert!(PriceBound::BelowPrecision.admits_min(ten));
        assert!(PriceBound::BelowPrecision.admits_max(zero));
        assert!(!PriceBound::BelowPrecision.admits_max(ten));
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::new(d("19.99")).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "19.99");
    }

    #[test]
    fn test_deserializes_number_and_string() {
        let from_number: Price = serde_json::from_str("20").unwrap();
        let from_string: Price = serde_json::from_str("\"20\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(d("20")).unwrap().to_string(), "$20.00");
        assert_eq!(format_usd(d("9.999")), "$10.00");
    }

    #[test]
    fn test_times() {
        let price = Price::new(d("9.99")).unwrap();
        assert_eq!(price.times(3), d("29.97"));
    }
}
