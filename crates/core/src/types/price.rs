//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored and multiplied as `rust_decimal::Decimal`, never as
//! floats. On the wire (session JSON, templates) a price is a decimal string
//! such as `"4.50"`, so a value read back is exactly the value written.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a price from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// An exact monetary amount in the shop's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// A zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Saturates at the largest representable amount instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: i32) -> Self {
        let negative = self.0.is_sign_negative() != (quantity < 0);
        Self(saturate(self.0.checked_mul(Decimal::from(quantity)), negative))
    }
}

/// Clamp an overflowed result to the bound on its side of zero.
fn saturate(result: Option<Decimal>, negative: bool) -> Decimal {
    match result {
        Some(value) => value,
        None if negative => Decimal::MIN,
        None => Decimal::MAX,
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| PriceError::Invalid(s.to_string()))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturating, like [`Price::times`].
    fn add(self, rhs: Self) -> Self::Output {
        Self(saturate(self.0.checked_add(rhs.0), self.0.is_sign_negative()))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_serializes_as_string() {
        let price: Price = "4.50".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"4.50\"");

        let back: Price = serde_json::from_str("\"4.50\"").unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_price_times_is_exact() {
        // 0.1 * 3 is not 0.3 in floating point
        let price: Price = "0.10".parse().unwrap();
        assert_eq!(price.times(3), "0.30".parse().unwrap());
    }

    #[test]
    fn test_price_display_two_places() {
        assert_eq!(Price::from_cents(999).to_string(), "9.99");
        assert_eq!("3".parse::<Price>().unwrap().to_string(), "3.00");
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::from_cents(450), Price::from_cents(300)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(750));
    }

    #[test]
    fn test_price_times_saturates() {
        let huge = Price::new(Decimal::MAX / Decimal::TWO);
        assert_eq!(huge.times(3), Price::new(Decimal::MAX));
        assert_eq!(huge.times(-3), Price::new(Decimal::MIN));
        assert_eq!(huge.times(0), Price::zero());
    }

    #[test]
    fn test_price_add_saturates() {
        let huge = Price::new(Decimal::MAX);
        assert_eq!(huge + Price::from_cents(1), huge);
        assert_eq!(
            Price::new(Decimal::MIN) + Price::from_cents(-1),
            Price::new(Decimal::MIN)
        );
    }

    #[test]
    fn test_price_rejects_garbage() {
        assert_eq!(
            "four fifty".parse::<Price>(),
            Err(PriceError::Invalid("four fifty".to_string()))
        );
    }
}
