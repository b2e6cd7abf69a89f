//! Money model
//!
//! CRITICAL: All money values are i64 minor units (cents).
//!
//! Catalog data arrives as decimals. It is converted to cents exactly once, at
//! the boundary, with round-half-away-from-zero. Every cost the engine returns
//! is therefore already rounded to 2 decimal places.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Largest decimal magnitude accepted at the boundary (~90 trillion)
const MAX_DECIMAL: f64 = 9.0e13;

/// Errors converting decimal input into money
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoneyError {
    #[error("amount is not a finite number: {0}")]
    NotFinite(f64),

    #[error("amount {0} exceeds the supported range")]
    OutOfRange(f64),
}

/// Monetary amount in cents
///
/// # Example
/// ```
/// use rental_pricing_core_rs::Money;
///
/// let price = Money::from_decimal(19.999).unwrap();
/// assert_eq!(price.cents(), 2000);
/// assert_eq!(price.to_string(), "20.00");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Convert a decimal currency amount, rounding half away from zero
    pub fn from_decimal(amount: f64) -> Result<Self, MoneyError> {
        if !amount.is_finite() {
            return Err(MoneyError::NotFinite(amount));
        }
        if amount.abs() > MAX_DECIMAL {
            return Err(MoneyError::OutOfRange(amount));
        }
        // f64::round is half away from zero
        Ok(Self((amount * 100.0).round() as i64))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Decimal view, for serialization and FFI only
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_mul(self, count: u64) -> Option<Money> {
        i64::try_from(count)
            .ok()
            .and_then(|n| self.0.checked_mul(n))
            .map(Money)
    }

    pub fn saturating_mul(self, count: u64) -> Money {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        Money(self.0.saturating_mul(count))
    }
}

/// Integer division rounding half away from zero
///
/// Used wherever a fractional number of cents has to be settled to whole
/// cents. `denominator` must be positive.
pub fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0, "denominator must be positive");
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(0.125).unwrap().cents(), 13);
        assert_eq!(Money::from_decimal(-0.125).unwrap().cents(), -13);
        assert_eq!(Money::from_decimal(20.0).unwrap().cents(), 2000);
    }

    #[test]
    fn test_from_decimal_rejects_non_finite() {
        assert_eq!(
            Money::from_decimal(f64::NAN).unwrap_err().to_string(),
            "amount is not a finite number: NaN"
        );
        assert!(matches!(
            Money::from_decimal(f64::INFINITY),
            Err(MoneyError::NotFinite(_))
        ));
        assert!(matches!(
            Money::from_decimal(1.0e15),
            Err(MoneyError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Money::from_cents(12000).to_string(), "120.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-150).to_string(), "-1.50");
    }

    #[test]
    fn test_div_round_half_away() {
        assert_eq!(div_round_half_away(25, 10), 3);
        assert_eq!(div_round_half_away(24, 10), 2);
        assert_eq!(div_round_half_away(-25, 10), -3);
        assert_eq!(div_round_half_away(-24, 10), -2);
        assert_eq!(div_round_half_away(90_000, 10_000), 9);
    }

    #[test]
    fn test_serde_uses_decimal_numbers() {
        let json = serde_json::to_string(&Money::from_cents(14000)).unwrap();
        assert_eq!(json, "140.0");
        let money: Money = serde_json::from_str("19.99").unwrap();
        assert_eq!(money.cents(), 1999);
    }
}
