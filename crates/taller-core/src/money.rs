//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    3 × 0.1 = 0.30000000000000004  ❌ WRONG!                             │
//! │                                                                         │
//! │  A transaction total that drifts by a fraction of a cent no longer     │
//! │  equals the sum of its line subtotals.                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "0.10" → 10 cents, × 3 = 30 cents, exactly                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Amounts leave the server as two-decimal strings (`"16.00"`), the same way
//! the relational store hands back numeric columns. They are accepted either
//! as strings or as JSON numbers. A number is read through its shortest
//! decimal text, so `8.1` becomes exactly 810 cents.
//!
//! ## Usage
//! ```rust
//! use taller_core::money::Money;
//!
//! let price = Money::parse("8.00").unwrap();
//! let subtotal = price.checked_times(2).unwrap();
//! assert_eq!(subtotal.cents(), 1600);
//! assert_eq!(subtotal.to_string(), "16.00");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use thiserror::Error;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction never wraps, negative values are representable
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Stored as INTEGER**: the database column holds cents, so SQL `SUM` stays exact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

/// Reasons a decimal literal is not a valid amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a decimal number")]
    InvalidFormat(String),

    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),

    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a decimal literal such as `"8"`, `"8.5"` or `"-3.25"`.
    ///
    /// ## Rules
    /// - Optional leading sign
    /// - At most two significant fractional digits (`"16.000"` is fine,
    ///   `"0.005"` is not)
    /// - No exponent, no thousands separators
    ///
    /// ## Example
    /// ```rust
    /// use taller_core::money::Money;
    ///
    /// assert_eq!(Money::parse("45").unwrap().cents(), 4500);
    /// assert_eq!(Money::parse(".5").unwrap().cents(), 50);
    /// assert!(Money::parse("1.005").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Money, ParseMoneyError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(ParseMoneyError::InvalidFormat(text.to_string()));
        }

        // Trailing zeros past the cent position carry no value.
        let fraction = if fraction.len() > 2 {
            if fraction[2..].bytes().any(|b| b != b'0') {
                return Err(ParseMoneyError::TooPrecise(text.to_string()));
            }
            &fraction[..2]
        } else {
            fraction
        };

        let out_of_range = || ParseMoneyError::OutOfRange(text.to_string());

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range())?
        };
        let fraction_cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| out_of_range())? * 10,
            _ => fraction.parse().map_err(|_| out_of_range())?,
        };

        let cents = whole_units
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(out_of_range)?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Multiplies a unit price by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use taller_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_times(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_times(2), None);
    /// ```
    #[inline]
    pub fn checked_times(&self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Converts to a floating point number of major units.
    ///
    /// For JSON fields the UI expects as plain numbers. Never feed the
    /// result back into arithmetic.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `16.00`, `-5.50`. No currency symbol: the shop UI adds it.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount with at most two decimal places")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(ParseMoneyError::OutOfRange(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let v = i64::try_from(v)
            .map_err(|_| E::custom(ParseMoneyError::OutOfRange(v.to_string())))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom(ParseMoneyError::InvalidFormat(v.to_string())));
        }
        // Display for f64 yields the shortest text that round-trips,
        // which is the literal the client wrote.
        Money::parse(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).map_err(E::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(Money::parse("8").unwrap().cents(), 800);
        assert_eq!(Money::parse("8.5").unwrap().cents(), 850);
        assert_eq!(Money::parse("8.05").unwrap().cents(), 805);
        assert_eq!(Money::parse("-3.25").unwrap().cents(), -325);
        assert_eq!(Money::parse("+1.10").unwrap().cents(), 110);
        assert_eq!(Money::parse(" 45.00 ").unwrap().cents(), 4500);
        assert_eq!(Money::parse("16.000").unwrap().cents(), 1600);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Money::parse(""), Err(ParseMoneyError::Empty));
        assert!(matches!(Money::parse("abc"), Err(ParseMoneyError::InvalidFormat(_))));
        assert!(matches!(Money::parse("."), Err(ParseMoneyError::InvalidFormat(_))));
        assert!(matches!(Money::parse("1e3"), Err(ParseMoneyError::InvalidFormat(_))));
        assert!(matches!(Money::parse("1.005"), Err(ParseMoneyError::TooPrecise(_))));
        assert!(matches!(
            Money::parse("999999999999999999999"),
            Err(ParseMoneyError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_checked_times_is_exact() {
        // 3 × 0.10 must be 0.30, not 0.30000000000000004
        let dime = Money::parse("0.10").unwrap();
        assert_eq!(dime.checked_times(3), Some(Money::from_cents(30)));
        assert_eq!(Money::from_cents(i64::MAX / 2 + 1).checked_times(2), None);
    }

    #[test]
    fn test_serializes_as_two_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(1600)).unwrap();
        assert_eq!(json, "\"16.00\"");
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_int: Money = serde_json::from_str("8").unwrap();
        let from_float: Money = serde_json::from_str("8.1").unwrap();
        let from_str: Money = serde_json::from_str("\"25.50\"").unwrap();

        assert_eq!(from_int.cents(), 800);
        assert_eq!(from_float.cents(), 810);
        assert_eq!(from_str.cents(), 2550);

        assert!(serde_json::from_str::<Money>("0.001").is_err());
        assert!(serde_json::from_str::<Money>("true").is_err());
    }
}
