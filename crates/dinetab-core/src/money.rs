//! # Money Module
//!
//! Provides the `Money` type for prices, order totals and revenue figures.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend stores prices as numeric and hands them out as JSON       │
//! │  numbers in major units:  { "price": 12.5 }                            │
//! │                                                                         │
//! │  Summing those as floats drifts:                                        │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  OUR SOLUTION: convert once at the boundary                             │
//! │    JSON 12.5  ──►  Money(1250)  ──► arithmetic on i64                   │
//! │    Money(1250) ──►  JSON 12.5   (on the way back out)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dinetab_core::money::Money;
//!
//! let tagine = Money::from_minor(8500); // 85.00 MAD
//! let two = tagine.multiply_quantity(2);
//! assert_eq!(two.minor(), 17000);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

/// Minor units per major unit (centimes per dirham).
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centimes for MAD).
///
/// ## Wire Format
/// On the wire the backend uses major units as JSON numbers, so `Money`
/// serializes to and deserializes from that form. Numeric strings
/// (`"12.50"`) are accepted too since some views cast numeric to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use dinetab_core::money::Money;
    ///
    /// let price = Money::from_minor(1250); // 12.50
    /// assert_eq!(price.major(), 12);
    /// assert_eq!(price.minor_part(), 50);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Converts a major-unit float coming off the wire.
    ///
    /// Rounds half away from zero to the nearest minor unit.
    pub fn from_major_f64(value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() {
            return Err(CoreError::InvalidAmount(value.to_string()));
        }
        let minor = (value * MINOR_PER_MAJOR as f64).round();
        if minor.abs() > i64::MAX as f64 / 2.0 {
            return Err(CoreError::InvalidAmount(value.to_string()));
        }
        Ok(Money(minor as i64))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole major units (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit remainder (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns the value as a major-unit float, for the wire only.
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a line quantity, saturating at the
    /// representable bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal major-unit string exactly (`"12.5"`, `"-3.05"`, `"7"`).
///
/// More than two fractional digits is rejected rather than rounded.
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || CoreError::InvalidAmount(s.to_string());

        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        if digits.is_empty() {
            return Err(invalid());
        }

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if fraction.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
            || (whole.is_empty() && fraction.is_empty())
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let minor = whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(fraction))
            .ok_or_else(invalid)?;
        Ok(Money(if negative { -minor } else { minor }))
    }
}

// =============================================================================
// Serde (major units on the wire)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_PER_MAJOR == 0 {
            serializer.serialize_i64(self.major())
        } else {
            serializer.serialize_f64(self.to_major_f64())
        }
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount in major units, as a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(MINOR_PER_MAJOR)
            .map(Money)
            .ok_or_else(|| E::custom(format!("amount out of range: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(format!("amount out of range: {v}")))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_major_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain `major.minor` rendering for logs; pages use
/// [`crate::format::format_currency`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor_parts() {
        let money = Money::from_minor(1250);
        assert_eq!(money.minor(), 1250);
        assert_eq!(money.major(), 12);
        assert_eq!(money.minor_part(), 50);
        assert_eq!(Money::from_major(7).minor(), 700);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1250).to_string(), "12.50");
        assert_eq!(Money::from_minor(-505).to_string(), "-5.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_exact_decimal() {
        assert_eq!("12.5".parse::<Money>().unwrap().minor(), 1250);
        assert_eq!("12.50".parse::<Money>().unwrap().minor(), 1250);
        assert_eq!("-3.05".parse::<Money>().unwrap().minor(), -305);
        assert_eq!("7".parse::<Money>().unwrap().minor(), 700);
        assert_eq!(".5".parse::<Money>().unwrap().minor(), 50);

        assert!("12.345".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn test_deserialize_from_wire_numbers() {
        let m: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(m.minor(), 1250);

        let m: Money = serde_json::from_str("85").unwrap();
        assert_eq!(m.minor(), 8500);

        let m: Money = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(m.minor(), 1999);

        // 0.1 + 0.2 style floats land on the nearest centime
        let m: Money = serde_json::from_str("0.30000000000000004").unwrap();
        assert_eq!(m.minor(), 30);

        assert!(serde_json::from_str::<Money>("true").is_err());
    }

    #[test]
    fn test_serialize_to_major_units() {
        assert_eq!(serde_json::to_string(&Money::from_minor(1250)).unwrap(), "12.5");
        assert_eq!(serde_json::to_string(&Money::from_minor(8500)).unwrap(), "85");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(250);
        assert_eq!((a + b).minor(), 1250);
        assert_eq!((a - b).minor(), 750);
        assert_eq!((b * 3).minor(), 750);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.minor(), 1500);
    }

    #[test]
    fn test_multiply_quantity_saturates() {
        let huge = Money::from_minor(i64::MAX / 2 + 1);
        assert_eq!(huge.multiply_quantity(2).minor(), i64::MAX);
        assert_eq!((huge * 3).minor(), i64::MAX);

        let refund = Money::from_minor(i64::MIN / 2 - 1);
        assert_eq!(refund.multiply_quantity(2).minor(), i64::MIN);

        assert_eq!(Money::from_minor(8500).multiply_quantity(3).minor(), 25500);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Money::from_major_f64(f64::NAN).is_err());
        assert!(Money::from_major_f64(f64::INFINITY).is_err());
    }
}
