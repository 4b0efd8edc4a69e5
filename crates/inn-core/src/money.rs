//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A bill of 0.10 + 0.20 paid with 0.30:                                  │
//! │    0.1 + 0.2 = 0.30000000000000004  → paid < total → "underpaid" ❌     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10 + 20 = 30 cents, paid 30 cents → fully paid ✅                    │
//! │                                                                         │
//! │  Floats only exist at the JSON boundary (see [`major_units`]).          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inn_core::money::Money;
//!
//! let base = Money::from_major(500);          // 500.00
//! let extra = Money::from_cents(10_050);      // 100.50
//! let total = base + extra * 2;               // 701.00
//! assert_eq!(total.cents(), 70_100);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts and differences can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent in SQLite**: stored as an INTEGER `*_cents` column
///
/// ## Where Money is Used
/// ```text
/// Room.base_price ──► Tariff::charge ──► Bill.room_charge ─┐
/// Service.price × qty ──► ServiceLineItem.total_price ─────┼─► Bill.total_amount
/// Bill.discount ───────────────────────────────────────────┘        │
///                                                                   ▼
///                               Payment.amount ──► Bill.paid_amount (≤ total)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use inn_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use inn_core::money::Money;
    ///
    /// let laundry = Money::from_major(150);
    /// assert_eq!(laundry.multiply_quantity(2), Money::from_major(300));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use inn_core::money::Money;
    ///
    /// let night = Money::from_major(100);
    /// assert_eq!(night.checked_multiply_quantity(3), Some(Money::from_major(300)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Converts to a floating point amount in major units.
    ///
    /// Display/JSON only. Never compare the result.
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Converts a floating point amount in major units to cents, rounding to
    /// the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use inn_core::money::Money;
    ///
    /// // 0.1 + 0.2 is 0.30000000000000004 as f64, still exactly 30 cents
    /// assert_eq!(Money::from_major_f64(0.1 + 0.2).unwrap().cents(), 30);
    /// ```
    pub fn from_major_f64(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        let cents = (amount * 100.0).round();
        if cents.abs() > i64::MAX as f64 / 2.0 {
            return Err(ValidationError::OutOfRange {
                field: "amount".to_string(),
                min: i64::MIN / 200,
                max: i64::MAX / 200,
            });
        }

        Ok(Money(cents as i64))
    }

    /// Parses a decimal string such as `"700"`, `"12.5"` or `"-3.05"`.
    ///
    /// At most two fractional digits are accepted.
    pub fn parse_decimal(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = input.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must be a decimal number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a decimal number"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("must be a decimal number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("must be a decimal number"))?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `700.00`. Currency symbols are the front end's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// JSON Boundary
// =============================================================================

/// Serde adapter that exchanges [`Money`] as a decimal amount in major units.
///
/// The desk front end sends and expects `"total_amount": 1000.5`, while
/// everything behind the boundary works in cents.
///
/// ```rust
/// use inn_core::money::{major_units, Money};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Line {
///     #[serde(with = "major_units")]
///     price: Money,
/// }
///
/// let line: Line = serde_json::from_str(r#"{"price": 150.25}"#).unwrap();
/// assert_eq!(line.price.cents(), 15025);
///
/// let line: Line = serde_json::from_str(r#"{"price": "99.9"}"#).unwrap();
/// assert_eq!(line.price.cents(), 9990);
/// ```
pub mod major_units {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use super::Money;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_major_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }

    struct MoneyVisitor;

    impl<'de> Visitor<'de> for MoneyVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal amount as number or string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
            v.checked_mul(100)
                .map(Money::from_cents)
                .ok_or_else(|| E::custom("amount too large"))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
            let v = i64::try_from(v).map_err(|_| E::custom("amount too large"))?;
            self.visit_i64(v)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
            Money::from_major_f64(v).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
            Money::parse_decimal(v).map_err(E::custom)
        }
    }

    /// Same adapter for optional fields (`null` or absent → `None`).
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        use super::super::Money;

        pub fn serialize<S: Serializer>(
            value: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(m) => serializer.serialize_some(&m.to_major_f64()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] Money);

            let value: Option<Wrapper> = Option::deserialize(deserializer)?;
            Ok(value.map(|Wrapper(m)| m))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
        assert_eq!(Money::from_major(700).cents(), 70_000);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_major(150);
        assert_eq!(price.checked_add(price), Some(Money::from_major(300)));
        assert_eq!(price.checked_multiply_quantity(4), Some(Money::from_major(600)));

        let huge = Money::from_cents(i64::MAX - 1);
        assert_eq!(huge.checked_add(Money::from_cents(2)), None);
        assert_eq!(huge.checked_multiply_quantity(2), None);
        assert_eq!(price.checked_multiply_quantity(i64::MAX), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_major(700).to_string(), "700.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(100);
        assert_eq!(c.cents(), 1400);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }

    #[test]
    fn test_float_boundary_rounds_to_cent() {
        assert_eq!(Money::from_major_f64(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(Money::from_major_f64(999.995).unwrap().cents(), 100_000);
        assert_eq!(Money::from_major_f64(1000.0).unwrap(), Money::from_major(1000));
        assert!(Money::from_major_f64(f64::NAN).is_err());
        assert!(Money::from_major_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("700").unwrap().cents(), 70_000);
        assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal("12.05").unwrap().cents(), 1205);
        assert_eq!(Money::parse_decimal(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse_decimal("-3.05").unwrap().cents(), -305);
        assert_eq!(Money::parse_decimal(" 1 ").unwrap().cents(), 100);

        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal("1.234").is_err());
        assert!(Money::parse_decimal("1.2.3").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Priced {
        #[serde(with = "major_units")]
        price: Money,
        #[serde(default, with = "major_units::option")]
        tip: Option<Money>,
    }

    #[test]
    fn test_major_units_json() {
        let p: Priced = serde_json::from_str(r#"{"price": 700}"#).unwrap();
        assert_eq!(p.price, Money::from_major(700));
        assert_eq!(p.tip, None);

        let p: Priced = serde_json::from_str(r#"{"price": 0.3, "tip": "1.5"}"#).unwrap();
        assert_eq!(p.price.cents(), 30);
        assert_eq!(p.tip, Some(Money::from_cents(150)));

        let p: Priced = serde_json::from_str(r#"{"price": 1, "tip": null}"#).unwrap();
        assert_eq!(p.tip, None);

        let json = serde_json::to_value(Priced {
            price: Money::from_cents(100_050),
            tip: None,
        })
        .unwrap();
        assert_eq!(json["price"], serde_json::json!(1000.5));
        assert!(json["tip"].is_null());

        assert!(serde_json::from_str::<Priced>(r#"{"price": "x"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": true}"#).is_err());
    }
}
