//! # Pricing Module
//!
//! Time-based room charge.
//!
//! ## Tariff Shape
//! ```text
//! charge
//!   ▲
//!   │                                   ╱  extra_hour_price per hour
//!   │                                 ╱
//!   │                               ╱
//!   │ ─────────────────────────────●  base_price covers min_hours
//!   │
//!   └──────────────────────────────┼──────────────────────► expected_hours
//!                              min_hours
//! ```
//!
//! `charge = base_price + max(0, expected_hours − min_hours) × extra_hour_price`
//!
//! The same function seeds a new bill's room charge at check-in and
//! re-prices it when the booking is completed (hours may have been extended).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Room;

/// A room's pricing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tariff {
    /// Flat price covering the first `min_hours`.
    pub base_price: Money,

    /// Hours included in the base price.
    pub min_hours: i64,

    /// Price of each hour beyond `min_hours`.
    pub extra_hour_price: Money,
}

impl Tariff {
    /// Computes the room charge for a stay of `expected_hours`.
    ///
    /// ## Example
    /// ```rust
    /// use inn_core::{Money, Tariff};
    ///
    /// let tariff = Tariff {
    ///     base_price: Money::from_major(500),
    ///     min_hours: 4,
    ///     extra_hour_price: Money::from_major(100),
    /// };
    ///
    /// assert_eq!(tariff.charge(3).unwrap(), Money::from_major(500)); // short stay, base only
    /// assert_eq!(tariff.charge(4).unwrap(), Money::from_major(500));
    /// assert_eq!(tariff.charge(6).unwrap(), Money::from_major(700));
    /// ```
    ///
    /// ## Errors
    /// `ValidationError::Overflow` if the charge does not fit in i64 cents.
    pub fn charge(&self, expected_hours: i64) -> CoreResult<Money> {
        let extra_hours = expected_hours.saturating_sub(self.min_hours).max(0);
        self.extra_hour_price
            .checked_multiply_quantity(extra_hours)
            .and_then(|extra| self.base_price.checked_add(extra))
            .ok_or_else(|| {
                ValidationError::Overflow {
                    field: "room_charge".to_string(),
                }
                .into()
            })
    }
}

impl From<&Room> for Tariff {
    fn from(room: &Room) -> Self {
        Tariff {
            base_price: room.base_price,
            min_hours: room.min_hours,
            extra_hour_price: room.extra_hour_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn standard() -> Tariff {
        Tariff {
            base_price: Money::from_major(500),
            min_hours: 4,
            extra_hour_price: Money::from_major(100),
        }
    }

    #[test]
    fn test_base_price_covers_min_hours() {
        let t = standard();
        assert_eq!(t.charge(1).unwrap(), Money::from_major(500));
        assert_eq!(t.charge(4).unwrap(), Money::from_major(500));
    }

    #[test]
    fn test_extra_hours_are_charged() {
        let t = standard();
        assert_eq!(t.charge(5).unwrap(), Money::from_major(600));
        assert_eq!(t.charge(6).unwrap(), Money::from_major(700));
        assert_eq!(t.charge(24).unwrap(), Money::from_major(2500));
    }

    #[test]
    fn test_cent_precision() {
        let t = Tariff {
            base_price: Money::from_cents(49_999),
            min_hours: 2,
            extra_hour_price: Money::from_cents(1_005),
        };
        assert_eq!(t.charge(5).unwrap().cents(), 49_999 + 3 * 1_005);
    }

    #[test]
    fn test_zero_min_hours() {
        let t = Tariff {
            base_price: Money::zero(),
            min_hours: 0,
            extra_hour_price: Money::from_major(80),
        };
        assert_eq!(t.charge(3).unwrap(), Money::from_major(240));
    }

    #[test]
    fn test_charge_overflow_is_an_error() {
        let t = Tariff {
            base_price: Money::from_major(500),
            min_hours: 0,
            extra_hour_price: Money::from_cents(i64::MAX / 2),
        };
        assert!(matches!(
            t.charge(720),
            Err(CoreError::Validation(ValidationError::Overflow { .. }))
        ));

        let t = Tariff {
            base_price: Money::from_cents(i64::MAX),
            min_hours: 4,
            extra_hour_price: Money::from_cents(1),
        };
        assert!(t.charge(4).is_ok());
        assert!(t.charge(5).is_err());
    }
}
