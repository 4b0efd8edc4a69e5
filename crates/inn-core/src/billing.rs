//! # Billing Module
//!
//! Bill arithmetic and payment evaluation.
//!
//! ## Bill Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   total_amount = room_charge + services_charge − discount   (always)    │
//! │   0 ≤ paid_amount ≤ total_amount                            (always)    │
//! │                                                                         │
//! │   create booking ──► room_charge = tariff.charge(hours)                 │
//! │   add service    ──► services_charge += qty × price                     │
//! │   complete       ──► room_charge = tariff.charge(final hours)           │
//! │   pay            ──► paid_amount += amount   (rejected if > total)      │
//! │   paid ≥ total   ──► BillFullyPaid                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure; inn-db applies the results inside a
//! transaction.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Bill;

// =============================================================================
// Bill Totals
// =============================================================================

/// The charge components of a bill. `total` is always derived, never stored
/// independently of its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillTotals {
    pub room_charge: Money,
    pub services_charge: Money,
    pub discount: Money,
}

impl BillTotals {
    /// Totals of a freshly opened bill: room charge only.
    pub fn opening(room_charge: Money) -> Self {
        BillTotals {
            room_charge,
            services_charge: Money::zero(),
            discount: Money::zero(),
        }
    }

    /// Reads the stored components of a bill.
    pub fn of(bill: &Bill) -> Self {
        BillTotals {
            room_charge: bill.room_charge,
            services_charge: bill.services_charge,
            discount: bill.discount,
        }
    }

    /// `room_charge + services_charge − discount`
    #[inline]
    pub fn total(&self) -> Money {
        self.room_charge + self.services_charge - self.discount
    }

    /// Adds a service line subtotal.
    pub fn with_service(self, subtotal: Money) -> Self {
        BillTotals {
            services_charge: self.services_charge + subtotal,
            ..self
        }
    }

    /// Replaces the room charge (re-pricing on completion).
    pub fn with_room_charge(self, room_charge: Money) -> Self {
        BillTotals {
            room_charge,
            ..self
        }
    }

    /// Raises the discount so the total equals what has already been paid.
    ///
    /// Used to void the outstanding balance of a cancelled booking. A bill
    /// that is already settled is returned unchanged.
    pub fn written_off_to(self, paid: Money) -> Self {
        let outstanding = self.total() - paid;
        if !outstanding.is_positive() {
            return self;
        }
        BillTotals {
            discount: self.discount + outstanding,
            ..self
        }
    }

    /// Checks that `paid` still fits inside these totals.
    pub fn ensure_covers(&self, paid: Money) -> CoreResult<()> {
        let total = self.total();
        if paid.is_negative() || paid > total {
            return Err(CoreError::PaidExceedsTotal { paid, total });
        }
        Ok(())
    }
}

// =============================================================================
// Payment Evaluation
// =============================================================================

/// Outcome of applying a payment to a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PaymentDecision {
    /// Payment fits. `fully_paid` raises the BillFullyPaid event.
    Accepted { new_paid: Money, fully_paid: bool },

    /// Payment would push paid_amount past total_amount.
    Overpayment {
        current_paid: Money,
        attempted_amount: Money,
        resulting_paid: Money,
        total_amount: Money,
    },
}

impl PaymentDecision {
    /// Evaluates paying `amount` against a bill with `paid` of `total`.
    ///
    /// ## Example
    /// ```rust
    /// use inn_core::{Money, PaymentDecision};
    ///
    /// let total = Money::from_major(1000);
    ///
    /// let d = PaymentDecision::evaluate(Money::zero(), total, Money::from_major(1000)).unwrap();
    /// assert_eq!(d, PaymentDecision::Accepted { new_paid: total, fully_paid: true });
    ///
    /// let d = PaymentDecision::evaluate(total, total, Money::from_major(1)).unwrap();
    /// assert!(matches!(d, PaymentDecision::Overpayment { .. }));
    /// ```
    ///
    /// ## Errors
    /// `ValidationError::Overflow` if `paid + amount` does not fit in i64 cents.
    pub fn evaluate(paid: Money, total: Money, amount: Money) -> CoreResult<Self> {
        let new_paid = paid
            .checked_add(amount)
            .ok_or_else(|| ValidationError::Overflow {
                field: "amount_paid".to_string(),
            })?;

        if new_paid > total {
            return Ok(PaymentDecision::Overpayment {
                current_paid: paid,
                attempted_amount: amount,
                resulting_paid: new_paid,
                total_amount: total,
            });
        }

        Ok(PaymentDecision::Accepted {
            new_paid,
            fully_paid: new_paid >= total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_derived() {
        let t = BillTotals::opening(Money::from_major(700));
        assert_eq!(t.total(), Money::from_major(700));

        let t = t.with_service(Money::from_major(300));
        assert_eq!(t.services_charge, Money::from_major(300));
        assert_eq!(t.total(), Money::from_major(1000));

        let t = BillTotals {
            discount: Money::from_major(50),
            ..t
        };
        assert_eq!(t.total(), Money::from_major(950));
    }

    #[test]
    fn test_services_accumulate() {
        let t = BillTotals::opening(Money::from_major(500))
            .with_service(Money::from_major(150))
            .with_service(Money::from_cents(2_550));
        assert_eq!(t.services_charge.cents(), 15_000 + 2_550);
        assert_eq!(t.total().cents(), 50_000 + 15_000 + 2_550);
    }

    #[test]
    fn test_reprice_keeps_services_and_discount() {
        let t = BillTotals {
            room_charge: Money::from_major(500),
            services_charge: Money::from_major(300),
            discount: Money::from_major(100),
        }
        .with_room_charge(Money::from_major(900));
        assert_eq!(t.total(), Money::from_major(1100));
    }

    #[test]
    fn test_write_off() {
        let t = BillTotals::opening(Money::from_major(700));
        let voided = t.written_off_to(Money::from_major(200));
        assert_eq!(voided.discount, Money::from_major(500));
        assert_eq!(voided.total(), Money::from_major(200));

        // already settled: untouched
        assert_eq!(t.written_off_to(Money::from_major(700)), t);
    }

    #[test]
    fn test_ensure_covers() {
        let t = BillTotals::opening(Money::from_major(700));
        assert!(t.ensure_covers(Money::zero()).is_ok());
        assert!(t.ensure_covers(Money::from_major(700)).is_ok());
        assert!(matches!(
            t.ensure_covers(Money::from_cents(70_001)),
            Err(CoreError::PaidExceedsTotal { .. })
        ));
    }

    #[test]
    fn test_partial_payment() {
        let d = PaymentDecision::evaluate(
            Money::zero(),
            Money::from_major(1000),
            Money::from_major(400),
        )
        .unwrap();
        assert_eq!(
            d,
            PaymentDecision::Accepted {
                new_paid: Money::from_major(400),
                fully_paid: false
            }
        );
    }

    #[test]
    fn test_exact_payment_completes() {
        let d = PaymentDecision::evaluate(
            Money::from_major(400),
            Money::from_major(1000),
            Money::from_major(600),
        )
        .unwrap();
        assert_eq!(
            d,
            PaymentDecision::Accepted {
                new_paid: Money::from_major(1000),
                fully_paid: true
            }
        );
    }

    #[test]
    fn test_overpayment_reports_amounts() {
        let d = PaymentDecision::evaluate(
            Money::from_major(1000),
            Money::from_major(1000),
            Money::from_major(1),
        )
        .unwrap();
        assert_eq!(
            d,
            PaymentDecision::Overpayment {
                current_paid: Money::from_major(1000),
                attempted_amount: Money::from_major(1),
                resulting_paid: Money::from_major(1001),
                total_amount: Money::from_major(1000),
            }
        );
    }

    #[test]
    fn test_float_sums_do_not_underpay() {
        // 0.10 + 0.20 against a 0.30 bill
        let total = Money::from_major_f64(0.3).unwrap();
        let first = Money::from_major_f64(0.1).unwrap();
        let second = Money::from_major_f64(0.2).unwrap();

        let d = PaymentDecision::evaluate(Money::zero(), total, first).unwrap();
        let PaymentDecision::Accepted { new_paid, .. } = d else {
            panic!("first payment rejected");
        };
        let d = PaymentDecision::evaluate(new_paid, total, second).unwrap();
        assert_eq!(
            d,
            PaymentDecision::Accepted {
                new_paid: total,
                fully_paid: true
            }
        );
    }

    #[test]
    fn test_payment_overflow_is_an_error() {
        let d = PaymentDecision::evaluate(
            Money::from_cents(i64::MAX - 10),
            Money::from_cents(i64::MAX),
            Money::from_cents(11),
        );
        assert!(matches!(
            d,
            Err(CoreError::Validation(ValidationError::Overflow { .. }))
        ));
    }
}
