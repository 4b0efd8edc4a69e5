//! # Error Types
//!
//! Domain-specific error types for inn-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inn-core errors (this file)                                            │
//! │  ├── CoreError        - Not found / invariant violations                │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  inn-db errors (separate crate)                                         │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  inn-api errors (in app)                                                │
//! │  └── ApiError         - What the desk sees: status + {"error": ...}     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Front desk    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The message of a variant is exactly what the desk shows
//! 3. Errors are enum variants, never String
//! 4. Every variant is final: nothing here is retried

use thiserror::Error;

use crate::money::Money;
use crate::types::{BookingStatus, RoomStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    // -------------------------------------------------------------------------
    // Not found (all lookups are scoped to the caller's branch)
    // -------------------------------------------------------------------------
    #[error("Room not found")]
    RoomNotFound(i64),

    #[error("Booking not found")]
    BookingNotFound(i64),

    #[error("Bill not found")]
    BillNotFound(i64),

    #[error("Service not found")]
    ServiceNotFound(i64),

    #[error("Guest not found")]
    GuestNotFound(i64),

    #[error("Inventory item not found")]
    InventoryItemNotFound(i64),

    #[error("Inventory category not found")]
    InventoryCategoryNotFound(i64),

    // -------------------------------------------------------------------------
    // Invariant violations
    // -------------------------------------------------------------------------
    /// Room is not `available`.
    ///
    /// ## User Workflow
    /// ```text
    /// Desk picks room 101 ──► room.status = occupied
    ///      │
    ///      ▼
    /// RoomUnavailable { room_id: 1, status: Occupied }
    ///      │
    ///      ▼
    /// "Room is currently occupied and cannot be booked."
    /// ```
    #[error("Room is currently {status} and cannot be booked.")]
    RoomUnavailable { room_id: i64, status: RoomStatus },

    /// Another booking already holds the room.
    #[error("Room is already occupied by another ongoing booking.")]
    RoomConflict { room_id: i64 },

    /// Payment would push paid_amount past total_amount.
    #[error("Payment exceeds total amount")]
    OverpaymentRejected {
        current_paid: Money,
        attempted_amount: Money,
        resulting_paid: Money,
        total_amount: Money,
    },

    /// Payments stop once the booking is completed.
    #[error("Booking already completed. No further payments allowed.")]
    BookingAlreadyCompleted { booking_id: i64 },

    /// Booking is completed or cancelled and cannot change any more.
    #[error("Booking is already {status} and can no longer be changed.")]
    BookingClosed {
        booking_id: i64,
        status: BookingStatus,
    },

    /// A re-priced bill would fall below what was already collected.
    #[error("Bill total {total} would be below the paid amount {paid}")]
    PaidExceedsTotal { paid: Money, total: Money },

    // -------------------------------------------------------------------------
    // Malformed requests
    // -------------------------------------------------------------------------
    /// Required request fields are absent.
    #[error("{0}")]
    MissingFields(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for the NotFound family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::RoomNotFound(_)
                | CoreError::BookingNotFound(_)
                | CoreError::BillNotFound(_)
                | CoreError::ServiceNotFound(_)
                | CoreError::GuestNotFound(_)
                | CoreError::InventoryItemNotFound(_)
                | CoreError::InventoryCategoryNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Arithmetic on an amount left the representable range.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// Invalid format (e.g. a malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g. a room number already used in the branch).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desk_messages() {
        let err = CoreError::RoomUnavailable {
            room_id: 1,
            status: RoomStatus::Occupied,
        };
        assert_eq!(
            err.to_string(),
            "Room is currently occupied and cannot be booked."
        );

        let err = CoreError::BookingAlreadyCompleted { booking_id: 3 };
        assert_eq!(
            err.to_string(),
            "Booking already completed. No further payments allowed."
        );

        let err = CoreError::OverpaymentRejected {
            current_paid: Money::from_major(1000),
            attempted_amount: Money::from_major(1),
            resulting_paid: Money::from_major(1001),
            total_amount: Money::from_major(1000),
        };
        assert_eq!(err.to_string(), "Payment exceeds total amount");

        let err = CoreError::BookingClosed {
            booking_id: 3,
            status: BookingStatus::Cancelled,
        };
        assert_eq!(
            err.to_string(),
            "Booking is already cancelled and can no longer be changed."
        );
    }

    #[test]
    fn test_not_found_family() {
        assert!(CoreError::RoomNotFound(1).is_not_found());
        assert!(CoreError::BillNotFound(1).is_not_found());
        assert!(!CoreError::RoomConflict { room_id: 1 }.is_not_found());
        assert_eq!(CoreError::ServiceNotFound(9).to_string(), "Service not found");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "room_number".to_string(),
        };
        assert_eq!(err.to_string(), "room_number is required");

        let err = ValidationError::MustBePositive {
            field: "qty".to_string(),
        };
        assert_eq!(err.to_string(), "qty must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "full_name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
