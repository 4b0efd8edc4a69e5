//! # Validation Module
//!
//! Input validation utilities for Inn Desk.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front desk (browser)                                          │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: inn-api (axum)                                                │
//! │  ├── Type validation (JSON deserialization)                             │
//! │  └── THIS MODULE: Business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE constraints (room numbers, one ongoing booking per room)    │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inn_core::validation::{validate_expected_hours, validate_service_quantity};
//!
//! assert!(validate_expected_hours(6).is_ok());
//! assert!(validate_service_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{GuestInput, InventoryItemInput, RoomInput, ServiceInput};
use crate::{MAX_EXPECTED_HOURS, MAX_PRICE, MAX_SERVICE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most `max` characters
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an optional email address. Absent or blank is fine.
///
/// ## Example
/// ```rust
/// use inn_core::validation::validate_email;
///
/// assert!(validate_email(Some("ana@example.com")).is_ok());
/// assert!(validate_email(None).is_ok());
/// assert!(validate_email(Some("ana.example.com")).is_err());
/// ```
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(());
    };

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the planned length of a stay.
///
/// ## Rules
/// - Must be positive
/// - Must not exceed MAX_EXPECTED_HOURS (720, thirty days)
pub fn validate_expected_hours(hours: i64) -> ValidationResult<()> {
    if hours <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "expected_hours".to_string(),
        });
    }

    if hours > MAX_EXPECTED_HOURS {
        return Err(ValidationError::OutOfRange {
            field: "expected_hours".to_string(),
            min: 1,
            max: MAX_EXPECTED_HOURS,
        });
    }

    Ok(())
}

/// Validates the quantity of a service line.
///
/// ## Rules
/// - Must be positive (zero or negative quantities would reduce the bill)
/// - Must not exceed MAX_SERVICE_QUANTITY (999)
pub fn validate_service_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }

    if qty > MAX_SERVICE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "qty".to_string(),
            min: 1,
            max: MAX_SERVICE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a catalogue price.
///
/// ## Rules
/// - Zero is allowed (complimentary items)
/// - Must not exceed MAX_PRICE
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    if price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE.major(),
        });
    }

    Ok(())
}

/// Validates a payment amount. Must be strictly positive and at most
/// MAX_PRICE.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount_paid".to_string(),
        });
    }

    if amount > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "amount_paid".to_string(),
            min: 0,
            max: MAX_PRICE.major(),
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a room create/replace request.
pub fn validate_room_input(input: &RoomInput) -> ValidationResult<()> {
    validate_text("room_number", &input.room_number, 20)?;
    validate_text("room_type", &input.room_type, 50)?;

    if input.min_hours < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "min_hours".to_string(),
        });
    }

    validate_price("base_price", input.base_price)?;
    validate_price("extra_hour_price", input.extra_hour_price)?;

    if input.capacity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "capacity".to_string(),
        });
    }

    Ok(())
}

/// Validates a guest create/update request.
pub fn validate_guest_input(input: &GuestInput) -> ValidationResult<()> {
    validate_text("full_name", &input.full_name, 200)?;
    validate_email(input.email.as_deref())
}

/// Validates a service create/update request.
pub fn validate_service_input(input: &ServiceInput) -> ValidationResult<()> {
    validate_text("name", &input.name, 100)?;
    validate_price("price", input.price)
}

/// Validates an inventory item save request.
pub fn validate_item_input(input: &InventoryItemInput) -> ValidationResult<()> {
    validate_text("name", &input.name, 200)?;
    validate_text("unit", &input.unit, 20)?;

    if input.quantity < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoomStatus;

    fn room_input() -> RoomInput {
        RoomInput {
            room_number: "101".to_string(),
            room_type: "Deluxe".to_string(),
            status: RoomStatus::Available,
            min_hours: 4,
            base_price: Money::from_major(500),
            extra_hour_price: Money::from_major(100),
            capacity: 2,
        }
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("name", "Laundry", 100).is_ok());
        assert!(validate_text("name", "   ", 100).is_err());
        assert!(validate_text("name", &"A".repeat(101), 100).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(Some("")).is_ok());
        assert!(validate_email(Some("@example.com")).is_err());
        assert!(validate_email(Some("ana@localhost")).is_err());
    }

    #[test]
    fn test_validate_expected_hours() {
        assert!(validate_expected_hours(1).is_ok());
        assert!(validate_expected_hours(720).is_ok());
        assert!(validate_expected_hours(0).is_err());
        assert!(validate_expected_hours(-3).is_err());
        assert!(validate_expected_hours(721).is_err());
    }

    #[test]
    fn test_validate_service_quantity() {
        assert!(validate_service_quantity(2).is_ok());
        assert!(validate_service_quantity(999).is_ok());
        assert!(validate_service_quantity(0).is_err());
        assert!(validate_service_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_cents(-1)).is_err());
        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_major(-5)).is_err());
    }

    #[test]
    fn test_amounts_are_capped() {
        assert!(validate_price("price", MAX_PRICE).is_ok());
        assert!(matches!(
            validate_price("price", Money::from_cents(MAX_PRICE.cents() + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_price("price", Money::from_cents(i64::MAX)).is_err());

        assert!(validate_payment_amount(MAX_PRICE).is_ok());
        assert!(matches!(
            validate_payment_amount(Money::from_cents(i64::MAX)),
            Err(ValidationError::OutOfRange { .. })
        ));

        let mut r = room_input();
        r.extra_hour_price = Money::from_cents(i64::MAX / 2);
        assert!(validate_room_input(&r).is_err());
    }

    #[test]
    fn test_validate_room_input() {
        assert!(validate_room_input(&room_input()).is_ok());

        let mut r = room_input();
        r.capacity = 0;
        assert!(validate_room_input(&r).is_err());

        let mut r = room_input();
        r.base_price = Money::from_cents(-100);
        assert!(validate_room_input(&r).is_err());

        let mut r = room_input();
        r.room_number = String::new();
        assert!(matches!(
            validate_room_input(&r),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_item_input() {
        let item = InventoryItemInput {
            id: None,
            name: "Towel".to_string(),
            category_id: None,
            quantity: 10,
            unit: "pcs".to_string(),
            description: None,
        };
        assert!(validate_item_input(&item).is_ok());

        let negative = InventoryItemInput {
            quantity: -1,
            ..item
        };
        assert!(validate_item_input(&negative).is_err());
    }
}
