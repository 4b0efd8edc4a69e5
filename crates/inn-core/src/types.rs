//! # Domain Types
//!
//! Core domain types used throughout Inn Desk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Room       │   │     Booking     │   │      Bill       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  room_number    │◄──│  room_id        │◄──│  booking_id 1:1 │       │
//! │  │  status         │   │  guest_id       │   │  room_charge    │       │
//! │  │  base_price     │   │  expected_hours │   │  services_charge│       │
//! │  │  min_hours      │   │  status         │   │  discount       │       │
//! │  │  extra_hour_    │   │  check_in/out   │   │  total_amount   │       │
//! │  │    price        │   └────────▲────────┘   │  paid_amount    │       │
//! │  └─────────────────┘            │            └─────────────────┘       │
//! │                        ┌────────┴────────┐   ┌─────────────────┐       │
//! │                        │ ServiceLineItem │──►│     Service     │       │
//! │                        │  quantity       │   │  name, price    │       │
//! │                        │  total_price    │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  AuditEntry: append-only record of every mutation above                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity and Scope
//! Every entity has an integer `id` assigned by the store and (except
//! inventory categories, which are shared) a `branch_id`. Lookups are always
//! scoped by the caller's branch.
//!
//! ## Money on the Wire
//! Money fields are [`Money`] in memory, `*_cents` INTEGER columns in
//! SQLite, and decimal major units in JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{major_units, Money};

// =============================================================================
// Room
// =============================================================================

/// Occupancy state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Free to book.
    Available,
    /// Held by an ongoing booking.
    Occupied,
    /// Out of service.
    Maintenance,
}

impl Default for RoomStatus {
    fn default() -> Self {
        RoomStatus::Available
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        })
    }
}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Room {
    pub id: i64,
    pub branch_id: i64,

    /// Number on the door ("101").
    pub room_number: String,

    /// Free text ("Deluxe", "Twin", ...).
    pub room_type: String,

    pub status: RoomStatus,

    /// Hours covered by `base_price`.
    pub min_hours: i64,

    #[serde(with = "major_units")]
    #[ts(type = "number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "base_price_cents"))]
    pub base_price: Money,

    #[serde(with = "major_units")]
    #[ts(type = "number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "extra_hour_price_cents"))]
    pub extra_hour_price: Money,

    /// Maximum number of guests.
    pub capacity: i64,
}

impl Room {
    /// Checks if the room can take a new booking.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }
}

/// Fields the desk sends when creating or replacing a room.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomInput {
    pub room_number: String,
    pub room_type: String,
    #[serde(default)]
    pub status: RoomStatus,
    pub min_hours: i64,
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    pub base_price: Money,
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    pub extra_hour_price: Money,
    pub capacity: i64,
}

// =============================================================================
// Guest
// =============================================================================

/// A guest contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Guest {
    pub id: i64,
    pub branch_id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Fields the desk sends when creating or updating a guest.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuestInput {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Service Catalog
// =============================================================================

/// A billable add-on (laundry, breakfast, extra bed, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    pub id: i64,
    pub branch_id: i64,
    pub name: String,
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    pub price: Money,
}

/// Fields the desk sends when creating or updating a service.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceInput {
    pub name: String,
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    pub price: Money,
}

// =============================================================================
// Booking
// =============================================================================

/// The status of a booking.
///
/// ## Lifecycle
/// ```text
///              ┌──► Completed   (check_out set, room freed)
/// Ongoing ─────┤
///              └──► Cancelled   (room freed)
/// ```
/// Terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Ongoing,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Completed and cancelled bookings are closed for good.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Ongoing)
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Ongoing
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookingStatus::Ongoing => "ongoing",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        })
    }
}

/// A stay of one guest in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Booking {
    pub id: i64,
    pub branch_id: i64,
    pub room_id: i64,
    pub guest_id: i64,

    /// Desk user who opened the booking.
    pub user_id: i64,

    #[ts(as = "String")]
    pub check_in: DateTime<Utc>,

    pub expected_hours: i64,

    pub status: BookingStatus,

    /// Set only when the booking is completed.
    #[ts(as = "Option<String>")]
    pub check_out: Option<DateTime<Utc>>,
}

/// A booking joined with the guest's name and the room it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BookingDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub booking: Booking,

    /// Guest full name.
    pub guest: String,
    pub room_number: String,
    pub room_type: String,
}

// =============================================================================
// Bill
// =============================================================================

/// The ledger of one booking. Created with the booking, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Bill {
    pub id: i64,
    pub branch_id: i64,
    pub booking_id: i64,

    #[serde(with = "major_units")]
    #[ts(type = "number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "room_charge_cents"))]
    pub room_charge: Money,

    #[serde(with = "major_units")]
    #[ts(type = "number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "services_charge_cents"))]
    pub services_charge: Money,

    #[serde(with = "major_units")]
    #[ts(type = "number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "discount_cents"))]
    pub discount: Money,

    #[serde(with = "major_units")]
    #[ts(type = "number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "total_amount_cents"))]
    pub total_amount: Money,

    #[serde(with = "major_units")]
    #[ts(type = "number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "paid_amount_cents"))]
    pub paid_amount: Money,

    /// Method of the latest payment ("cash", "card", ...).
    pub payment_method: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Amount still owed.
    #[inline]
    pub fn balance(&self) -> Money {
        self.total_amount - self.paid_amount
    }

    /// Checks both ledger invariants.
    pub fn is_consistent(&self) -> bool {
        self.total_amount == self.room_charge + self.services_charge - self.discount
            && !self.paid_amount.is_negative()
            && self.paid_amount <= self.total_amount
    }
}

/// A bill as listed at the cashier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillSummary {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub bill: Bill,

    pub guest_name: String,
    pub room_number: String,
    pub booking_status: BookingStatus,
}

/// One service attached to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ServiceLineItem {
    pub id: i64,
    pub booking_id: i64,
    pub service_id: i64,
    pub quantity: i64,

    /// `quantity × service.price` at the time it was added.
    #[serde(with = "major_units")]
    #[ts(type = "number")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "total_price_cents"))]
    pub total_price: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Audit Log
// =============================================================================

/// Kind of mutation recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Insert,
    Update,
    Delete,
    /// A rejected payment attempt.
    FailedPayment,
}

/// One row of the append-only audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct AuditEntry {
    pub id: i64,

    /// Table the mutation touched ("bookings", "bills", ...).
    pub table_name: String,

    /// Row id; absent when the target never resolved (unknown bill).
    pub record_id: Option<i64>,

    pub action: AuditAction,
    pub user_id: i64,
    pub branch_id: i64,

    /// Free text or a JSON document describing the change.
    pub details: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Inventory
// =============================================================================

/// An inventory category. Categories are shared across branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Category save request. With `id` it updates, without it inserts.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryCategoryInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A stock item (towels, soap, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItem {
    pub id: i64,
    pub branch_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,

    /// Counting unit ("pcs", "box", ...).
    pub unit: String,
}

/// An item as listed, with its category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItemView {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub item: InventoryItem,

    pub category_name: Option<String>,
}

/// Item save request. With `id` it updates, without it inserts.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItemInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_unit() -> String {
    "pcs".to_string()
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InventoryAction {
    Add,
    Remove,
    /// Saved without a quantity change.
    Adjust,
}

impl InventoryAction {
    /// Classifies a stock change from `old` to `new`.
    pub fn for_change(old: i64, new: i64) -> Self {
        match new.cmp(&old) {
            std::cmp::Ordering::Greater => InventoryAction::Add,
            std::cmp::Ordering::Less => InventoryAction::Remove,
            std::cmp::Ordering::Equal => InventoryAction::Adjust,
        }
    }
}

/// One stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryTransaction {
    pub id: i64,
    pub item_id: i64,
    pub user_id: i64,
    pub branch_id: i64,
    pub action: InventoryAction,

    /// Absolute size of the movement.
    pub quantity: i64,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Users & Session
// =============================================================================

/// A desk user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub branch_id: i64,
    pub username: String,

    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,

    /// "admin", "staff", ...
    pub role: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// The authenticated principal of one request.
///
/// Every lifecycle operation takes one of these: it scopes all lookups to
/// `branch_id` and stamps `user_id` on audit entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionContext {
    pub user_id: i64,
    pub branch_id: i64,
    pub role: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(room: i64, services: i64, discount: i64, total: i64, paid: i64) -> Bill {
        Bill {
            id: 1,
            branch_id: 1,
            booking_id: 1,
            room_charge: Money::from_major(room),
            services_charge: Money::from_major(services),
            discount: Money::from_major(discount),
            total_amount: Money::from_major(total),
            paid_amount: Money::from_major(paid),
            payment_method: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(RoomStatus::default(), RoomStatus::Available);
        assert_eq!(BookingStatus::default(), BookingStatus::Ongoing);
    }

    #[test]
    fn test_booking_status_terminal() {
        assert!(!BookingStatus::Ongoing.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_json_names() {
        assert_eq!(
            serde_json::to_value(RoomStatus::Maintenance).unwrap(),
            serde_json::json!("maintenance")
        );
        assert_eq!(
            serde_json::to_value(AuditAction::FailedPayment).unwrap(),
            serde_json::json!("failed_payment")
        );
        let s: BookingStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(s, BookingStatus::Cancelled);
    }

    #[test]
    fn test_bill_consistency() {
        assert!(bill(700, 300, 0, 1000, 0).is_consistent());
        assert!(bill(700, 300, 100, 900, 900).is_consistent());
        assert!(!bill(700, 300, 0, 900, 0).is_consistent());
        assert!(!bill(700, 0, 0, 700, 701).is_consistent());
        assert_eq!(bill(700, 300, 0, 1000, 400).balance(), Money::from_major(600));
    }

    #[test]
    fn test_bill_json_uses_major_units() {
        let json = serde_json::to_value(bill(700, 300, 0, 1000, 0)).unwrap();
        assert_eq!(json["room_charge"], serde_json::json!(700.0));
        assert_eq!(json["total_amount"], serde_json::json!(1000.0));
    }

    #[test]
    fn test_inventory_action_for_change() {
        assert_eq!(InventoryAction::for_change(5, 8), InventoryAction::Add);
        assert_eq!(InventoryAction::for_change(5, 2), InventoryAction::Remove);
        assert_eq!(InventoryAction::for_change(5, 5), InventoryAction::Adjust);
    }

    #[test]
    fn test_item_input_defaults() {
        let input: InventoryItemInput = serde_json::from_str(r#"{"name": "Towel"}"#).unwrap();
        assert_eq!(input.unit, "pcs");
        assert_eq!(input.quantity, 0);
        assert!(input.id.is_none());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 1,
            branch_id: 1,
            username: "desk".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "staff".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
