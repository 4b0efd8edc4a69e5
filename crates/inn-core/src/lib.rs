//! # inn-core: Pure Business Logic for Inn Desk
//!
//! This crate is the **heart** of Inn Desk. It contains the booking and
//! billing rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inn Desk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front Desk (browser)                         │   │
//! │  │    Rooms ──► Guests ──► Bookings ──► Services ──► Cashier       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    inn-api (axum)                               │   │
//! │  │    session gate, request DTOs, status codes                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ inn-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  billing  │  │ validation│  │   │
//! │  │   │   Room    │  │   Money   │  │ BillTotals│  │   rules   │  │   │
//! │  │   │  Booking  │  │  pricing  │  │  Payment  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    inn-db (SQLite)                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Room, Booking, Bill, AuditEntry, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Room charge tariff
//! - [`billing`] - Bill totals and payment evaluation
//! - [`policy`] - Configurable lifecycle policies
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use inn_core::money::Money;
//! use inn_core::pricing::Tariff;
//!
//! let tariff = Tariff {
//!     base_price: Money::from_major(500),
//!     min_hours: 4,
//!     extra_hour_price: Money::from_major(100),
//! };
//!
//! // 6 hours on a 4-hour base: 500 + 2 × 100
//! assert_eq!(tariff.charge(6), Money::from_major(700));
//! ```

pub mod billing;
pub mod error;
pub mod money;
pub mod policy;
pub mod pricing;
pub mod types;
pub mod validation;

// These allow users to do `use inn_core::Money` instead of
// `use inn_core::money::Money`

pub use billing::{BillTotals, PaymentDecision};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use policy::{CancellationPolicy, LifecyclePolicy, ServiceAttachPolicy};
pub use pricing::Tariff;
pub use types::*;

/// Maximum quantity of a single service line.
///
/// Guards against typing 1000 instead of 10 at the desk.
pub const MAX_SERVICE_QUANTITY: i64 = 999;

/// Longest stay a single booking can be opened for, in hours (30 days).
pub const MAX_EXPECTED_HOURS: i64 = 720;

/// Ceiling for any catalogue price and for a single payment (10,000,000.00).
///
/// Keeps `price × MAX_EXPECTED_HOURS` and `price × MAX_SERVICE_QUANTITY`
/// far inside i64 cents.
pub const MAX_PRICE: Money = Money::from_major(10_000_000);
