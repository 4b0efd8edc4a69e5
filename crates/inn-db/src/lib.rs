//! # inn-db: Database Layer for Inn Desk
//!
//! This crate provides database access for the Inn Desk front-desk backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inn Desk Data Flow                               │
//! │                                                                         │
//! │  axum handler (POST /api/bookings)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     inn-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Lifecycle   │   │   │
//! │  │   │   (pool.rs)   │    │  (rooms, ...) │    │ (bookings,   │   │   │
//! │  │   │               │    │               │    │  bills, pay) │   │   │
//! │  │   │ SqlitePool    │◄───│ RoomRepo      │◄───│ create       │   │   │
//! │  │   │ WAL, FKs      │    │ GuestRepo     │    │ update       │   │   │
//! │  │   │ Migrations    │    │ AuditRepo ... │    │ add_service  │   │   │
//! │  │   └───────────────┘    └───────────────┘    │ pay          │   │   │
//! │  │                                             └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (inn.db)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Per-aggregate repositories (rooms, guests, ...)
//! - [`lifecycle`] - Booking/bill/payment operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inn_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("inn.db")).await?;
//!
//! let rooms = db.rooms().list(session.branch_id).await?;
//! let booking_id = db
//!     .lifecycle(policy)
//!     .create_booking(&session, room_id, guest_id, 6)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use lifecycle::{Lifecycle, LifecycleEvent, PaymentReceipt};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::{
    AuditRepository, BillRepository, BookingRepository, GuestRepository, InventoryRepository,
    RoomRepository, Saved, ServiceRepository, UserRepository,
};

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{Database, DbConfig};
    use inn_core::{GuestInput, Money, RoomInput, RoomStatus, ServiceInput, SessionContext};

    /// Fresh in-memory database with one branch and one desk user.
    pub async fn setup() -> (Database, SessionContext) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let branch_id = db.users().create_branch("Main").await.unwrap();
        let user = db
            .users()
            .create_user(branch_id, "desk", "desk-password", "staff")
            .await
            .unwrap();

        let session = SessionContext {
            user_id: user.id,
            branch_id,
            role: user.role,
        };
        (db, session)
    }

    pub async fn add_room(
        db: &Database,
        session: &SessionContext,
        number: &str,
        base: i64,
        min_hours: i64,
        extra: i64,
    ) -> i64 {
        let input = RoomInput {
            room_number: number.to_string(),
            room_type: "Standard".to_string(),
            status: RoomStatus::Available,
            min_hours,
            base_price: Money::from_major(base),
            extra_hour_price: Money::from_major(extra),
            capacity: 2,
        };
        db.rooms().create(session, &input).await.unwrap()
    }

    pub async fn add_guest(db: &Database, session: &SessionContext, name: &str) -> i64 {
        let input = GuestInput {
            full_name: name.to_string(),
            phone: None,
            email: None,
        };
        db.guests().create(session, &input).await.unwrap()
    }

    pub async fn add_service(db: &Database, session: &SessionContext, name: &str, price: i64) -> i64 {
        let input = ServiceInput {
            name: name.to_string(),
            price: Money::from_major(price),
        };
        db.services().create(session, &input).await.unwrap()
    }
}
