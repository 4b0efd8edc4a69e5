//! # Repository Module
//!
//! Database repository implementations for Inn Desk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  axum handler                                                           │
//! │       │                                                                 │
//! │       │  db.rooms().list(session.branch_id)                             │
//! │       ▼                                                                 │
//! │  RoomRepository / GuestRepository / ServiceRepository / ...             │
//! │  ├── list(branch_id)             reads, always branch scoped            │
//! │  ├── get_by_id(branch_id, id)                                           │
//! │  └── create / update(session)    write + audit in one transaction       │
//! │       │                                                                 │
//! │       │  pub(crate) find(conn, ..) helpers                              │
//! │       ▼                                                                 │
//! │  crate::lifecycle  (bookings, bills, service lines, payments)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`RoomRepository`] - Room CRUD
//! - [`GuestRepository`] - Guest CRUD
//! - [`ServiceRepository`] - Service catalog and booking service lines
//! - [`BookingRepository`] - Booking reads
//! - [`BillRepository`] - Bill reads and the shared totals writer
//! - [`InventoryRepository`] - Stock items, categories, movement log
//! - [`AuditRepository`] - Append-only audit log
//! - [`UserRepository`] - Branches, desk users, login

pub mod audit;
pub mod bill;
pub mod booking;
pub mod guest;
pub mod inventory;
pub mod room;
pub mod service;
pub mod user;

pub use audit::{AuditRecord, AuditRepository};
pub use bill::BillRepository;
pub use booking::BookingRepository;
pub use guest::GuestRepository;
pub use inventory::{InventoryRepository, Saved};
pub use room::RoomRepository;
pub use service::ServiceRepository;
pub use user::UserRepository;
