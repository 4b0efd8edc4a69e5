//! # Inn Desk API
//!
//! HTTP/JSON server for the inn front desk.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Inn Desk API                                   │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Session gate  │  │  Front desk    │  │  Back office               ││
//! │  │                │  │                │  │                            ││
//! │  │ • login        │  │ • bookings     │  │ • rooms / services         ││
//! │  │ • Bearer JWT   │  │ • add service  │  │ • guests                   ││
//! │  │ • 403 gate     │  │ • cashier/pay  │  │ • inventory                ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │   inn-db     │  │  Lifecycle   │  │    JWT sessions          ││  │
//! │  │  │              │  │  policies    │  │                          ││  │
//! │  │  │ SQLite (WAL) │  │ cancellation │  │ (user, branch, role)     ││  │
//! │  │  │ repositories │  │ service gate │  │                          ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the environment variables.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use inn_core::LifecyclePolicy;
use inn_db::{Database, Lifecycle};

// Re-exports
pub use auth::{JwtManager, Session};
pub use config::InnConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub policy: LifecyclePolicy,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtManager, policy: LifecyclePolicy) -> Self {
        AppState {
            db,
            jwt: Arc::new(jwt),
            policy,
        }
    }

    /// Booking/billing operations under this server's policies.
    pub fn lifecycle(&self) -> Lifecycle {
        self.db.lifecycle(self.policy)
    }
}
