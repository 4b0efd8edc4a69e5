//! Inn Desk API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable | Default |
//! |---|---|
//! | `INN_PORT` | `8080` |
//! | `INN_DB_PATH` | `inn.db` |
//! | `INN_DB_MAX_CONNECTIONS` | `5` |
//! | `JWT_SECRET` | development secret |
//! | `JWT_ACCESS_LIFETIME_SECS` | `43200` (one desk shift) |
//! | `INN_CANCELLATION_POLICY` | `retain` |
//! | `INN_SERVICE_POLICY` | `ongoing_only` |

use std::env;
use std::str::FromStr;

use inn_core::{CancellationPolicy, LifecyclePolicy, ServiceAttachPolicy};

const DEV_JWT_SECRET: &str = "inn-desk-dev-secret-change-in-production";

/// Inn Desk API configuration.
#[derive(Debug, Clone)]
pub struct InnConfig {
    /// HTTP server port
    pub port: u16,

    /// SQLite database file
    pub db_path: String,

    /// Pool size for the SQLite database
    pub db_max_connections: u32,

    /// JWT secret key for signing session tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,

    /// Cancellation and service-attach behaviour
    pub policy: LifecyclePolicy,
}

impl InnConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = InnConfig {
            port: parse_var("INN_PORT", "8080")?,

            db_path: env::var("INN_DB_PATH").unwrap_or_else(|_| "inn.db".to_string()),

            db_max_connections: parse_var("INN_DB_MAX_CONNECTIONS", "5")?,

            // In production this MUST be set via environment variable
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),

            jwt_access_lifetime_secs: parse_var("JWT_ACCESS_LIFETIME_SECS", "43200")?,

            policy: LifecyclePolicy {
                cancellation: parse_var::<CancellationPolicy>("INN_CANCELLATION_POLICY", "retain")?,
                service_attach: parse_var::<ServiceAttachPolicy>(
                    "INN_SERVICE_POLICY",
                    "ongoing_only",
                )?,
            },
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("INN_DB_MAX_CONNECTIONS".to_string()));
        }

        if config.jwt_access_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()));
        }

        Ok(config)
    }

    /// True when the development JWT secret is still in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
