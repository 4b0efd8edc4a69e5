//! Error types for the Inn Desk API.
//!
//! Every failure leaves the server as a status code plus `{"error": "..."}`.
//!
//! ```text
//! DbError::Core(not found)            → 404
//! DbError::Core(invariant / malformed) → 400
//! DbError::UniqueViolation / FK       → 400
//! Unauthenticated                     → 403
//! InvalidCredentials                  → 401
//! anything else                       → 500 (logged, generic body)
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inn_core::CoreError;
use inn_db::DbError;
use serde_json::json;
use tracing::error;

/// Inn Desk API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No valid session token on a protected route.
    #[error("No session context found. Please log in.")]
    Unauthenticated,

    /// Login with a wrong username or password.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// Request body could not be read.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Database or domain error.
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::FORBIDDEN,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Db(DbError::Core(e)) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Db(DbError::Core(_)) => StatusCode::BAD_REQUEST,
            ApiError::Db(DbError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Db(DbError::UniqueViolation { .. })
            | ApiError::Db(DbError::ForeignKeyViolation { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Db(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Db(DbError::Core(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use inn_core::Money;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(CoreError::BillNotFound(3));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Bill not found");

        let overpaid = ApiError::from(DbError::from(CoreError::OverpaymentRejected {
            current_paid: Money::zero(),
            attempted_amount: Money::from_major(900),
            resulting_paid: Money::from_major(900),
            total_amount: Money::from_major(700),
        }));
        assert_eq!(overpaid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(overpaid.to_string(), "Payment exceeds total amount");

        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(DbError::duplicate("room_number", "101")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DbError::PoolExhausted).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
