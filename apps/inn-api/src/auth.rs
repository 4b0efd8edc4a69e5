//! JWT session module.
//!
//! Handles session token generation and validation, and turns the
//! `Authorization: Bearer <token>` header into a [`SessionContext`].
//!
//! ```text
//! POST /api/login ──► UserRepository::authenticate ──► JwtManager::generate_access_token
//!
//! GET /api/bookings
//!   Authorization: Bearer eyJ...
//!        │
//!        ▼
//!   Session extractor ──► validate_token ──► SessionContext { user_id, branch_id, role }
//!        │ (missing / invalid / expired)
//!        ▼
//!   403 {"error": "No session context found. Please log in."}
//! ```

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use inn_core::{SessionContext, User};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Branch the user works at; scopes every lookup
    pub branch_id: i64,

    /// User role ("admin", "staff", ...)
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

impl Claims {
    /// The session these claims describe.
    pub fn session(&self) -> Result<SessionContext, ApiError> {
        let user_id = self.sub.parse().map_err(|_| ApiError::Unauthenticated)?;

        Ok(SessionContext {
            user_id,
            branch_id: self.branch_id,
            role: self.role.clone(),
        })
    }
}

/// JWT token manager.
#[derive(Debug, Clone)]
pub struct JwtManager {
    secret: String,
    access_lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, access_lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            access_lifetime_secs,
        }
    }

    /// Token lifetime in seconds.
    pub fn access_lifetime_secs(&self) -> i64 {
        self.access_lifetime_secs
    }

    /// Generate a session token for a desk user.
    pub fn generate_access_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_lifetime_secs);

        let claims = Claims {
            sub: user.id.to_string(),
            branch_id: user.branch_id,
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            debug!(error = %e, "Rejected session token");
            ApiError::Unauthenticated
        })?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Session Extractor
// =============================================================================

/// The authenticated desk session of one request.
///
/// Handlers that take a `Session` never run without a valid token.
#[derive(Debug, Clone)]
pub struct Session(pub SessionContext);

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or(ApiError::Unauthenticated)?;

        let claims = state.jwt.validate_token(token)?;
        Ok(Session(claims.session()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desk_user() -> User {
        User {
            id: 7,
            branch_id: 2,
            username: "desk".to_string(),
            password_hash: String::new(),
            role: "staff".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager.generate_access_token(&desk_user()).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.branch_id, 2);
        assert_eq!(claims.role, "staff");

        let session = claims.session().unwrap();
        assert_eq!(session.user_id, 7);
        assert_eq!(session.branch_id, 2);
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = JwtManager::new("test-secret".to_string(), 3600);
        let other = JwtManager::new("other-secret".to_string(), 3600);

        let token = issuer.generate_access_token(&desk_user()).unwrap();
        assert!(matches!(other.validate_token(&token), Err(ApiError::Unauthenticated)));
    }

    #[test]
    fn test_expired_token() {
        // Well past the default 60s leeway
        let manager = JwtManager::new("test-secret".to_string(), -3600);

        let token = manager.generate_access_token(&desk_user()).unwrap();
        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
