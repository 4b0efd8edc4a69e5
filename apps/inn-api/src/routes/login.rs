//! Desk login.
//!
//! Exchanges a username and password for a session token.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use inn_core::CoreError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    let username = req.username.trim();

    if username.is_empty() || req.password.is_empty() {
        return Err(CoreError::MissingFields("Please fill in all fields.".to_string()).into());
    }

    let Some(user) = state.db.users().authenticate(username, &req.password).await? else {
        warn!(username, "Login rejected");
        return Err(ApiError::InvalidCredentials);
    };

    let token = state.jwt.generate_access_token(&user)?;

    info!(user_id = user.id, branch_id = user.branch_id, "Desk user logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "token_type": "Bearer",
        "expires_in": state.jwt.access_lifetime_secs(),
        "user": user,
    })))
}
