//! Guest records.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use inn_core::{CoreError, Guest, GuestInput};
use serde_json::{json, Value};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::AppState;

/// `GET /api/guests`, newest first.
pub async fn list(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<Guest>>> {
    Ok(Json(state.db.guests().list(session.branch_id).await?))
}

/// `GET /api/guests/{id}`
pub async fn get(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<Guest>> {
    let guest = state
        .db
        .guests()
        .get_by_id(session.branch_id, id)
        .await?
        .ok_or(CoreError::GuestNotFound(id))?;

    Ok(Json(guest))
}

/// `POST /api/guests`
pub async fn create(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<GuestInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;
    let id = state.db.guests().create(&session, &input).await?;

    Ok(Json(json!({ "message": "Guest added", "id": id })))
}

/// `PUT /api/guests/{id}`
pub async fn update(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
    payload: Result<Json<GuestInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;
    state.db.guests().update(&session, id, &input).await?;

    Ok(Json(json!({ "message": "Guest updated" })))
}

/// `DELETE /api/guests/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.guests().delete(&session, id).await?;

    Ok(Json(json!({ "message": "Guest deleted" })))
}
