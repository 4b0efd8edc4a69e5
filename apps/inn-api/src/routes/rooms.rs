//! Room management.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use inn_core::{CoreError, Room, RoomInput};
use serde_json::{json, Value};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::AppState;

/// `GET /api/rooms`
pub async fn list(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<Room>>> {
    Ok(Json(state.db.rooms().list(session.branch_id).await?))
}

/// `GET /api/rooms/{id}`
pub async fn get(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<Room>> {
    let room = state
        .db
        .rooms()
        .get_by_id(session.branch_id, id)
        .await?
        .ok_or(CoreError::RoomNotFound(id))?;

    Ok(Json(room))
}

/// `POST /api/rooms`
pub async fn create(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<RoomInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;
    let id = state.db.rooms().create(&session, &input).await?;

    Ok(Json(json!({ "message": "Room added", "id": id })))
}

/// `PUT /api/rooms/{id}`
pub async fn update(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
    payload: Result<Json<RoomInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;
    state.db.rooms().update(&session, id, &input).await?;

    Ok(Json(json!({ "message": "Room updated" })))
}
