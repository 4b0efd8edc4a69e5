//! Service catalog.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use inn_core::{Service, ServiceInput};
use serde_json::{json, Value};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::AppState;

/// `GET /api/services`
pub async fn list(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<Service>>> {
    Ok(Json(state.db.services().list(session.branch_id).await?))
}

/// `POST /api/services`
pub async fn create(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<ServiceInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;
    let id = state.db.services().create(&session, &input).await?;

    Ok(Json(json!({ "message": "Service created", "id": id })))
}

/// `PUT /api/services/{id}`
pub async fn update(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
    payload: Result<Json<ServiceInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;
    state.db.services().update(&session, id, &input).await?;

    Ok(Json(json!({ "message": "Service updated" })))
}
