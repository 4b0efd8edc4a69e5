//! Bookings and the services attached to them.
//!
//! Create, Update and AddService go through [`inn_db::Lifecycle`], which owns
//! the transaction boundaries; the handlers only decode and encode JSON.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use inn_core::{BookingDetail, BookingStatus, CoreError};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub room_id: i64,
    pub guest_id: i64,
    pub expected_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub expected_hours: i64,
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize)]
pub struct AddServiceRequest {
    pub booking_id: i64,
    pub service_id: i64,
    pub qty: i64,
}

/// `GET /api/bookings`, newest first.
pub async fn list(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<BookingDetail>>> {
    Ok(Json(state.db.bookings().list(session.branch_id).await?))
}

/// `GET /api/bookings/{id}`
pub async fn get(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<BookingDetail>> {
    let booking = state
        .db
        .bookings()
        .get_detail(session.branch_id, id)
        .await?
        .ok_or(CoreError::BookingNotFound(id))?;

    Ok(Json(booking))
}

/// `POST /api/bookings`
pub async fn create(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;

    let id = state
        .lifecycle()
        .create_booking(&session, req.room_id, req.guest_id, req.expected_hours)
        .await?;

    Ok(Json(json!({ "message": "Booking created", "id": id })))
}

/// `PUT /api/bookings/{id}`
pub async fn update(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;

    state
        .lifecycle()
        .update_booking(&session, id, req.expected_hours, req.status)
        .await?;

    Ok(Json(json!({ "message": "Booking updated" })))
}

/// `POST /api/booking-services`
pub async fn add_service(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<AddServiceRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;

    let line_id = state
        .lifecycle()
        .add_service(&session, req.booking_id, req.service_id, req.qty)
        .await?;

    Ok(Json(json!({ "message": "Service added", "id": line_id })))
}
