//! Cashier: bills and payments.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use inn_core::money::major_units;
use inn_core::{Bill, BillSummary, CoreError, Money};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::AppState;

/// Body of `POST /api/cashier`.
///
/// Every field is optional on the wire: a missing `bill_id` or
/// `amount_paid` is reported as "Missing payment details", not as a
/// malformed body.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub bill_id: Option<i64>,
    #[serde(default, with = "major_units::option")]
    pub amount_paid: Option<Money>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// `GET /api/cashier`, newest first.
pub async fn list(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<BillSummary>>> {
    Ok(Json(state.db.bills().list(session.branch_id).await?))
}

/// `GET /api/cashier/{id}`
pub async fn get(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<Bill>> {
    let bill = state
        .db
        .bills()
        .get_by_id(session.branch_id, id)
        .await?
        .ok_or(CoreError::BillNotFound(id))?;

    Ok(Json(bill))
}

/// `POST /api/cashier`
pub async fn pay(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;

    let receipt = state
        .lifecycle()
        .pay(&session, req.bill_id, req.amount_paid, req.payment_method)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment recorded",
        "bill_id": receipt.bill_id,
        "paid_amount": receipt.paid_amount.to_major_f64(),
        "total_amount": receipt.total_amount.to_major_f64(),
        "booking_completed": receipt.booking_completed,
    })))
}
