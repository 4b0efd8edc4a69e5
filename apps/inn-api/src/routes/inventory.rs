//! Inventory: categories, stock levels and movements.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use inn_core::{CoreError, InventoryCategoryInput, InventoryItemInput};
use inn_db::Saved;
use serde_json::{json, Value};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::AppState;

/// `GET /api/inventory`: all categories plus this branch's items.
pub async fn overview(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Value>> {
    let inventory = state.db.inventory();
    let categories = inventory.categories().await?;
    let items = inventory.items(session.branch_id).await?;

    Ok(Json(json!({
        "success": true,
        "categories": categories,
        "items": items,
    })))
}

/// `GET /api/inventory/items/{id}`: one item with its movement log.
pub async fn get_item(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let inventory = state.db.inventory();
    let item = inventory
        .get_item(session.branch_id, id)
        .await?
        .ok_or(CoreError::InventoryItemNotFound(id))?;
    let transactions = inventory.transactions(id).await?;

    Ok(Json(json!({
        "success": true,
        "item": item,
        "transactions": transactions,
    })))
}

/// `POST /api/inventory/items`: inserts without `id`, updates with one.
pub async fn save_item(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<InventoryItemInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;

    let message = match state.db.inventory().save_item(&session, &input).await? {
        Saved::Created(_) => "Item added",
        Saved::Updated(_) => "Item updated",
    };

    Ok(Json(json!({ "success": true, "message": message })))
}

/// `POST /api/inventory/categories`
pub async fn save_category(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<InventoryCategoryInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;

    let message = match state.db.inventory().save_category(&session, &input).await? {
        Saved::Created(_) => "Category added",
        Saved::Updated(_) => "Category updated",
    };

    Ok(Json(json!({ "success": true, "message": message })))
}
