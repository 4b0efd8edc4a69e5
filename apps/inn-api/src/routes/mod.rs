//! # HTTP Routes
//!
//! One module per desk screen. Every `/api/*` handler except login takes a
//! [`Session`](crate::auth::Session), so an unauthenticated request is
//! rejected with 403 before any repository call.
//!
//! ```text
//! /api/login              POST            login
//! /api/rooms[/{id}]       GET POST PUT    rooms
//! /api/guests[/{id}]      GET POST PUT DELETE
//! /api/services[/{id}]    GET POST PUT
//! /api/bookings[/{id}]    GET POST PUT    Create / Update
//! /api/booking-services   POST            AddService
//! /api/cashier[/{id}]     GET POST        bills / Pay
//! /api/inventory/...      GET POST
//! /health                 GET
//! ```

pub mod bookings;
pub mod cashier;
pub mod guests;
pub mod health;
pub mod inventory;
pub mod login;
pub mod rooms;
pub mod services;

use axum::http::header::ALLOW;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{middleware, Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Create the router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/login", post(login::login))
        .route("/api/rooms", get(rooms::list).post(rooms::create))
        .route("/api/rooms/{id}", get(rooms::get).put(rooms::update))
        .route("/api/guests", get(guests::list).post(guests::create))
        .route(
            "/api/guests/{id}",
            get(guests::get).put(guests::update).delete(guests::delete),
        )
        .route("/api/services", get(services::list).post(services::create))
        .route("/api/services/{id}", put(services::update))
        .route("/api/bookings", get(bookings::list).post(bookings::create))
        .route("/api/bookings/{id}", get(bookings::get).put(bookings::update))
        .route("/api/booking-services", post(bookings::add_service))
        .route("/api/cashier", get(cashier::list).post(cashier::pay))
        .route("/api/cashier/{id}", get(cashier::get))
        .route("/api/inventory", get(inventory::overview))
        .route("/api/inventory/items", post(inventory::save_item))
        .route("/api/inventory/items/{id}", get(inventory::get_item))
        .route("/api/inventory/categories", post(inventory::save_category))
        .fallback(not_found)
        .layer(middleware::map_response(json_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

/// Gives axum's bare 405 the same `{"error": ...}` body as every other failure.
async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut replaced = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response();

    if let Some(allow) = allow {
        replaced.headers_mut().insert(ALLOW, allow);
    }
    replaced
}
