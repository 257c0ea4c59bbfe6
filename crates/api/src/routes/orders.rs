//! Order routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use invoicer_db::repositories::{CreateOrderInput, OrderRepository};
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::error_response,
    extract::{AppJson, AppPath},
};

/// Creates the order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
}

/// GET `/orders`
async fn list_orders(State(state): State<AppState>) -> Response {
    let repo = OrderRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(orders) => (StatusCode::OK, Json(json!({ "orders": orders }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/orders/{id}` - Order with its lines.
async fn get_order(State(state): State<AppState>, AppPath(id): AppPath<Uuid>) -> Response {
    let repo = OrderRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(order) => (StatusCode::OK, Json(json!({ "order": order }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/orders` - Places an order and reserves stock.
async fn create_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOrderInput>,
) -> Response {
    let repo = OrderRepository::new((*state.db).clone());
    match repo.create(payload).await {
        Ok(order) => (StatusCode::CREATED, Json(json!({ "order": order }))).into_response(),
        Err(e) => error_response(e),
    }
}
