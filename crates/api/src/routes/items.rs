//! Catalog item routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use invoicer_db::repositories::{CreateItemInput, ItemError, ItemFilter, ItemRepository, UpdateItemInput};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::error_response,
    extract::{AppJson, AppPath, AppQuery},
};

/// Creates the item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item))
}

/// GET `/items?type=&min_price=&max_price=`
async fn list_items(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<ItemFilter>,
) -> Response {
    let repo = ItemRepository::new((*state.db).clone());
    match repo.list(&filter).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(e) => error_response(ItemError::from(e)),
    }
}

/// GET `/items/{id}`
async fn get_item(State(state): State<AppState>, AppPath(id): AppPath<Uuid>) -> Response {
    let repo = ItemRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(item) => (StatusCode::OK, Json(json!({ "item": item }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/items`
async fn create_item(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateItemInput>,
) -> Response {
    let repo = ItemRepository::new((*state.db).clone());
    match repo.create(payload).await {
        Ok(item) => {
            info!(item_id = %item.id, name = %item.name, "Item created");
            (StatusCode::CREATED, Json(json!({ "item": item }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// PUT `/items/{id}`
async fn update_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateItemInput>,
) -> Response {
    let repo = ItemRepository::new((*state.db).clone());
    match repo.update(id, payload).await {
        Ok(item) => {
            info!(item_id = %id, "Item updated");
            (StatusCode::OK, Json(json!({ "item": item }))).into_response()
        }
        Err(e) => error_response(e),
    }
}
