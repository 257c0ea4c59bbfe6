//! Address routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use invoicer_db::repositories::{AddressError, AddressRepository, CreateAddressInput, UpdateAddressInput};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::error_response,
    extract::{AppJson, AppPath, AppQuery},
};

/// Query parameters for listing addresses.
#[derive(Debug, Deserialize)]
pub struct ListAddressesQuery {
    /// Only addresses of this company.
    pub company_id: Option<Uuid>,
}

/// Creates the address routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/addresses", get(list_addresses).post(create_address))
        .route("/addresses/{id}", get(get_address).put(update_address))
}

/// GET `/addresses?company_id=`
async fn list_addresses(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListAddressesQuery>,
) -> Response {
    let repo = AddressRepository::new((*state.db).clone());
    match repo.list(query.company_id).await {
        Ok(addresses) => (StatusCode::OK, Json(json!({ "addresses": addresses }))).into_response(),
        Err(e) => error_response(AddressError::from(e)),
    }
}

/// GET `/addresses/{id}`
async fn get_address(State(state): State<AppState>, AppPath(id): AppPath<Uuid>) -> Response {
    let repo = AddressRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(address) => (StatusCode::OK, Json(json!({ "address": address }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/addresses`
async fn create_address(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAddressInput>,
) -> Response {
    let repo = AddressRepository::new((*state.db).clone());
    match repo.create(payload).await {
        Ok(address) => {
            info!(address_id = %address.id, company_id = %address.company_id, "Address created");
            (StatusCode::CREATED, Json(json!({ "address": address }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// PUT `/addresses/{id}`
async fn update_address(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateAddressInput>,
) -> Response {
    let repo = AddressRepository::new((*state.db).clone());
    match repo.update(id, payload).await {
        Ok(address) => {
            info!(address_id = %id, "Address updated");
            (StatusCode::OK, Json(json!({ "address": address }))).into_response()
        }
        Err(e) => error_response(e),
    }
}
