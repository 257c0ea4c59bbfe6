//! Company routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use invoicer_db::repositories::{CompanyRepository, CreateCompanyInput, UpdateCompanyInput};
use invoicer_shared::types::PageRequest;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::error_response,
    extract::{AppJson, AppPath, AppQuery},
};

/// Creates the company routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route("/companies/{id}", get(get_company).put(update_company))
}

/// GET `/companies` - Paginated company list.
async fn list_companies(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageRequest>,
) -> Response {
    let repo = CompanyRepository::new((*state.db).clone());
    match repo.list(page).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/companies/{id}`
async fn get_company(State(state): State<AppState>, AppPath(id): AppPath<Uuid>) -> Response {
    let repo = CompanyRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(company) => (StatusCode::OK, Json(json!({ "company": company }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/companies`
async fn create_company(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCompanyInput>,
) -> Response {
    let repo = CompanyRepository::new((*state.db).clone());
    match repo.create(payload).await {
        Ok(company) => {
            info!(company_id = %company.id, name = %company.company_name, "Company created");
            (StatusCode::CREATED, Json(json!({ "company": company }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// PUT `/companies/{id}` - Partial update.
async fn update_company(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCompanyInput>,
) -> Response {
    let repo = CompanyRepository::new((*state.db).clone());
    match repo.update(id, payload).await {
        Ok(company) => {
            info!(company_id = %id, "Company updated");
            (StatusCode::OK, Json(json!({ "company": company }))).into_response()
        }
        Err(e) => error_response(e),
    }
}
