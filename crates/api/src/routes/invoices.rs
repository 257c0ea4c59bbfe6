//! Invoice routes.
//!
//! `GET /invoice/{id}/status` and `GET /invoice/{id}/reports` run the status
//! resolver, which may write repaired payment fields back to the invoice.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use invoicer_core::invoicing::{InvoiceStatus, InvoicingError};
use invoicer_db::repositories::{
    CreateInvoiceInput, InvoiceRepository, LineItemInput, UpdateLineItemInput,
};
use invoicer_shared::types::{InvoiceId, InvoiceItemId};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    error::error_response,
    extract::{AppJson, AppPath, AppQuery},
};

/// Optional status filter.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    /// Invoice status name.
    pub status: Option<String>,
}

impl StatusQuery {
    fn parse(&self) -> Result<Option<InvoiceStatus>, InvoicingError> {
        self.status.as_deref().map(str::parse).transpose()
    }
}

/// Body of a manual status update.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status name.
    pub status: String,
}

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoice", get(list_invoices).post(create_invoice))
        .route("/invoice/{id}", get(get_invoice))
        .route("/invoice/{id}/details", get(get_details))
        .route("/invoice/{id}/items", post(add_line_item))
        .route(
            "/invoice/{id}/items/{line_id}",
            put(update_line_item).delete(remove_line_item),
        )
        .route(
            "/invoice/{id}/status",
            get(get_status).patch(update_status),
        )
        .route("/invoice/{id}/reports", get(get_report))
}

fn repository(state: &AppState) -> InvoiceRepository {
    InvoiceRepository::new((*state.db).clone(), (*state.invoicing).clone())
}

// ============================================================================
// Invoices
// ============================================================================

/// POST `/invoice`
async fn create_invoice(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInvoiceInput>,
) -> Response {
    match repository(&state).create(payload).await {
        Ok(invoice) => (StatusCode::CREATED, Json(json!({ "invoice": invoice }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/invoice?status=`
async fn list_invoices(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<StatusQuery>,
) -> Response {
    let status = match query.parse() {
        Ok(status) => status,
        Err(e) => return error_response(e),
    };
    invoice_list(&state, status).await
}

/// GET `/invoice/{id}` - One invoice, or `{invoices}` when `?status=` is given.
async fn get_invoice(
    State(state): State<AppState>,
    AppPath(id): AppPath<InvoiceId>,
    AppQuery(query): AppQuery<StatusQuery>,
) -> Response {
    match query.parse() {
        Ok(Some(status)) => invoice_list(&state, Some(status)).await,
        Ok(None) => match repository(&state).get(id).await {
            Ok(invoice) => (StatusCode::OK, Json(json!({ "invoice": invoice }))).into_response(),
            Err(e) => error_response(e),
        },
        Err(e) => error_response(e),
    }
}

async fn invoice_list(state: &AppState, status: Option<InvoiceStatus>) -> Response {
    match repository(state).list(status).await {
        Ok(invoices) => (StatusCode::OK, Json(json!({ "invoices": invoices }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/invoice/{id}/details` - Line items with catalog names.
async fn get_details(State(state): State<AppState>, AppPath(id): AppPath<InvoiceId>) -> Response {
    match repository(&state).line_items(id).await {
        Ok(items) => (
            StatusCode::OK,
            Json(json!({ "invoice_id": id, "items": items })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Line items
// ============================================================================

/// POST `/invoice/{id}/items`
async fn add_line_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<InvoiceId>,
    AppJson(payload): AppJson<LineItemInput>,
) -> Response {
    match repository(&state).add_line_item(id, payload).await {
        Ok(change) => (StatusCode::CREATED, Json(change)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT `/invoice/{id}/items/{line_id}`
async fn update_line_item(
    State(state): State<AppState>,
    AppPath((id, line_id)): AppPath<(InvoiceId, InvoiceItemId)>,
    AppJson(payload): AppJson<UpdateLineItemInput>,
) -> Response {
    match repository(&state).update_line_item(id, line_id, payload).await {
        Ok(change) => (StatusCode::OK, Json(change)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/invoice/{id}/items/{line_id}`
async fn remove_line_item(
    State(state): State<AppState>,
    AppPath((id, line_id)): AppPath<(InvoiceId, InvoiceItemId)>,
) -> Response {
    match repository(&state).remove_line_item(id, line_id).await {
        Ok(invoice) => (StatusCode::OK, Json(json!({ "invoice": invoice }))).into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Status & reports
// ============================================================================

/// GET `/invoice/{id}/status` - Derived payment status.
async fn get_status(State(state): State<AppState>, AppPath(id): AppPath<InvoiceId>) -> Response {
    match repository(&state).resolve_status(id).await {
        Ok(resolution) => (
            StatusCode::OK,
            Json(json!({
                "invoice_id": id,
                "status": resolution.status,
                "amount_paid": resolution.amount_paid,
                "due": resolution.amount_due
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH `/invoice/{id}/status` - Manual status override.
async fn update_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<InvoiceId>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Response {
    let status = match payload.status.parse::<InvoiceStatus>() {
        Ok(status) => status,
        Err(e) => return error_response(e),
    };
    match repository(&state).update_status(id, status).await {
        Ok(invoice) => (StatusCode::OK, Json(json!({ "invoice": invoice }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/invoice/{id}/reports` - Full report, or `{invoices}` when `?status=` is given.
async fn get_report(
    State(state): State<AppState>,
    AppPath(id): AppPath<InvoiceId>,
    AppQuery(query): AppQuery<StatusQuery>,
) -> Response {
    match query.parse() {
        Ok(Some(status)) => invoice_list(&state, Some(status)).await,
        Ok(None) => match repository(&state).report(id).await {
            Ok(report) => (StatusCode::OK, Json(report)).into_response(),
            Err(e) => error_response(e),
        },
        Err(e) => error_response(e),
    }
}
