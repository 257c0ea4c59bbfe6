//! Payment routes.
//!
//! Payment writes leave the invoice untouched; `GET /invoice/{id}/status`
//! picks them up.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use invoicer_core::invoicing::PaymentStatus;
use invoicer_db::repositories::{CreatePaymentInput, PaymentRepository};
use invoicer_shared::types::{InvoiceId, PaymentId};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    error::error_response,
    extract::{AppJson, AppPath, AppQuery},
};

/// Optional payment status filter.
#[derive(Debug, Deserialize)]
pub struct PaymentStatusQuery {
    /// Payment status name.
    pub status: Option<String>,
}

/// Body of a payment status update.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    /// New status name.
    pub status: String,
}

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payment/{id}", get(list_payments).post(create_payment))
        .route("/payment/{id}/details", get(get_payment))
        .route("/payment/{id}/status", put(update_payment_status))
}

/// POST `/payment/{invoice_id}`
async fn create_payment(
    State(state): State<AppState>,
    AppPath(invoice_id): AppPath<InvoiceId>,
    AppJson(payload): AppJson<CreatePaymentInput>,
) -> Response {
    let repo = PaymentRepository::new((*state.db).clone());
    match repo.create(invoice_id, payload).await {
        Ok(payment) => (StatusCode::CREATED, Json(json!({ "payment": payment }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/payment/{invoice_id}?status=`
async fn list_payments(
    State(state): State<AppState>,
    AppPath(invoice_id): AppPath<InvoiceId>,
    AppQuery(query): AppQuery<PaymentStatusQuery>,
) -> Response {
    let status = match query.status.as_deref().map(str::parse::<PaymentStatus>).transpose() {
        Ok(status) => status,
        Err(e) => return error_response(e),
    };

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.list_for_invoice(invoice_id, status).await {
        Ok(payments) => (StatusCode::OK, Json(json!({ "payments": payments }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/payment/{id}/details`
async fn get_payment(State(state): State<AppState>, AppPath(id): AppPath<PaymentId>) -> Response {
    let repo = PaymentRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(payment) => (StatusCode::OK, Json(json!({ "payment": payment }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT `/payment/{id}/status`
async fn update_payment_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<PaymentId>,
    AppJson(payload): AppJson<UpdatePaymentStatusRequest>,
) -> Response {
    let status = match payload.status.parse::<PaymentStatus>() {
        Ok(status) => status,
        Err(e) => return error_response(e),
    };

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.update_status(id, status).await {
        Ok(payment) => (StatusCode::OK, Json(json!({ "payment": payment }))).into_response(),
        Err(e) => error_response(e),
    }
}
