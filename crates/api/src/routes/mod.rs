//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod addresses;
pub mod companies;
pub mod health;
pub mod invoices;
pub mod items;
pub mod orders;
pub mod payments;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(companies::routes())
        .merge(addresses::routes())
        .merge(items::routes())
        .merge(orders::routes())
        .merge(invoices::routes())
        .merge(payments::routes())
}
