//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for companies, addresses, items, orders, invoices and payments
//! - JSON error responses
//! - Request extractors that report rejections as `invalid_input`

pub mod error;
pub mod extract;
pub mod routes;

use axum::Router;
use invoicer_shared::InvoicingConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Invoice engine settings.
    pub invoicing: Arc<InvoicingConfig>,
}

impl AppState {
    /// Creates the state from a connection pool and invoicing settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, invoicing: InvoicingConfig) -> Self {
        Self {
            db: Arc::new(db),
            invoicing: Arc::new(invoicing),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
