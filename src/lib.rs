pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod workflow;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router. Shared between the binary and the
/// integration tests so the two never drift.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/reservations", post(handlers::booking::create_reservation))
        .route("/api/reservations/slots", get(handlers::booking::list_slots))
        .route("/api/admin/status", get(handlers::admin::get_status))
        .route(
            "/api/admin/reservations",
            get(handlers::admin::list_reservations),
        )
        .route(
            "/api/admin/reservations/:id/status",
            post(handlers::admin::set_status),
        )
        .route(
            "/api/admin/reservations/:id/notify",
            post(handlers::admin::notify),
        )
        .route(
            "/api/admin/reservations/:id/table",
            post(handlers::admin::assign_table),
        )
        // The booking form and the send endpoint are called from browser
        // origins; pre-flight requests from any origin must succeed.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
