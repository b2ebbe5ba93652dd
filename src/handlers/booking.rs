use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::TIME_SLOTS;
use crate::services::booking::{self, BookingRequest};
use crate::session::SessionContext;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CreatedResponse {
    id: String,
    status: &'static str,
}

// POST /api/reservations
pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<BookingRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let session = SessionContext::public(&headers, &state.config);

    let reservation =
        booking::build_reservation(&body, &session.venue_id, state.config.max_guests)?;

    {
        let db = state
            .db
            .lock()
            .map_err(|_| AppError::Store(anyhow!("database lock poisoned")))?;
        queries::create_reservation(&db, &reservation)?;
    }

    tracing::info!(
        id = %reservation.id,
        venue = %reservation.venue_id,
        date = %reservation.date,
        time = %reservation.time,
        "reservation created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: reservation.id,
            status: "pending",
        }),
    ))
}

// GET /api/reservations/slots
pub async fn list_slots() -> Json<Vec<&'static str>> {
    Json(TIME_SLOTS.to_vec())
}
