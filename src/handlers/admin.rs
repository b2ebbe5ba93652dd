use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::ReservationStatus;
use crate::services::commands::{self, AdminCommand, NotifyChannel};
use crate::session::SessionContext;
use crate::state::AppState;

// GET /api/admin/status
#[derive(Serialize)]
pub struct StatusResponse {
    venue_id: String,
    pending: i64,
    confirmed: i64,
    cancelled: i64,
    completed: i64,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, AppError> {
    let session = SessionContext::admin(&headers, &state.config)?;

    let counts = {
        let db = state
            .db
            .lock()
            .map_err(|_| AppError::Store(anyhow!("database lock poisoned")))?;
        queries::get_status_counts(&db, &session.venue_id)?
    };

    Ok(Json(StatusResponse {
        venue_id: session.venue_id,
        pending: counts.pending,
        confirmed: counts.confirmed,
        cancelled: counts.cancelled,
        completed: counts.completed,
    }))
}

// GET /api/admin/reservations
#[derive(Deserialize)]
pub struct ReservationsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct ReservationResponse {
    id: String,
    venue_id: String,
    name: String,
    email: String,
    phone: String,
    date: String,
    time: String,
    guests: i32,
    male_guests: Option<i32>,
    female_guests: Option<i32>,
    booking_type: String,
    payment_method: String,
    status: String,
    table_number: Option<String>,
    special_requests: Option<String>,
    add_ons: Vec<String>,
    coupon_code: Option<String>,
    total_amount: Option<f64>,
    created_at: String,
    updated_at: String,
}

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ReservationsQuery>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let session = SessionContext::admin(&headers, &state.config)?;

    let limit = query.limit.unwrap_or(50);
    let status_filter = query.status.as_deref();

    let reservations = {
        let db = state
            .db
            .lock()
            .map_err(|_| AppError::Store(anyhow!("database lock poisoned")))?;
        queries::list_reservations(&db, &session.venue_id, status_filter, limit)?
    };

    let response: Vec<ReservationResponse> = reservations
        .into_iter()
        .map(|r| ReservationResponse {
            id: r.id,
            venue_id: r.venue_id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            date: r.date.format("%Y-%m-%d").to_string(),
            time: r.time,
            guests: r.guests,
            male_guests: r.male_guests,
            female_guests: r.female_guests,
            booking_type: r.booking_type.as_str().to_string(),
            payment_method: r.payment_method.as_str().to_string(),
            status: r.status.as_str().to_string(),
            table_number: r.table_number,
            special_requests: r.special_requests,
            add_ons: r.add_ons,
            coupon_code: r.coupon_code,
            total_amount: r.total_amount,
            created_at: r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: r.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/reservations/:id/status
#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: ReservationStatus,
}

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = SessionContext::admin(&headers, &state.config)?;

    let outcome = commands::dispatch(
        &state,
        &session,
        AdminCommand::SetStatus {
            id,
            status: body.status,
        },
    )
    .await?;

    Ok(Json(outcome.into_json()))
}

// POST /api/admin/reservations/:id/notify
#[derive(Deserialize)]
pub struct NotifyRequest {
    pub channel: NotifyChannel,
}

pub async fn notify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<NotifyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = SessionContext::admin(&headers, &state.config)?;

    let outcome = commands::dispatch(
        &state,
        &session,
        AdminCommand::Notify {
            id,
            channel: body.channel,
        },
    )
    .await?;

    Ok(Json(outcome.into_json()))
}

// POST /api/admin/reservations/:id/table
#[derive(Deserialize)]
pub struct AssignTableRequest {
    pub table_number: String,
}

pub async fn assign_table(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<AssignTableRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = SessionContext::admin(&headers, &state.config)?;

    let outcome = commands::dispatch(
        &state,
        &session,
        AdminCommand::AssignTable {
            id,
            table_number: body.table_number,
        },
    )
    .await?;

    Ok(Json(outcome.into_json()))
}
