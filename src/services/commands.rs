use std::sync::Arc;

use anyhow::anyhow;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Reservation, ReservationStatus};
use crate::services::notify::{message, phone};
use crate::session::SessionContext;
use crate::state::AppState;

/// Every operator action on the console is expressed as a command value and
/// funnelled through [`dispatch`], so store mutations and notification sends
/// share one code path and one result shape.
#[derive(Debug)]
pub enum AdminCommand {
    SetStatus {
        id: String,
        status: ReservationStatus,
    },
    Notify {
        id: String,
        channel: NotifyChannel,
    },
    AssignTable {
        id: String,
        table_number: String,
    },
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NotifyChannel {
    Email,
    DeepLink,
}

#[derive(Debug)]
pub enum CommandOutcome {
    StatusChanged {
        id: String,
        status: ReservationStatus,
    },
    EmailSent {
        id: String,
        message_id: String,
    },
    DeepLinkReady {
        id: String,
        url: String,
    },
    TableAssigned {
        id: String,
        table_number: String,
    },
}

impl CommandOutcome {
    pub fn into_json(self) -> serde_json::Value {
        match self {
            CommandOutcome::StatusChanged { id, status } => {
                serde_json::json!({ "ok": true, "id": id, "status": status.as_str() })
            }
            CommandOutcome::EmailSent { id, message_id } => {
                serde_json::json!({ "ok": true, "id": id, "message_id": message_id })
            }
            CommandOutcome::DeepLinkReady { id, url } => {
                serde_json::json!({ "ok": true, "id": id, "url": url })
            }
            CommandOutcome::TableAssigned { id, table_number } => {
                serde_json::json!({ "ok": true, "id": id, "table_number": table_number })
            }
        }
    }
}

pub async fn dispatch(
    state: &Arc<AppState>,
    session: &SessionContext,
    cmd: AdminCommand,
) -> Result<CommandOutcome, AppError> {
    match cmd {
        AdminCommand::SetStatus { id, status } => set_status(state, session, id, status),
        AdminCommand::Notify { id, channel } => notify(state, session, id, channel).await,
        AdminCommand::AssignTable { id, table_number } => {
            assign_table(state, session, id, table_number)
        }
    }
}

fn set_status(
    state: &Arc<AppState>,
    session: &SessionContext,
    id: String,
    status: ReservationStatus,
) -> Result<CommandOutcome, AppError> {
    let db = state.db.lock().map_err(|_| poisoned())?;

    let reservation = queries::get_reservation(&db, &session.venue_id, &id)?
        .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))?;

    if !state.transitions.is_allowed(reservation.status, status) {
        return Err(AppError::TransitionDenied {
            from: reservation.status.as_str(),
            to: status.as_str(),
        });
    }

    queries::update_reservation_status(&db, &session.venue_id, &id, status)?;
    tracing::info!(id = %id, from = reservation.status.as_str(), to = status.as_str(), "reservation status changed");

    Ok(CommandOutcome::StatusChanged { id, status })
}

async fn notify(
    state: &Arc<AppState>,
    session: &SessionContext,
    id: String,
    channel: NotifyChannel,
) -> Result<CommandOutcome, AppError> {
    // Read and release the store lock before any outbound call.
    let reservation: Reservation = {
        let db = state.db.lock().map_err(|_| poisoned())?;
        queries::get_reservation(&db, &session.venue_id, &id)?
            .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))?
    };

    let body = message::render_confirmation(&reservation);

    match channel {
        NotifyChannel::Email => {
            let subject = message::confirmation_subject(&reservation);
            let message_id = state
                .mailer
                .send(&reservation.email, &subject, &body)
                .await
                .map_err(|e| AppError::Mail(e.to_string()))?;
            tracing::info!(id = %id, message_id = %message_id, "confirmation email sent");
            Ok(CommandOutcome::EmailSent { id, message_id })
        }
        NotifyChannel::DeepLink => {
            let normalized =
                phone::normalize_for_deep_link(&reservation.phone, &state.config.default_country_code);
            let url = phone::deep_link_url(&normalized, &body);
            Ok(CommandOutcome::DeepLinkReady { id, url })
        }
    }
}

fn assign_table(
    state: &Arc<AppState>,
    session: &SessionContext,
    id: String,
    table_number: String,
) -> Result<CommandOutcome, AppError> {
    let table_number = table_number.trim().to_string();
    if table_number.is_empty() {
        return Err(AppError::Validation("table_number is required".to_string()));
    }

    let db = state.db.lock().map_err(|_| poisoned())?;
    let updated = queries::assign_table_number(&db, &session.venue_id, &id, &table_number)?;
    if !updated {
        return Err(AppError::NotFound(format!("reservation {id}")));
    }

    Ok(CommandOutcome::TableAssigned { id, table_number })
}

fn poisoned() -> AppError {
    AppError::Store(anyhow!("database lock poisoned"))
}
