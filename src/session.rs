use axum::http::HeaderMap;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Per-request context: which venue the request is scoped to and whether it
/// carries operator privileges. Constructed once per request from headers and
/// threaded explicitly into every query and command, so venue scoping is a
/// parameter rather than ambient state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub venue_id: String,
    pub admin: bool,
}

impl SessionContext {
    /// Context for public endpoints: venue from the `x-venue-id` header,
    /// falling back to the configured default venue.
    pub fn public(headers: &HeaderMap, config: &AppConfig) -> Self {
        Self {
            venue_id: venue_from_headers(headers, config),
            admin: false,
        }
    }

    /// Context for operator endpoints: requires a valid admin bearer token.
    pub fn admin(headers: &HeaderMap, config: &AppConfig) -> Result<Self, AppError> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let token = auth.strip_prefix("Bearer ").unwrap_or("");
        if token.is_empty() || token != config.admin_token {
            return Err(AppError::Unauthorized);
        }

        Ok(Self {
            venue_id: venue_from_headers(headers, config),
            admin: true,
        })
    }
}

fn venue_from_headers(headers: &HeaderMap, config: &AppConfig) -> String {
    headers
        .get("x-venue-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| config.default_venue.clone())
}
