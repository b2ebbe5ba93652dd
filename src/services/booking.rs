use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{slots, BookingType, PaymentMethod, Reservation, ReservationStatus};

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub guests: i32,
    pub male_guests: Option<i32>,
    pub female_guests: Option<i32>,
    pub booking_type: Option<BookingType>,
    pub payment_method: Option<PaymentMethod>,
    pub special_requests: Option<String>,
    pub coupon_code: Option<String>,
    pub venue_id: Option<String>,
}

/// Validates a booking submission and builds the pending reservation. Every
/// check runs before anything is persisted; the first failure is reported and
/// nothing is written.
pub fn build_reservation(
    req: &BookingRequest,
    default_venue: &str,
    max_guests: i32,
) -> Result<Reservation, AppError> {
    let date = validate(req, max_guests)?;

    let venue_id = req
        .venue_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default_venue)
        .to_string();

    let now = Utc::now().naive_utc();
    Ok(Reservation {
        id: Uuid::new_v4().to_string(),
        venue_id,
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        phone: req.phone.trim().to_string(),
        date,
        time: req.time.clone(),
        guests: req.guests,
        male_guests: req.male_guests,
        female_guests: req.female_guests,
        booking_type: req.booking_type.unwrap_or(BookingType::Standard),
        payment_method: req.payment_method.unwrap_or(PaymentMethod::PayAtVenue),
        status: ReservationStatus::Pending,
        table_number: None,
        special_requests: req
            .special_requests
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        add_ons: vec![],
        coupon_code: req
            .coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        total_amount: None,
        created_at: now,
        updated_at: now,
    })
}

fn validate(req: &BookingRequest, max_guests: i32) -> Result<NaiveDate, AppError> {
    for (value, field) in [
        (&req.name, "name"),
        (&req.email, "email"),
        (&req.phone, "phone"),
        (&req.date, "date"),
        (&req.time, "time"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    let date = NaiveDate::parse_from_str(req.date.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::Validation("date must be a valid calendar date (YYYY-MM-DD)".to_string())
    })?;

    if !slots::is_valid_slot(&req.time) {
        return Err(AppError::Validation(
            "time must be one of the offered slots".to_string(),
        ));
    }

    if req.guests < 1 || req.guests > max_guests {
        return Err(AppError::Validation(format!(
            "guests must be between 1 and {max_guests}"
        )));
    }

    match (req.male_guests, req.female_guests) {
        (None, None) => {}
        (Some(male), Some(female)) => {
            if male < 0 || female < 0 {
                return Err(AppError::Validation(
                    "guest counts cannot be negative".to_string(),
                ));
            }
            // Balanced-ratio rule: the male share may not exceed the female
            // share. Reported separately from a plain total mismatch.
            if male > female {
                return Err(AppError::Validation(
                    "male guest count cannot exceed female guest count".to_string(),
                ));
            }
            if male + female != req.guests {
                return Err(AppError::Validation(
                    "male and female guest counts must add up to the total guests".to_string(),
                ));
            }
        }
        _ => {
            return Err(AppError::Validation(
                "male and female guest counts must be provided together".to_string(),
            ));
        }
    }

    Ok(date)
}
