use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub venue_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub guests: i32,
    pub male_guests: Option<i32>,
    pub female_guests: Option<i32>,
    pub booking_type: BookingType,
    pub payment_method: PaymentMethod,
    pub status: ReservationStatus,
    pub table_number: Option<String>,
    pub special_requests: Option<String>,
    pub add_ons: Vec<String>,
    pub coupon_code: Option<String>,
    pub total_amount: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }

    /// Lenient parse for rows read back from the store.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or(ReservationStatus::Pending)
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            "completed" => Some(ReservationStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BookingType {
    Standard,
    Corporate,
    PrivateParty,
    KittyParty,
    DateNight,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Standard => "standard",
            BookingType::Corporate => "corporate",
            BookingType::PrivateParty => "private-party",
            BookingType::KittyParty => "kitty-party",
            BookingType::DateNight => "date-night",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "corporate" => BookingType::Corporate,
            "private-party" => BookingType::PrivateParty,
            "kitty-party" => BookingType::KittyParty,
            "date-night" => BookingType::DateNight,
            _ => BookingType::Standard,
        }
    }

    /// Human-readable label used in confirmation messages.
    pub fn label(&self) -> &'static str {
        match self {
            BookingType::Standard => "Table Reservation",
            BookingType::Corporate => "Corporate Event",
            BookingType::PrivateParty => "Private Party",
            BookingType::KittyParty => "Kitty Party",
            BookingType::DateNight => "Date Night Experience",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    PayAtVenue,
    Card,
    Upi,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::PayAtVenue => "pay-at-venue",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "card" => PaymentMethod::Card,
            "upi" => PaymentMethod::Upi,
            _ => PaymentMethod::PayAtVenue,
        }
    }
}
