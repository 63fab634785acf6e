//! Reservation DTOs
//!
//! Date and time strings are parsed here; the core consumes validated
//! `NaiveDate`/`NaiveTime` values only.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{DomainError, DomainResult, Reservation};

/// Request to book a new reservation
#[derive(Debug, Deserialize, Validate)]
pub struct BookReservationRequest {
    /// Requesting party's opaque identifier (username/contact key)
    #[validate(length(min = 1, max = 64))]
    pub owner: String,
    #[validate(length(min = 1, max = 100))]
    pub party_name: String,
    #[validate(length(min = 1, max = 100))]
    pub contact: String,
    #[validate(range(min = 1))]
    pub tables: u32,
    /// Reservation date (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM); the end follows from the service duration
    pub start: String,
}

/// Request to edit a Pending reservation
#[derive(Debug, Deserialize, Validate)]
pub struct EditReservationRequest {
    #[validate(length(min = 1, max = 64))]
    pub owner: String,
    #[validate(range(min = 1))]
    pub tables: u32,
    /// New date (YYYY-MM-DD)
    pub date: String,
    /// New start time (HH:MM)
    pub start: String,
}

/// Request to settle an Approved reservation
#[derive(Debug, Deserialize, Validate)]
pub struct SettleReservationRequest {
    /// Payment method label: Maya, GCash or Card
    #[validate(length(min = 1))]
    pub payment_method: String,
}

/// Owner identification for owner-scoped operations
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner: String,
}

/// Filters for the list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListReservationsQuery {
    pub owner: Option<String>,
    pub status: Option<String>,
}

/// Availability probe parameters
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM)
    pub start: String,
}

/// Reservation details in API responses
#[derive(Debug, Serialize)]
pub struct ReservationDto {
    pub id: String,
    pub owner: String,
    pub party_name: String,
    pub contact: String,
    pub tables: u32,
    pub date: String,
    pub start: String,
    pub end: String,
    pub status: String,
    pub created_at: String,
}

impl From<&Reservation> for ReservationDto {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.clone(),
            owner: r.owner.clone(),
            party_name: r.party_name.clone(),
            contact: r.contact.clone(),
            tables: r.tables,
            date: r.window.date.format("%Y-%m-%d").to_string(),
            start: r.window.start.format("%H:%M").to_string(),
            end: r.window.end.format("%H:%M").to_string(),
            status: r.status.to_string(),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Availability result for a probed window
#[derive(Debug, Serialize)]
pub struct AvailabilityDto {
    pub date: String,
    pub start: String,
    pub end: String,
    pub available_tables: u32,
}

pub fn parse_date(s: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DomainError::Validation(format!("invalid date '{s}', expected YYYY-MM-DD")))
}

pub fn parse_time(s: &str) -> DomainResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| DomainError::Validation(format!("invalid time '{s}', expected HH:MM")))
}

// ── Tests ──────────────────────────────────────────────────────
