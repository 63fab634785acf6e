//! Reservation domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::window::TimeWindow;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    /// Awaiting admin approval
    Pending,
    /// Approved, awaiting settlement
    Approved,
    /// Paid and closed out
    Settled,
    /// Rejected by admin
    Rejected,
    /// Cancelled by the owner
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Settled => "Settled",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Terminal statuses admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Rejected | Self::Cancelled)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Settled" => Ok(Self::Settled),
            "Rejected" => Ok(Self::Rejected),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!(
                "unknown reservation status '{other}'"
            ))),
        }
    }
}

/// Payment method label recorded at settlement.
///
/// A plain tagged variant; input collection and format checks for the
/// underlying account details happen outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Maya,
    GCash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maya => "Maya",
            Self::GCash => "GCash",
            Self::Card => "Card",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Maya" => Ok(Self::Maya),
            "GCash" => Ok(Self::GCash),
            "Card" => Ok(Self::Card),
            other => Err(DomainError::Validation(format!(
                "unknown payment method '{other}', expected Maya, GCash or Card"
            ))),
        }
    }
}

/// Table reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique reservation ID, monotonically assigned, never reused
    pub id: String,
    /// Opaque identifier of the requesting party
    pub owner: String,
    /// Display name for the booking
    pub party_name: String,
    /// Contact string (phone or email)
    pub contact: String,
    /// Number of tables held
    pub tables: u32,
    /// Occupancy span
    #[serde(flatten)]
    pub window: TimeWindow,
    /// Current status
    pub status: ReservationStatus,
    /// When the reservation was created
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        party_name: impl Into<String>,
        contact: impl Into<String>,
        tables: u32,
        window: TimeWindow,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            party_name: party_name.into(),
            contact: contact.into(),
            tables,
            window,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn invalid_state(&self, action: &'static str) -> DomainError {
        DomainError::InvalidState {
            id: self.id.clone(),
            status: self.status,
            action,
        }
    }

    /// Pending → Approved. A second approve fails rather than silently
    /// succeeding.
    pub fn approve(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Pending => {
                self.status = ReservationStatus::Approved;
                Ok(())
            }
            _ => Err(self.invalid_state("approve")),
        }
    }

    /// Pending → Rejected.
    pub fn reject(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Pending => {
                self.status = ReservationStatus::Rejected;
                Ok(())
            }
            _ => Err(self.invalid_state("reject")),
        }
    }

    /// Approved → Settled.
    pub fn settle(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Approved => {
                self.status = ReservationStatus::Settled;
                Ok(())
            }
            _ => Err(self.invalid_state("settle")),
        }
    }

    /// Pending/Approved → Cancelled.
    pub fn cancel(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Pending | ReservationStatus::Approved => {
                self.status = ReservationStatus::Cancelled;
                Ok(())
            }
            _ => Err(self.invalid_state("cancel")),
        }
    }

    /// Replace the editable fields (table count and window). Only legal
    /// while Pending; the ledger re-runs the capacity check first.
    pub fn reschedule(&mut self, tables: u32, window: TimeWindow) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Pending => {
                self.tables = tables;
                self.window = window;
                Ok(())
            }
            _ => Err(self.invalid_state("edit")),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_window() -> TimeWindow {
        TimeWindow::new(
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            "18:00:00".parse().unwrap(),
            "20:00:00".parse().unwrap(),
        )
        .unwrap()
    }

    fn sample_reservation() -> Reservation {
        Reservation::new("1", "alice", "Alice's party", "0917-000-0000", 4, sample_window())
    }

    #[test]
    fn new_reservation_is_pending() {
        let r = sample_reservation();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert!(!r.status.is_terminal());
    }

    #[test]
    fn approve_then_settle() {
        let mut r = sample_reservation();
        r.approve().unwrap();
        assert_eq!(r.status, ReservationStatus::Approved);
        r.settle().unwrap();
        assert_eq!(r.status, ReservationStatus::Settled);
        assert!(r.status.is_terminal());
    }

    #[test]
    fn approve_twice_fails() {
        let mut r = sample_reservation();
        r.approve().unwrap();
        let err = r.approve().unwrap_err();
        assert!(matches!(err, DomainError::InvalidState { .. }));
    }

    #[test]
    fn settle_pending_fails() {
        let mut r = sample_reservation();
        let err = r.settle().unwrap_err();
        assert!(matches!(err, DomainError::InvalidState { .. }));
    }

    #[test]
    fn cancel_from_pending_and_approved() {
        let mut r = sample_reservation();
        r.cancel().unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);

        let mut r = sample_reservation();
        r.approve().unwrap();
        r.cancel().unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);
    }

    #[test]
    fn cancel_settled_fails() {
        let mut r = sample_reservation();
        r.approve().unwrap();
        r.settle().unwrap();
        assert!(matches!(
            r.cancel().unwrap_err(),
            DomainError::InvalidState { .. }
        ));
    }

    #[test]
    fn reject_then_anything_fails() {
        let mut r = sample_reservation();
        r.reject().unwrap();
        assert!(r.approve().is_err());
        assert!(r.cancel().is_err());
        assert!(r.settle().is_err());
    }

    #[test]
    fn reschedule_only_while_pending() {
        let mut r = sample_reservation();
        let w = sample_window();
        r.reschedule(2, w).unwrap();
        assert_eq!(r.tables, 2);

        r.approve().unwrap();
        assert!(matches!(
            r.reschedule(3, w).unwrap_err(),
            DomainError::InvalidState { .. }
        ));
    }

    #[test]
    fn status_string_roundtrip() {
        for status in &[
            ReservationStatus::Pending,
            ReservationStatus::Approved,
            ReservationStatus::Settled,
            ReservationStatus::Rejected,
            ReservationStatus::Cancelled,
        ] {
            let parsed: ReservationStatus = status.as_str().parse().unwrap();
            assert_eq!(&parsed, status);
        }
        assert!("Unknown".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn payment_method_parsing() {
        assert_eq!("Card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("GCash".parse::<PaymentMethod>().unwrap(), PaymentMethod::GCash);
        assert!("Cheque".parse::<PaymentMethod>().is_err());
    }
}
