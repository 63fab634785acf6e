//! Persistence adapter interfaces
//!
//! The ledger owns the live record set; these traits are the abstract
//! services it needs from the outside world: a durable record store, a
//! crash-consistent monotonic ID sequence, and an append-only audit sink
//! for settlement snapshots.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{PaymentMethod, Reservation, ReservationStatus};
use crate::domain::DomainResult;

/// Durable load/flush of the full reservation set.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Load all persisted reservations (empty set if nothing was saved yet).
    async fn load(&self) -> DomainResult<Vec<Reservation>>;

    /// Replace the persisted set with the given records.
    async fn flush(&self, records: &[Reservation]) -> DomainResult<()>;
}

/// Monotonic reservation ID sequence.
///
/// Implementations must persist the incremented counter before returning
/// the new id, so a crash between steps can never hand out the same id
/// twice across restarts.
#[async_trait]
pub trait IdSequence: Send + Sync {
    async fn next_id(&self) -> DomainResult<String>;
}

/// One settlement snapshot, as appended to the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub party_name: String,
    pub contact: String,
    pub tables: u32,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub status: ReservationStatus,
    pub payment_method: PaymentMethod,
    pub settled_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Snapshot a just-settled reservation.
    pub fn settlement(reservation: &Reservation, payment_method: PaymentMethod) -> Self {
        Self {
            id: reservation.id.clone(),
            party_name: reservation.party_name.clone(),
            contact: reservation.contact.clone(),
            tables: reservation.tables,
            date: reservation.window.date,
            start: reservation.window.start,
            end: reservation.window.end,
            status: reservation.status,
            payment_method,
            settled_at: Utc::now(),
        }
    }
}

/// Append-only sink for settlement audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, record: AuditRecord) -> DomainResult<()>;
}
