//! Reservation ledger
//!
//! Owns the live record collection, applies the status state machine and
//! enforces the capacity allocator before every booking or edit. Purely
//! synchronous; the service layer provides the mutual-exclusion boundary
//! and persistence.

use crate::application::allocator::{self, CapacityPolicy};
use crate::domain::{DomainError, DomainResult, Reservation, ReservationStatus, TimeWindow};

pub struct ReservationLedger {
    records: Vec<Reservation>,
    policy: CapacityPolicy,
}

impl ReservationLedger {
    pub fn new(policy: CapacityPolicy) -> Self {
        Self {
            records: Vec::new(),
            policy,
        }
    }

    /// Seed the ledger from a persisted record set.
    pub fn with_records(records: Vec<Reservation>, policy: CapacityPolicy) -> Self {
        Self { records, policy }
    }

    pub fn records(&self) -> &[Reservation] {
        &self.records
    }

    pub fn policy(&self) -> &CapacityPolicy {
        &self.policy
    }

    fn find(&self, id: &str) -> DomainResult<&Reservation> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::NotFound { id: id.to_string() })
    }

    fn find_mut(&mut self, id: &str) -> DomainResult<&mut Reservation> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::NotFound { id: id.to_string() })
    }

    /// Owner-scoped lookup. A wrong owner is indistinguishable from a
    /// missing record.
    fn find_owned_mut(&mut self, id: &str, owner: &str) -> DomainResult<&mut Reservation> {
        self.records
            .iter_mut()
            .find(|r| r.id == id && r.owner == owner)
            .ok_or_else(|| DomainError::NotFound { id: id.to_string() })
    }

    /// Tables still free for the candidate window.
    pub fn available(&self, candidate: &TimeWindow) -> i64 {
        allocator::available_tables(&self.records, candidate, None, &self.policy)
    }

    fn ensure_capacity(
        &self,
        candidate: &TimeWindow,
        tables: u32,
        exclude_id: Option<&str>,
    ) -> DomainResult<()> {
        if tables == 0 {
            return Err(DomainError::Validation(
                "at least one table must be requested".to_string(),
            ));
        }
        let free = allocator::available_tables(&self.records, candidate, exclude_id, &self.policy);
        if i64::from(tables) > free {
            return Err(DomainError::CapacityExceeded {
                requested: tables,
                available: free.max(0) as u32,
            });
        }
        Ok(())
    }

    /// Capacity pre-check for a prospective booking, without mutating.
    pub fn ensure_bookable(&self, window: &TimeWindow, tables: u32) -> DomainResult<()> {
        self.ensure_capacity(window, tables, None)
    }

    /// Create a Pending record for the given window, if capacity allows.
    /// The caller supplies a freshly generated id.
    pub fn book(
        &mut self,
        id: String,
        owner: &str,
        party_name: &str,
        contact: &str,
        tables: u32,
        window: TimeWindow,
    ) -> DomainResult<Reservation> {
        self.ensure_capacity(&window, tables, None)?;
        let reservation = Reservation::new(id, owner, party_name, contact, tables, window);
        self.records.push(reservation.clone());
        Ok(reservation)
    }

    /// Replace a Pending record's table count and window. The record's own
    /// current allocation is excluded from the occupied count, since it is
    /// being replaced.
    pub fn edit(
        &mut self,
        id: &str,
        owner: &str,
        tables: u32,
        window: TimeWindow,
    ) -> DomainResult<Reservation> {
        // Check existence/ownership and state before touching capacity, so
        // the error reported matches the actual obstacle.
        {
            let record = self
                .records
                .iter()
                .find(|r| r.id == id && r.owner == owner)
                .ok_or_else(|| DomainError::NotFound { id: id.to_string() })?;
            if record.status != ReservationStatus::Pending {
                return Err(DomainError::InvalidState {
                    id: id.to_string(),
                    status: record.status,
                    action: "edit",
                });
            }
        }
        self.ensure_capacity(&window, tables, Some(id))?;
        let record = self.find_owned_mut(id, owner)?;
        record.reschedule(tables, window)?;
        Ok(record.clone())
    }

    pub fn approve(&mut self, id: &str) -> DomainResult<Reservation> {
        let record = self.find_mut(id)?;
        record.approve()?;
        Ok(record.clone())
    }

    pub fn reject(&mut self, id: &str) -> DomainResult<Reservation> {
        let record = self.find_mut(id)?;
        record.reject()?;
        Ok(record.clone())
    }

    pub fn cancel(&mut self, id: &str, owner: &str) -> DomainResult<Reservation> {
        let record = self.find_owned_mut(id, owner)?;
        record.cancel()?;
        Ok(record.clone())
    }

    pub fn settle(&mut self, id: &str) -> DomainResult<Reservation> {
        let record = self.find_mut(id)?;
        record.settle()?;
        Ok(record.clone())
    }

    // ── Queries ────────────────────────────────────────────────

    /// All records, ordered by numeric id.
    pub fn list_all(&self) -> Vec<Reservation> {
        let mut records = self.records.clone();
        records.sort_by_key(|r| r.id.parse::<u64>().unwrap_or(u64::MAX));
        records
    }

    pub fn list_by_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.list_all()
            .into_iter()
            .filter(|r| r.status == status)
            .collect()
    }

    pub fn list_by_owner(&self, owner: &str) -> Vec<Reservation> {
        self.list_all()
            .into_iter()
            .filter(|r| r.owner == owner)
            .collect()
    }

    pub fn list_by_owner_and_status(
        &self,
        owner: &str,
        status: ReservationStatus,
    ) -> Vec<Reservation> {
        self.list_all()
            .into_iter()
            .filter(|r| r.owner == owner && r.status == status)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Reservation> {
        self.find(id).ok().cloned()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn status_of(&self, id: &str) -> Option<ReservationStatus> {
        self.records.iter().find(|r| r.id == id).map(|r| r.status)
    }
}

// ── Tests ──────────────────────────────────────────────────────
