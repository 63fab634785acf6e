//! In-memory persistence adapters for development and testing

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    AuditRecord, AuditSink, DomainResult, IdSequence, Reservation, ReservationStore,
};

/// In-memory reservation store: load clones the snapshot, flush replaces it.
#[derive(Default)]
pub struct InMemoryReservationStore {
    records: Mutex<Vec<Reservation>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn load(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn flush(&self, records: &[Reservation]) -> DomainResult<()> {
        *self.records.lock().unwrap() = records.to_vec();
        Ok(())
    }
}

/// Monotonic in-memory counter.
pub struct InMemoryIdSequence {
    counter: AtomicU64,
}

impl InMemoryIdSequence {
    pub fn new() -> Self {
        Self::starting_after(0)
    }

    /// Resume after a previously issued id.
    pub fn starting_after(last: u64) -> Self {
        Self {
            counter: AtomicU64::new(last),
        }
    }
}

impl Default for InMemoryIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdSequence for InMemoryIdSequence {
    async fn next_id(&self) -> DomainResult<String> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(id.to_string())
    }
}

/// Audit sink that keeps settlement records in memory; tests inspect them
/// through [`entries`](Self::entries).
#[derive(Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditRecord> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, record: AuditRecord) -> DomainResult<()> {
        self.entries.lock().unwrap().push(record);
        Ok(())
    }
}
