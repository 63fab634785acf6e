//! Reservation business logic service
//!
//! Async façade over the synchronous ledger. One `tokio::sync::Mutex` is
//! the single mutual-exclusion boundary: the allocator-check-then-mutate
//! sequence inside each operation is a check-then-act race otherwise.
//! Every accepted mutation is flushed to the store before the lock is
//! released (single-writer durable store).

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::application::allocator::CapacityPolicy;
use crate::application::ledger::ReservationLedger;
use crate::domain::{
    AuditRecord, AuditSink, DomainError, DomainResult, IdSequence, PaymentMethod, Reservation,
    ReservationStatus, ReservationStore, TimeWindow,
};

/// Service for reservation operations
pub struct ReservationService {
    ledger: Mutex<ReservationLedger>,
    store: Arc<dyn ReservationStore>,
    ids: Arc<dyn IdSequence>,
    audit: Arc<dyn AuditSink>,
    service_duration: Duration,
}

impl ReservationService {
    /// Load the persisted record set and build the service around it.
    ///
    /// A load failure is reported to the caller instead of silently
    /// starting with an empty ledger.
    pub async fn bootstrap(
        store: Arc<dyn ReservationStore>,
        ids: Arc<dyn IdSequence>,
        audit: Arc<dyn AuditSink>,
        policy: CapacityPolicy,
        service_duration: Duration,
    ) -> DomainResult<Self> {
        let records = store.load().await?;
        info!(count = records.len(), "Reservation ledger loaded");
        Ok(Self {
            ledger: Mutex::new(ReservationLedger::with_records(records, policy)),
            store,
            ids,
            audit,
            service_duration,
        })
    }

    /// The fixed per-booking window: `start + service_duration`, same day.
    fn window_for(&self, date: NaiveDate, start: NaiveTime) -> DomainResult<TimeWindow> {
        TimeWindow::from_start(date, start, self.service_duration)
    }

    /// Flush the full record set; a failure degrades to in-memory
    /// operation for the rest of the session rather than failing the
    /// already-applied mutation.
    async fn persist(&self, ledger: &ReservationLedger) {
        if let Err(e) = self.store.flush(ledger.records()).await {
            warn!(error = %e, "Failed to flush reservation store, continuing in memory");
        }
    }

    /// Book a new reservation. Created Pending with a freshly generated id.
    pub async fn book(
        &self,
        owner: &str,
        party_name: &str,
        contact: &str,
        tables: u32,
        date: NaiveDate,
        start: NaiveTime,
    ) -> DomainResult<Reservation> {
        let window = self.window_for(date, start)?;
        let mut ledger = self.ledger.lock().await;
        // Check capacity before consuming an id; ids are never recycled,
        // so a rejected booking should not burn one.
        ledger.ensure_bookable(&window, tables)?;
        let id = self.ids.next_id().await?;
        let reservation = ledger.book(id, owner, party_name, contact, tables, window)?;
        self.persist(&ledger).await;
        info!(
            id = %reservation.id,
            owner,
            tables,
            window = %reservation.window,
            "Reservation booked"
        );
        Ok(reservation)
    }

    /// Edit a Pending reservation's table count and window (owner-scoped).
    pub async fn edit(
        &self,
        id: &str,
        owner: &str,
        tables: u32,
        date: NaiveDate,
        start: NaiveTime,
    ) -> DomainResult<Reservation> {
        let window = self.window_for(date, start)?;
        let mut ledger = self.ledger.lock().await;
        let reservation = ledger.edit(id, owner, tables, window)?;
        self.persist(&ledger).await;
        info!(id, owner, tables, window = %reservation.window, "Reservation edited");
        Ok(reservation)
    }

    pub async fn approve(&self, id: &str) -> DomainResult<Reservation> {
        let mut ledger = self.ledger.lock().await;
        let reservation = ledger.approve(id)?;
        self.persist(&ledger).await;
        info!(id, "Reservation approved");
        Ok(reservation)
    }

    pub async fn reject(&self, id: &str) -> DomainResult<Reservation> {
        let mut ledger = self.ledger.lock().await;
        let reservation = ledger.reject(id)?;
        self.persist(&ledger).await;
        info!(id, "Reservation rejected");
        Ok(reservation)
    }

    pub async fn cancel(&self, id: &str, owner: &str) -> DomainResult<Reservation> {
        let mut ledger = self.ledger.lock().await;
        let reservation = ledger.cancel(id, owner)?;
        self.persist(&ledger).await;
        info!(id, owner, "Reservation cancelled");
        Ok(reservation)
    }

    /// Settle an Approved reservation. The audit record (full snapshot,
    /// payment label, settlement timestamp) must land before the transition
    /// is applied: an unavailable audit log surfaces as `Storage` and the
    /// reservation stays Approved, keeping one audit line per settlement.
    pub async fn settle(
        &self,
        id: &str,
        payment_method: PaymentMethod,
    ) -> DomainResult<Reservation> {
        let mut ledger = self.ledger.lock().await;
        // Run the state guard on a snapshot first; the snapshot carries the
        // Settled status into the audit line.
        let mut snapshot = ledger
            .get(id)
            .ok_or_else(|| DomainError::NotFound { id: id.to_string() })?;
        snapshot.settle()?;
        self.audit
            .append(AuditRecord::settlement(&snapshot, payment_method))
            .await?;
        let reservation = ledger.settle(id)?;
        self.persist(&ledger).await;
        info!(id, payment = %payment_method, "Reservation settled");
        Ok(reservation)
    }

    /// Tables still free for the window starting at `start`, clamped to 0.
    pub async fn availability(
        &self,
        date: NaiveDate,
        start: NaiveTime,
    ) -> DomainResult<(TimeWindow, u32)> {
        let window = self.window_for(date, start)?;
        let ledger = self.ledger.lock().await;
        let free = ledger.available(&window).max(0) as u32;
        Ok((window, free))
    }

    // ── Queries ────────────────────────────────────────────────

    pub async fn list_all(&self) -> Vec<Reservation> {
        self.ledger.lock().await.list_all()
    }

    pub async fn list_by_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.ledger.lock().await.list_by_status(status)
    }

    pub async fn list_by_owner(&self, owner: &str) -> Vec<Reservation> {
        self.ledger.lock().await.list_by_owner(owner)
    }

    pub async fn list_by_owner_and_status(
        &self,
        owner: &str,
        status: ReservationStatus,
    ) -> Vec<Reservation> {
        self.ledger
            .lock()
            .await
            .list_by_owner_and_status(owner, status)
    }

    pub async fn get(&self, id: &str) -> Option<Reservation> {
        self.ledger.lock().await.get(id)
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.ledger.lock().await.exists(id)
    }

    pub async fn status_of(&self, id: &str) -> Option<ReservationStatus> {
        self.ledger.lock().await.status_of(id)
    }

    /// Force a full flush; used by the shutdown hook.
    pub async fn flush_all(&self) -> DomainResult<()> {
        let ledger = self.ledger.lock().await;
        self.store.flush(ledger.records()).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{
        InMemoryAuditSink, InMemoryIdSequence, InMemoryReservationStore,
    };

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        s.parse().unwrap()
    }

    struct Fixture {
        store: Arc<InMemoryReservationStore>,
        ids: Arc<InMemoryIdSequence>,
        audit: Arc<InMemoryAuditSink>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(InMemoryReservationStore::new()),
                ids: Arc::new(InMemoryIdSequence::new()),
                audit: Arc::new(InMemoryAuditSink::new()),
            }
        }

        async fn service(&self) -> ReservationService {
            ReservationService::bootstrap(
                self.store.clone(),
                self.ids.clone(),
                self.audit.clone(),
                CapacityPolicy::default(),
                Duration::hours(2),
            )
            .await
            .unwrap()
        }
    }

    #[tokio::test]
    async fn book_approve_settle_emits_one_audit_record() {
        let fx = Fixture::new();
        let svc = fx.service().await;

        let r = svc
            .book("alice", "Alice", "0917", 4, date(), time("18:00:00"))
            .await
            .unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);

        let r = svc.approve(&r.id).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Approved);

        let r = svc.settle(&r.id, PaymentMethod::Card).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Settled);

        let entries = fx.audit.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, r.id);
        assert_eq!(entries[0].payment_method, PaymentMethod::Card);
        assert_eq!(entries[0].status, ReservationStatus::Settled);

        // Settling again fails and appends nothing.
        let err = svc.settle(&r.id, PaymentMethod::Card).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState { .. }));
        assert_eq!(fx.audit.entries().len(), 1);
    }

    #[tokio::test]
    async fn booking_scenario_against_capacity() {
        let fx = Fixture::new();
        let svc = fx.service().await;

        svc.book("alice", "Alice", "0917", 6, date(), time("18:00:00"))
            .await
            .unwrap();
        let (_, free) = svc.availability(date(), time("18:00:00")).await.unwrap();
        assert_eq!(free, 4);

        let err = svc
            .book("bob", "Bob", "0918", 5, date(), time("18:30:00"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::CapacityExceeded {
                requested: 5,
                available: 4
            }
        ));

        svc.book("bob", "Bob", "0918", 4, date(), time("18:30:00"))
            .await
            .unwrap();
        let (_, free) = svc.availability(date(), time("18:30:00")).await.unwrap();
        assert_eq!(free, 0);
    }

    #[tokio::test]
    async fn rejected_booking_burns_no_id() {
        let fx = Fixture::new();
        let svc = fx.service().await;

        svc.book("alice", "Alice", "0917", 10, date(), time("18:00:00"))
            .await
            .unwrap();
        let _ = svc
            .book("bob", "Bob", "0918", 1, date(), time("18:00:00"))
            .await
            .unwrap_err();
        let next = svc
            .book("bob", "Bob", "0918", 1, date(), time("21:00:00"))
            .await
            .unwrap();
        assert_eq!(next.id, "2");
    }

    #[tokio::test]
    async fn mutations_are_flushed_and_survive_reload() {
        let fx = Fixture::new();
        {
            let svc = fx.service().await;
            let r = svc
                .book("alice", "Alice", "0917", 3, date(), time("12:00:00"))
                .await
                .unwrap();
            svc.approve(&r.id).await.unwrap();
            svc.book("bob", "Bob", "0918", 2, date(), time("15:00:00"))
                .await
                .unwrap();
        }

        // A fresh service over the same store sees the identical set.
        let svc = fx.service().await;
        let records = svc.list_all().await;
        assert_eq!(records.len(), 2);
        assert_eq!(svc.status_of("1").await, Some(ReservationStatus::Approved));
        assert_eq!(svc.status_of("2").await, Some(ReservationStatus::Pending));
    }

    #[tokio::test]
    async fn midnight_crossing_booking_rejected() {
        let fx = Fixture::new();
        let svc = fx.service().await;
        let err = svc
            .book("alice", "Alice", "0917", 2, date(), time("23:30:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    struct UnavailableAuditSink;

    #[async_trait::async_trait]
    impl AuditSink for UnavailableAuditSink {
        async fn append(&self, _record: AuditRecord) -> DomainResult<()> {
            Err(DomainError::Storage("audit log unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn settle_with_unavailable_audit_log_leaves_record_approved() {
        let svc = ReservationService::bootstrap(
            Arc::new(InMemoryReservationStore::new()),
            Arc::new(InMemoryIdSequence::new()),
            Arc::new(UnavailableAuditSink),
            CapacityPolicy::default(),
            Duration::hours(2),
        )
        .await
        .unwrap();

        let r = svc
            .book("alice", "Alice", "0917", 4, date(), time("18:00:00"))
            .await
            .unwrap();
        svc.approve(&r.id).await.unwrap();

        let err = svc.settle(&r.id, PaymentMethod::Card).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        assert_eq!(
            svc.status_of(&r.id).await,
            Some(ReservationStatus::Approved)
        );

        // The sink comes back: settlement now goes through.
        let fx = Fixture::new();
        let svc = fx.service().await;
        let r = svc
            .book("alice", "Alice", "0917", 4, date(), time("18:00:00"))
            .await
            .unwrap();
        svc.approve(&r.id).await.unwrap();
        svc.settle(&r.id, PaymentMethod::Card).await.unwrap();
        assert_eq!(fx.audit.entries().len(), 1);
    }

    #[tokio::test]
    async fn sequential_ids_are_distinct_and_increasing() {
        let ids = InMemoryIdSequence::new();
        let mut previous = 0u64;
        for _ in 0..1000 {
            let id: u64 = ids.next_id().await.unwrap().parse().unwrap();
            assert!(id > previous);
            previous = id;
        }
    }
}
