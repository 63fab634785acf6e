//! Table capacity allocator
//!
//! Pure overlap-and-sum computation over the current record set. No side
//! effects; the ledger consults it before every mutation.

use crate::domain::{Reservation, ReservationStatus, TimeWindow};

/// Capacity accounting policy.
#[derive(Debug, Clone, Copy)]
pub struct CapacityPolicy {
    /// Fixed total number of tables available system-wide.
    pub pool_size: u32,
    /// Whether Settled reservations keep occupying their tables. The
    /// original system counted them; kept as an explicit switch.
    pub settled_occupies: bool,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self {
            pool_size: 10,
            settled_occupies: true,
        }
    }
}

impl CapacityPolicy {
    /// Whether a record in this status holds tables against the pool.
    /// Rejected and Cancelled never do.
    pub fn counts(&self, status: ReservationStatus) -> bool {
        match status {
            ReservationStatus::Pending | ReservationStatus::Approved => true,
            ReservationStatus::Settled => self.settled_occupies,
            ReservationStatus::Rejected | ReservationStatus::Cancelled => false,
        }
    }
}

/// Number of tables still free for `candidate`, given the existing records.
///
/// `exclude_id` removes one record's own allocation from the occupied count,
/// used when that record's window is being replaced by an edit.
///
/// The result can only go negative if the record set already violates the
/// over-booking invariant; callers clamp the acceptable request to
/// `[1, min(pool, free)]`.
pub fn available_tables<'a, I>(
    records: I,
    candidate: &TimeWindow,
    exclude_id: Option<&str>,
    policy: &CapacityPolicy,
) -> i64
where
    I: IntoIterator<Item = &'a Reservation>,
{
    let mut free = i64::from(policy.pool_size);
    for record in records {
        if Some(record.id.as_str()) == exclude_id {
            continue;
        }
        if policy.counts(record.status) && record.window.overlaps(candidate) {
            free -= i64::from(record.tables);
        }
    }
    free
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            start.parse().unwrap(),
            end.parse().unwrap(),
        )
        .unwrap()
    }

    fn reservation(id: &str, tables: u32, start: &str, end: &str) -> Reservation {
        Reservation::new(id, "alice", "Alice", "0917", tables, window(start, end))
    }

    #[test]
    fn empty_set_leaves_full_pool() {
        let policy = CapacityPolicy::default();
        let records: Vec<Reservation> = Vec::new();
        let free = available_tables(&records, &window("18:00:00", "20:00:00"), None, &policy);
        assert_eq!(free, 10);
    }

    #[test]
    fn overlapping_allocations_are_summed() {
        let policy = CapacityPolicy::default();
        let records = vec![
            reservation("1", 3, "18:00:00", "20:00:00"),
            reservation("2", 2, "19:00:00", "21:00:00"),
            reservation("3", 4, "12:00:00", "14:00:00"), // disjoint
        ];
        let free = available_tables(&records, &window("19:30:00", "20:30:00"), None, &policy);
        assert_eq!(free, 5);
    }

    #[test]
    fn cancelled_and_rejected_do_not_count() {
        let policy = CapacityPolicy::default();
        let mut cancelled = reservation("1", 5, "18:00:00", "20:00:00");
        cancelled.cancel().unwrap();
        let mut rejected = reservation("2", 5, "18:00:00", "20:00:00");
        rejected.reject().unwrap();

        let free = available_tables(
            [&cancelled, &rejected],
            &window("18:00:00", "20:00:00"),
            None,
            &policy,
        );
        assert_eq!(free, 10);
    }

    #[test]
    fn settled_counting_follows_policy() {
        let mut settled = reservation("1", 6, "18:00:00", "20:00:00");
        settled.approve().unwrap();
        settled.settle().unwrap();
        let candidate = window("18:00:00", "20:00:00");

        let occupying = CapacityPolicy::default();
        assert_eq!(available_tables([&settled], &candidate, None, &occupying), 4);

        let releasing = CapacityPolicy {
            settled_occupies: false,
            ..CapacityPolicy::default()
        };
        assert_eq!(available_tables([&settled], &candidate, None, &releasing), 10);
    }

    #[test]
    fn excluded_record_frees_its_own_allocation() {
        let policy = CapacityPolicy::default();
        let records = vec![
            reservation("1", 6, "18:00:00", "20:00:00"),
            reservation("2", 2, "18:00:00", "20:00:00"),
        ];
        let candidate = window("18:30:00", "19:30:00");
        assert_eq!(available_tables(&records, &candidate, None, &policy), 2);
        assert_eq!(available_tables(&records, &candidate, Some("1"), &policy), 8);
    }
}
