//! Time window value type
//!
//! A reservation occupies a `(date, start, end)` span within a single day.
//! Overlap uses half-open intervals: `[09:00, 11:00)` and `[11:00, 13:00)`
//! do not overlap. Overnight windows (end past midnight) are not supported.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::error::{DomainError, DomainResult};

/// A date plus start/end time-of-day defining a reservation's occupancy span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Build a window from explicit bounds. Fails if `start >= end`.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> DomainResult<Self> {
        if start >= end {
            return Err(DomainError::Validation(format!(
                "window start {} must be before end {}",
                start.format("%H:%M"),
                end.format("%H:%M"),
            )));
        }
        Ok(Self { date, start, end })
    }

    /// Build a window from a start time and a service duration.
    ///
    /// Fails if the duration is not positive or if the window would cross
    /// midnight (same-day windows only).
    pub fn from_start(date: NaiveDate, start: NaiveTime, duration: Duration) -> DomainResult<Self> {
        if duration <= Duration::zero() {
            return Err(DomainError::Validation(
                "service duration must be positive".to_string(),
            ));
        }
        let (end, wrapped) = start.overflowing_add_signed(duration);
        if wrapped != 0 {
            return Err(DomainError::Validation(format!(
                "window starting at {} would cross midnight",
                start.format("%H:%M"),
            )));
        }
        Self::new(date, start, end)
    }

    /// Half-open overlap test. Windows on different dates never overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.date,
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
        )
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            start.parse().unwrap(),
            end.parse().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn overlapping_windows() {
        let a = window("09:00:00", "11:00:00");
        let b = window("10:59:00", "12:00:00");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn adjacent_windows_do_not_overlap() {
        let a = window("09:00:00", "11:00:00");
        let b = window("11:00:00", "13:00:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contained_window_overlaps() {
        let outer = window("18:00:00", "20:00:00");
        let inner = window("18:30:00", "19:30:00");
        assert!(outer.overlaps(&inner));
    }

    #[test]
    fn different_dates_never_overlap() {
        let a = window("09:00:00", "11:00:00");
        let b = TimeWindow::new(
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            "09:00:00".parse().unwrap(),
            "11:00:00".parse().unwrap(),
        )
        .unwrap();
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn inverted_window_rejected() {
        let result = TimeWindow::new(
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            "11:00:00".parse().unwrap(),
            "09:00:00".parse().unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_length_window_rejected() {
        let t: NaiveTime = "11:00:00".parse().unwrap();
        let result = TimeWindow::new(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(), t, t);
        assert!(result.is_err());
    }

    #[test]
    fn from_start_applies_duration() {
        let w = TimeWindow::from_start(
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            "18:00:00".parse().unwrap(),
            Duration::hours(2),
        )
        .unwrap();
        assert_eq!(w.end, "20:00:00".parse::<NaiveTime>().unwrap());
    }

    #[test]
    fn from_start_rejects_midnight_crossing() {
        let result = TimeWindow::from_start(
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            "23:30:00".parse().unwrap(),
            Duration::hours(2),
        );
        assert!(result.is_err());
    }
}
