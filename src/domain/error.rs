//! Domain errors

use thiserror::Error;

use super::reservation::ReservationStatus;

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// No reservation matches the given id (and owner, for owner-scoped ops)
    #[error("Reservation not found: {id}")]
    NotFound { id: String },

    /// Operation is not legal for the reservation's current status
    #[error("Reservation {id} is {status}, cannot {action}")]
    InvalidState {
        id: String,
        status: ReservationStatus,
        action: &'static str,
    },

    /// Requested tables exceed remaining availability for the window
    #[error("Capacity exceeded: requested {requested} tables, {available} available")]
    CapacityExceeded { requested: u32, available: u32 },

    /// Caller-contract violation surfaced at the boundary
    #[error("Validation: {0}")]
    Validation(String),

    /// Persistence failure (store unreadable or unwritable)
    #[error("Storage unavailable: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
