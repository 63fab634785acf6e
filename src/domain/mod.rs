//! Core business entities, types and traits

pub mod error;
pub mod reservation;
pub mod window;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use reservation::{
    AuditRecord, AuditSink, IdSequence, PaymentMethod, Reservation, ReservationStatus,
    ReservationStore,
};
pub use window::TimeWindow;
