//! Reservation aggregate
//!
//! Contains the Reservation entity, related types, and the persistence
//! adapter interfaces.

pub mod model;
pub mod repository;

pub use model::{PaymentMethod, Reservation, ReservationStatus};
pub use repository::{AuditRecord, AuditSink, IdSequence, ReservationStore};
