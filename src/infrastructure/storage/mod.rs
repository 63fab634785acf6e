//! Persistence adapter implementations

mod file;
mod memory;

pub use file::{FileAuditSink, FileIdSequence, JsonlReservationStore};
pub use memory::{InMemoryAuditSink, InMemoryIdSequence, InMemoryReservationStore};
