//! Infrastructure layer - external concerns

pub mod storage;

pub use storage::{
    FileAuditSink, FileIdSequence, InMemoryAuditSink, InMemoryIdSequence,
    InMemoryReservationStore, JsonlReservationStore,
};
