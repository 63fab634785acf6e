//! Business logic: capacity allocation, the reservation ledger and the
//! service façade exposed to the interfaces layer.

pub mod allocator;
pub mod ledger;
pub mod service;

// Re-export key types for convenience
pub use allocator::CapacityPolicy;
pub use ledger::ReservationLedger;
pub use service::ReservationService;
