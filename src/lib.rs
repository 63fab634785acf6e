//! # Reserve Eat
//!
//! Restaurant table reservation service: books tables against a fixed
//! inventory, guards against double-booking through time-interval overlap
//! checks, and moves each booking through an approval/payment lifecycle.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits
//! - **application**: Capacity allocation, the reservation ledger and the
//!   service façade
//! - **infrastructure**: Persistence adapters (JSON Lines store, ID
//!   counter, audit log)
//! - **interfaces**: REST API
//! - **support**: Graceful shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export the main service types for easy access
pub use application::{CapacityPolicy, ReservationLedger, ReservationService};

// Re-export API router
pub use interfaces::http::create_api_router;
