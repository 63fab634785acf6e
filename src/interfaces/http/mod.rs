//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping and validated JSON
//! - `modules`: per-resource DTOs and handlers
//! - `router`: the assembled application router

pub mod common;
pub mod modules;
pub mod router;

pub use router::create_api_router;
