//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::application::ReservationService;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub service: Arc<ReservationService>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub total_reservations: usize,
}

pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    let uptime = state.started_at.elapsed().as_secs();
    let total = state.service.list_all().await.len();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        total_reservations: total,
    })
}
