//! API router

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::ReservationService;

use super::modules::health::{self, HealthState};
use super::modules::reservations::{self, ReservationAppState};

/// Build the full application router.
pub fn create_api_router(service: Arc<ReservationService>) -> Router {
    let health_state = HealthState {
        service: service.clone(),
        started_at: Arc::new(Instant::now()),
    };
    let reservation_state = ReservationAppState { service };

    let reservations = Router::new()
        .route(
            "/reservations",
            post(reservations::handlers::book_reservation)
                .get(reservations::handlers::list_reservations),
        )
        .route(
            "/reservations/{id}",
            get(reservations::handlers::get_reservation)
                .put(reservations::handlers::edit_reservation)
                .delete(reservations::handlers::cancel_reservation),
        )
        .route(
            "/reservations/{id}/approve",
            post(reservations::handlers::approve_reservation),
        )
        .route(
            "/reservations/{id}/reject",
            post(reservations::handlers::reject_reservation),
        )
        .route(
            "/reservations/{id}/settle",
            post(reservations::handlers::settle_reservation),
        )
        .route("/availability", get(reservations::handlers::get_availability))
        .with_state(reservation_state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state)
        .nest("/api/v1", reservations)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CapacityPolicy;
    use crate::infrastructure::storage::{
        InMemoryAuditSink, InMemoryIdSequence, InMemoryReservationStore,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn app() -> Router {
        let service = ReservationService::bootstrap(
            Arc::new(InMemoryReservationStore::new()),
            Arc::new(InMemoryIdSequence::new()),
            Arc::new(InMemoryAuditSink::new()),
            CapacityPolicy::default(),
            chrono::Duration::hours(2),
        )
        .await
        .unwrap();
        create_api_router(Arc::new(service))
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let response = app()
            .await
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn book_then_conflicting_book_maps_to_conflict() {
        let app = app().await;

        let body = r#"{"owner":"alice","party_name":"Alice","contact":"0917","tables":10,"date":"2025-09-30","start":"18:00"}"#;
        let response = app
            .clone()
            .oneshot(json_post("/api/v1/reservations", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = r#"{"owner":"bob","party_name":"Bob","contact":"0918","tables":1,"date":"2025-09-30","start":"18:30"}"#;
        let response = app
            .clone()
            .oneshot(json_post("/api/v1/reservations", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_payloads_are_rejected() {
        let app = app().await;

        // Zero tables fails the validator derive.
        let body = r#"{"owner":"alice","party_name":"Alice","contact":"0917","tables":0,"date":"2025-09-30","start":"18:00"}"#;
        let response = app
            .clone()
            .oneshot(json_post("/api/v1/reservations", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // Bad date format is caught by the DTO parser.
        let body = r#"{"owner":"alice","party_name":"Alice","contact":"0917","tables":2,"date":"30/09/2025","start":"18:00"}"#;
        let response = app
            .clone()
            .oneshot(json_post("/api/v1/reservations", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_reservation_is_not_found() {
        let response = app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/api/v1/reservations/999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn settle_pending_maps_to_conflict() {
        let app = app().await;

        let body = r#"{"owner":"alice","party_name":"Alice","contact":"0917","tables":2,"date":"2025-09-30","start":"18:00"}"#;
        let response = app
            .clone()
            .oneshot(json_post("/api/v1/reservations", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/v1/reservations/1/settle",
                r#"{"payment_method":"Card"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
