//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::application::ReservationService;
use crate::domain::{DomainError, PaymentMethod, ReservationStatus};
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub service: Arc<ReservationService>,
}

pub async fn book_reservation(
    State(state): State<ReservationAppState>,
    ValidatedJson(req): ValidatedJson<BookReservationRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let date = parse_date(&req.date)?;
    let start = parse_time(&req.start)?;
    let reservation = state
        .service
        .book(&req.owner, &req.party_name, &req.contact, req.tables, date, start)
        .await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(&reservation))))
}

pub async fn edit_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<EditReservationRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let date = parse_date(&req.date)?;
    let start = parse_time(&req.start)?;
    let reservation = state
        .service
        .edit(&id, &req.owner, req.tables, date, start)
        .await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(&reservation))))
}

pub async fn approve_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state.service.approve(&id).await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(&reservation))))
}

pub async fn reject_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state.service.reject(&id).await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(&reservation))))
}

pub async fn settle_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<SettleReservationRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let payment: PaymentMethod = req.payment_method.parse()?;
    let reservation = state.service.settle(&id, payment).await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(&reservation))))
}

pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state.service.cancel(&id, &query.owner).await?;
    Ok(Json(ApiResponse::success(ReservationDto::from(&reservation))))
}

pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state
        .service
        .get(&id)
        .await
        .ok_or(DomainError::NotFound { id })?;
    Ok(Json(ApiResponse::success(ReservationDto::from(&reservation))))
}

pub async fn list_reservations(
    State(state): State<ReservationAppState>,
    Query(query): Query<ListReservationsQuery>,
) -> Result<Json<ApiResponse<Vec<ReservationDto>>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ReservationStatus>)
        .transpose()?;

    let records = match (query.owner.as_deref(), status) {
        (Some(owner), Some(status)) => {
            state.service.list_by_owner_and_status(owner, status).await
        }
        (Some(owner), None) => state.service.list_by_owner(owner).await,
        (None, Some(status)) => state.service.list_by_status(status).await,
        (None, None) => state.service.list_all().await,
    };

    let dtos = records.iter().map(ReservationDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn get_availability(
    State(state): State<ReservationAppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, ApiError> {
    let date = parse_date(&query.date)?;
    let start = parse_time(&query.start)?;
    let (window, available) = state.service.availability(date, start).await?;
    Ok(Json(ApiResponse::success(AvailabilityDto {
        date: window.date.format("%Y-%m-%d").to_string(),
        start: window.start.format("%H:%M").to_string(),
        end: window.end.format("%H:%M").to_string(),
        available_tables: available,
    })))
}
