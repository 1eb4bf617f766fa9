// File: crates/navbat_scheduling/src/handlers.rs
use crate::guard::{ReservationGuard, ReserveError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use navbat_config::{AppConfig, ServiceConfig};
use navbat_common::{HttpStatusCode, Reservation, ReservationStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

// Define shared state needed by scheduler handlers
#[derive(Clone)]
pub struct SchedulerState {
    pub config: Arc<AppConfig>,
    pub guard: Arc<ReservationGuard>,
    pub store: Arc<dyn ReservationStore>,
}

// --- Data Structures ---
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2026-09-07"))]
    pub date: String,

    /// Service catalog id
    #[cfg_attr(feature = "openapi", schema(example = "consultation"))]
    pub service_id: String,
}

#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotEntry {
    #[cfg_attr(feature = "openapi", schema(example = "2026-09-07T10:00:00+05:00"))]
    pub start_time: String, // ISO 8601, office timezone
    #[cfg_attr(feature = "openapi", schema(example = "2026-09-07T10:30:00+05:00"))]
    pub end_time: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailableSlotsResponse {
    pub slots: Vec<SlotEntry>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReserveRequest {
    pub subject_id: String,
    pub service_id: String,
    pub start_time: String, // ISO 8601 format string
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReserveResponse {
    pub success: bool,
    pub reservation: Option<Reservation>,
    pub message: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancelRequest {
    pub subject_id: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancellationResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SubjectReservationsQuery {
    pub subject_id: String,
    /// Include reservations that already ended
    #[serde(default)]
    pub include_past: bool,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReservationListResponse {
    pub reservations: Vec<Reservation>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct DayQuery {
    /// Date in YYYY-MM-DD format
    pub date: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceListResponse {
    pub services: Vec<ServiceConfig>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, (StatusCode, String)> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Invalid date format (YYYY-MM-DD)".to_string(),
        )
    })
}

fn lookup_service<'a>(
    config: &'a AppConfig,
    service_id: &str,
) -> Result<&'a ServiceConfig, (StatusCode, String)> {
    config.scheduling.service(service_id).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("Unknown service: {service_id}"),
        )
    })
}

fn error_response<E>(err: E) -> (StatusCode, String)
where
    E: HttpStatusCode + std::fmt::Display,
{
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.to_string())
}

/// Handler to get available start times for one day and service.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Available start times (may be empty)", body = AvailableSlotsResponse),
        (status = 400, description = "Bad request (invalid date, unknown service)"),
        (status = 503, description = "Record store unavailable")
    ),
    tag = "Scheduling"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<SchedulerState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailableSlotsResponse>, (StatusCode, String)> {
    let day = parse_date(&query.date)?;
    let service = lookup_service(&state.config, &query.service_id)?;

    if service.out_of_band {
        return Err((
            StatusCode::BAD_REQUEST,
            "This service does not take appointment slots.".to_string(),
        ));
    }

    let duration = chrono::Duration::minutes(service.duration_minutes);
    let times = state
        .guard
        .list_available(day, service)
        .await
        .map_err(error_response)?;

    let slots = times
        .into_iter()
        .map(|start| SlotEntry {
            start_time: start.to_rfc3339(),
            end_time: (start + duration).to_rfc3339(),
        })
        .collect();

    Ok(Json(AvailableSlotsResponse { slots }))
}

/// Handler to commit a reservation for a chosen slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/reserve",
    request_body = ReserveRequest,
    responses(
        (status = 200, description = "Reservation committed", body = ReserveResponse),
        (status = 400, description = "Invalid date or unknown service"),
        (status = 409, description = "Slot taken, active reservation exists, or same-day duplicate"),
        (status = 503, description = "Record store unavailable")
    ),
    tag = "Scheduling"
))]
pub async fn reserve_slot_handler(
    State(state): State<Arc<SchedulerState>>,
    Json(request): Json<ReserveRequest>,
) -> Result<Json<ReserveResponse>, (StatusCode, String)> {
    let service = lookup_service(&state.config, &request.service_id)?;

    let start = DateTime::parse_from_rfc3339(&request.start_time)
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Invalid start_time: {e}"),
            )
        })?
        .with_timezone(&state.guard.policy().timezone());

    match state.guard.reserve(&request.subject_id, service, start).await {
        Ok(reservation) => {
            info!("Reservation {} confirmed via API", reservation.id);
            Ok(Json(ReserveResponse {
                success: true,
                reservation: Some(reservation),
                message: "Reservation confirmed.".to_string(),
            }))
        }
        Err(err) => {
            let status = StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let message = match &err {
                ReserveError::ActiveReservationExists(active) => format!(
                    "An active reservation already exists: {} from {} to {}.",
                    active.service_id, active.start, active.end
                ),
                other => other.to_string(),
            };
            Err((status, message))
        }
    }
}

/// Handler to cancel a reservation.
///
/// The outcome is reported uniformly: zero rows affected can mean already
/// cancelled, never existed, or owned by another subject, and the caller
/// is not told which.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/reservations/{id}/cancel",
    request_body = CancelRequest,
    responses(
        (status = 200, description = "Cancellation outcome", body = CancellationResponse),
        (status = 503, description = "Record store unavailable")
    ),
    tag = "Scheduling"
))]
pub async fn cancel_reservation_handler(
    State(state): State<Arc<SchedulerState>>,
    Path(id): Path<String>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<CancellationResponse>, (StatusCode, String)> {
    let cancelled = state
        .guard
        .cancel(&request.subject_id, &id)
        .await
        .map_err(error_response)?;

    if cancelled {
        Ok(Json(CancellationResponse {
            success: true,
            message: "Reservation cancelled.".to_string(),
        }))
    } else {
        Ok(Json(CancellationResponse {
            success: false,
            message: "Reservation could not be cancelled.".to_string(),
        }))
    }
}

/// Handler to list one subject's reservations, upcoming by default.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/reservations",
    params(SubjectReservationsQuery),
    responses(
        (status = 200, description = "Reservations for the subject", body = ReservationListResponse),
        (status = 503, description = "Record store unavailable")
    ),
    tag = "Scheduling"
))]
pub async fn list_subject_reservations_handler(
    State(state): State<Arc<SchedulerState>>,
    Query(query): Query<SubjectReservationsQuery>,
) -> Result<Json<ReservationListResponse>, (StatusCode, String)> {
    let rows = state
        .store
        .list_for_subject(&query.subject_id)
        .await
        .map_err(error_response)?;

    // "Completed" is derived at read time; nothing is written back.
    let now = Utc::now();
    let reservations = rows
        .into_iter()
        .filter(|r| query.include_past || r.end > now)
        .collect();

    Ok(Json(ReservationListResponse { reservations }))
}

/// Handler to list the service catalog.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/services",
    responses(
        (status = 200, description = "Service catalog", body = ServiceListResponse)
    ),
    tag = "Scheduling"
))]
pub async fn list_services_handler(
    State(state): State<Arc<SchedulerState>>,
) -> Json<ServiceListResponse> {
    Json(ServiceListResponse {
        services: state.config.scheduling.services.clone(),
    })
}

/// Handler for the admin day overview: every booked reservation touching
/// one calendar day, ordered by start.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/reservations",
    params(DayQuery),
    responses(
        (status = 200, description = "Booked reservations for the day", body = ReservationListResponse),
        (status = 400, description = "Invalid date"),
        (status = 503, description = "Record store unavailable")
    ),
    tag = "Scheduling"
))]
pub async fn admin_day_handler(
    State(state): State<Arc<SchedulerState>>,
    Query(query): Query<DayQuery>,
) -> Result<Json<ReservationListResponse>, (StatusCode, String)> {
    let day = parse_date(&query.date)?;
    let (day_start, day_end) = state.guard.policy().day_bounds(day);

    let reservations = state
        .store
        .list_overlapping(day_start.with_timezone(&Utc), day_end.with_timezone(&Utc))
        .await
        .map_err(error_response)?;

    Ok(Json(ReservationListResponse { reservations }))
}
