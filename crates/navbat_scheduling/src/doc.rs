// File: crates/navbat_scheduling/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{
    AvailabilityQuery, AvailableSlotsResponse, CancelRequest, CancellationResponse, DayQuery,
    ReservationListResponse, ReserveRequest, ReserveResponse, ServiceListResponse, SlotEntry,
    SubjectReservationsQuery,
};

/// OpenAPI documentation for the scheduling feature.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_availability_handler,
        crate::handlers::reserve_slot_handler,
        crate::handlers::cancel_reservation_handler,
        crate::handlers::list_subject_reservations_handler,
        crate::handlers::list_services_handler,
        crate::handlers::admin_day_handler,
    ),
    components(schemas(
        AvailabilityQuery,
        AvailableSlotsResponse,
        SlotEntry,
        ReserveRequest,
        ReserveResponse,
        CancelRequest,
        CancellationResponse,
        SubjectReservationsQuery,
        ReservationListResponse,
        DayQuery,
        ServiceListResponse,
    )),
    tags((name = "Scheduling", description = "Appointment availability and reservations"))
)]
pub struct SchedulingApiDoc;
