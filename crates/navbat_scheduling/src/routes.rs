// --- File: crates/navbat_scheduling/src/routes.rs ---

use crate::guard::ReservationGuard;
use crate::handlers::{
    admin_day_handler, cancel_reservation_handler, get_availability_handler,
    list_services_handler, list_subject_reservations_handler, reserve_slot_handler,
    SchedulerState,
};
use crate::policy::{CalendarPolicy, PolicyError};
use axum::{
    routing::{get, patch, post},
    Router,
};
use navbat_config::AppConfig;
use navbat_common::ReservationStore;
use std::sync::Arc;

/// Creates a router containing all routes for the scheduling feature.
///
/// The calendar policy is validated once here; a bad calendar config is a
/// startup failure, not a per-request one.
pub fn routes(
    config: Arc<AppConfig>,
    store: Arc<dyn ReservationStore>,
) -> Result<Router, PolicyError> {
    let policy = CalendarPolicy::from_config(&config.scheduling)?;
    let guard = Arc::new(ReservationGuard::new(policy, store.clone()));
    let state = Arc::new(SchedulerState {
        config,
        guard,
        store,
    });

    Ok(Router::new()
        .route("/availability", get(get_availability_handler))
        .route("/reserve", post(reserve_slot_handler))
        .route("/reservations", get(list_subject_reservations_handler))
        .route("/reservations/{id}/cancel", patch(cancel_reservation_handler))
        .route("/services", get(list_services_handler))
        .route("/admin/reservations", get(admin_day_handler))
        .with_state(state))
}
