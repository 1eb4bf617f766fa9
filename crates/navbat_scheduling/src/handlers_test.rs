#[cfg(test)]
mod tests {
    use crate::guard::ReservationGuard;
    use crate::handlers::{
        cancel_reservation_handler, get_availability_handler, AvailabilityQuery, CancelRequest,
        SchedulerState,
    };
    use crate::policy::CalendarPolicy;
    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::Json;
    use navbat_common::ReservationStore;
    use navbat_config::{AppConfig, ServiceConfig};
    use navbat_store::InMemoryReservationStore;
    use std::sync::Arc;

    fn state() -> Arc<SchedulerState> {
        let mut config = AppConfig::default();
        config.scheduling.services.push(ServiceConfig {
            id: "consult".to_string(),
            name: "Consultation".to_string(),
            duration_minutes: 30,
            out_of_band: false,
        });
        let config = Arc::new(config);
        let store: Arc<dyn ReservationStore> = Arc::new(InMemoryReservationStore::new());
        let policy = CalendarPolicy::from_config(&config.scheduling).unwrap();
        let guard = Arc::new(ReservationGuard::new(policy, store.clone()));
        Arc::new(SchedulerState {
            config,
            guard,
            store,
        })
    }

    #[tokio::test]
    async fn availability_on_blackout_renders_no_slots_not_an_error() {
        // 2026-09-05 is a Saturday.
        let response = get_availability_handler(
            State(state()),
            Query(AvailabilityQuery {
                date: "2026-09-05".to_string(),
                service_id: "consult".to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(response.0.slots.is_empty());
    }

    #[tokio::test]
    async fn unknown_service_is_a_bad_request() {
        let err = get_availability_handler(
            State(state()),
            Query(AvailabilityQuery {
                date: "2026-09-07".to_string(),
                service_id: "nope".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_date_is_a_bad_request() {
        let err = get_availability_handler(
            State(state()),
            Query(AvailabilityQuery {
                date: "07.09.2026".to_string(),
                service_id: "consult".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cancelling_an_unknown_reservation_reports_uniform_failure() {
        let response = cancel_reservation_handler(
            State(state()),
            Path("does-not-exist".to_string()),
            Json(CancelRequest {
                subject_id: "u1".to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(!response.0.success);
    }
}
