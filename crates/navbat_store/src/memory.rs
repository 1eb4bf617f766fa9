//! In-memory implementation of the reservation record store.
//!
//! Used by tests and by deployments without a `database` configuration.
//! Each operation takes the row lock once, so the conditional status update
//! keeps its single-operation atomicity here too.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use navbat_common::{
    BoxFuture, NewReservation, Reservation, ReservationStatus, ReservationStore, StoreError,
};
use tracing::debug;
use uuid::Uuid;

/// In-memory reservation store.
#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    rows: Mutex<Vec<Reservation>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Reservation>>, StoreError> {
        self.rows
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("store lock poisoned: {e}")))
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn list_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Reservation>, StoreError> {
        Box::pin(async move {
            let rows = self.lock()?;
            let mut out: Vec<Reservation> = rows
                .iter()
                .filter(|r| {
                    r.status == ReservationStatus::Booked && r.start < end && r.end > start
                })
                .cloned()
                .collect();
            out.sort_by_key(|r| r.start);
            Ok(out)
        })
    }

    fn insert_reservation(
        &self,
        new: NewReservation,
    ) -> BoxFuture<'_, Reservation, StoreError> {
        Box::pin(async move {
            let reservation = Reservation {
                id: Uuid::new_v4().to_string(),
                subject_id: new.subject_id,
                service_id: new.service_id,
                start: new.start,
                end: new.end,
                status: ReservationStatus::Booked,
            };
            debug!("Inserting reservation {}", reservation.id);
            self.lock()?.push(reservation.clone());
            Ok(reservation)
        })
    }

    fn conditional_update_status(
        &self,
        id: &str,
        subject_id: &str,
        expected_status: ReservationStatus,
        new_status: ReservationStatus,
    ) -> BoxFuture<'_, u64, StoreError> {
        let id = id.to_string();
        let subject_id = subject_id.to_string();

        Box::pin(async move {
            let mut rows = self.lock()?;
            match rows.iter_mut().find(|r| {
                r.id == id && r.subject_id == subject_id && r.status == expected_status
            }) {
                Some(row) => {
                    row.status = new_status;
                    Ok(1)
                }
                None => Ok(0),
            }
        })
    }

    fn find_active(
        &self,
        subject_id: &str,
        now: DateTime<Utc>,
    ) -> BoxFuture<'_, Option<Reservation>, StoreError> {
        let subject_id = subject_id.to_string();

        Box::pin(async move {
            let rows = self.lock()?;
            Ok(rows
                .iter()
                .find(|r| r.subject_id == subject_id && r.is_active(now))
                .cloned())
        })
    }

    fn find_same_day(
        &self,
        subject_id: &str,
        service_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> BoxFuture<'_, Option<Reservation>, StoreError> {
        let subject_id = subject_id.to_string();
        let service_id = service_id.to_string();

        Box::pin(async move {
            let rows = self.lock()?;
            Ok(rows
                .iter()
                .find(|r| {
                    r.subject_id == subject_id
                        && r.service_id == service_id
                        && r.status == ReservationStatus::Booked
                        && r.start >= day_start
                        && r.start < day_end
                })
                .cloned())
        })
    }

    fn list_for_subject(&self, subject_id: &str) -> BoxFuture<'_, Vec<Reservation>, StoreError> {
        let subject_id = subject_id.to_string();

        Box::pin(async move {
            let rows = self.lock()?;
            let mut out: Vec<Reservation> = rows
                .iter()
                .filter(|r| r.subject_id == subject_id)
                .cloned()
                .collect();
            out.sort_by_key(|r| r.start);
            Ok(out)
        })
    }
}
