// --- File: crates/navbat_scheduling/src/guard.rs ---
//! Reservation guard: the concurrency-critical commit path.
//!
//! `reserve` re-validates the chosen slot at commit time, enforces the
//! per-subject invariants and performs the insert. The check-then-act
//! window between the capacity re-read and the insert is closed by
//! serializing the whole sequence per affected calendar day behind a keyed
//! async lock: two commits racing for the same day run one after the
//! other, so the loser sees the winner's row in its timeline re-read.
//! `cancel` is a single conditional store update and needs no lock.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use navbat_config::ServiceConfig;
use navbat_common::{
    HttpStatusCode, NewReservation, Reservation, ReservationStatus, ReservationStore, StoreError,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::logic::list_available_times;
use crate::policy::CalendarPolicy;
use crate::timeline::{build_timeline, span_is_free};

/// Why a commit was refused. All variants are recoverable and local to one
/// request; none corrupt shared state.
#[derive(Error, Debug)]
pub enum ReserveError {
    /// Blackout or past date selected.
    #[error("Selected date is not bookable")]
    InvalidDate,

    /// The capacity or time re-check failed at commit; the caller should
    /// re-query availability for a fresh list.
    #[error("Slot is no longer available")]
    SlotNoLongerAvailable,

    /// The subject already holds an active reservation (carried for
    /// display).
    #[error("An active reservation already exists")]
    ActiveReservationExists(Reservation),

    /// Same subject, service and calendar day already booked.
    #[error("This service is already reserved for that day")]
    DuplicateSameDay,

    /// Transient store failure; retry later, never treated as success.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HttpStatusCode for ReserveError {
    fn status_code(&self) -> u16 {
        match self {
            ReserveError::InvalidDate => 400,
            ReserveError::SlotNoLongerAvailable => 409,
            ReserveError::ActiveReservationExists(_) => 409,
            ReserveError::DuplicateSameDay => 409,
            ReserveError::Store(e) => e.status_code(),
        }
    }
}

/// Serializes reservation commits against concurrent competing requests.
pub struct ReservationGuard {
    policy: CalendarPolicy,
    store: Arc<dyn ReservationStore>,
    // Entries for past days are pruned on access; commits for past days
    // are rejected before locking, so a pruned entry is never contended.
    day_locks: Mutex<HashMap<NaiveDate, Arc<tokio::sync::Mutex<()>>>>,
}

impl ReservationGuard {
    pub fn new(policy: CalendarPolicy, store: Arc<dyn ReservationStore>) -> Self {
        Self {
            policy,
            store,
            day_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &CalendarPolicy {
        &self.policy
    }

    pub(crate) fn day_lock(&self, day: NaiveDate) -> Arc<tokio::sync::Mutex<()>> {
        let today = self.policy.now().date_naive();
        let mut locks = self
            .day_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.retain(|d, _| *d >= today);
        locks.entry(day).or_default().clone()
    }

    #[cfg(test)]
    pub(crate) fn day_lock_count(&self) -> usize {
        self.day_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Bookable start times for one day and service, from fresh store
    /// state.
    pub async fn list_available(
        &self,
        day: NaiveDate,
        service: &ServiceConfig,
    ) -> Result<Vec<DateTime<Tz>>, StoreError> {
        let (day_start, day_end) = self.policy.day_bounds(day);
        let existing = self
            .store
            .list_overlapping(day_start.with_timezone(&Utc), day_end.with_timezone(&Utc))
            .await?;
        Ok(list_available_times(
            &self.policy,
            self.policy.now(),
            day,
            Duration::minutes(service.duration_minutes),
            &existing,
        ))
    }

    /// Commit a reservation for `start`.
    ///
    /// Policy checks are recomputed here rather than trusted from the
    /// candidate list: time has passed since the list was generated.
    pub async fn reserve(
        &self,
        subject_id: &str,
        service: &ServiceConfig,
        start: DateTime<Tz>,
    ) -> Result<Reservation, ReserveError> {
        let now = self.policy.now();
        let day = start.date_naive();
        let duration = Duration::minutes(service.duration_minutes);

        if self.policy.is_blackout(day) || start < now {
            return Err(ReserveError::InvalidDate);
        }
        if start < now + self.policy.min_lead() {
            return Err(ReserveError::SlotNoLongerAvailable);
        }
        // Off-grid starts were never candidates, and the tick-exact
        // capacity lookup below assumes alignment.
        if self.policy.ceil_to_step(start) != start {
            return Err(ReserveError::SlotNoLongerAvailable);
        }
        if !self.policy.window_fits(start, duration) {
            return Err(ReserveError::SlotNoLongerAvailable);
        }
        if self.policy.edge_blocked(start, duration) {
            return Err(ReserveError::SlotNoLongerAvailable);
        }

        // Steps below are serialized per day; a competing commit for the
        // same day waits here and re-reads the timeline after we insert.
        let lock = self.day_lock(day);
        let _day_guard = lock.lock().await;

        let (day_start, day_end) = self.policy.day_bounds(day);
        let existing = self
            .store
            .list_overlapping(day_start.with_timezone(&Utc), day_end.with_timezone(&Utc))
            .await?;
        let counts = build_timeline(&self.policy, &existing);
        if !span_is_free(&self.policy, &counts, start, duration) {
            debug!(
                "Capacity re-check failed for subject {} at {}",
                subject_id, start
            );
            return Err(ReserveError::SlotNoLongerAvailable);
        }

        // Single active reservation per subject; the out-of-band service
        // is exempt.
        if !service.out_of_band {
            if let Some(active) = self
                .store
                .find_active(subject_id, now.with_timezone(&Utc))
                .await?
            {
                debug!(
                    "Subject {} already holds active reservation {}",
                    subject_id, active.id
                );
                return Err(ReserveError::ActiveReservationExists(active));
            }
        }

        if self
            .store
            .find_same_day(
                subject_id,
                &service.id,
                day_start.with_timezone(&Utc),
                day_end.with_timezone(&Utc),
            )
            .await?
            .is_some()
        {
            return Err(ReserveError::DuplicateSameDay);
        }

        // Insertion is the commit point.
        let created = self
            .store
            .insert_reservation(NewReservation {
                subject_id: subject_id.to_string(),
                service_id: service.id.clone(),
                start: start.with_timezone(&Utc),
                end: (start + duration).with_timezone(&Utc),
            })
            .await?;

        info!(
            "Reservation {} committed: subject {} service {} at {}",
            created.id, subject_id, service.id, start
        );
        Ok(created)
    }

    /// Cancel a reservation.
    ///
    /// A single conditional update. `Ok(false)` covers already-cancelled,
    /// never-existed and not-owned uniformly; callers report one generic
    /// "cannot cancel" outcome without a second read.
    pub async fn cancel(
        &self,
        subject_id: &str,
        reservation_id: &str,
    ) -> Result<bool, StoreError> {
        let affected = self
            .store
            .conditional_update_status(
                reservation_id,
                subject_id,
                ReservationStatus::Booked,
                ReservationStatus::Cancelled,
            )
            .await?;

        if affected == 1 {
            info!(
                "Reservation {} cancelled by subject {}",
                reservation_id, subject_id
            );
            Ok(true)
        } else {
            warn!(
                "Cancellation of {} by subject {} affected no rows",
                reservation_id, subject_id
            );
            Ok(false)
        }
    }
}
