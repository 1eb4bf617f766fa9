// --- File: crates/navbat_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The record store is deliberately behind a trait so the scheduling logic
//! is decoupled from any specific backend and tests can substitute an
//! in-memory implementation.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{NewReservation, Reservation, ReservationStatus};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// The reservation record store.
///
/// Every operation is a single round trip. The scheduler reads fresh state
/// on every availability query and every commit re-validation; there is no
/// process-wide occupancy cache.
pub trait ReservationStore: Send + Sync {
    /// Reservations whose `[start, end)` interval overlaps `[start, end)`,
    /// restricted to `booked` rows (cancelled rows never consume capacity).
    #[allow(clippy::type_complexity)]
    fn list_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Reservation>, StoreError>;

    /// Insert a reservation with status `booked`. Insertion is the commit
    /// point: only after it succeeds is the slot considered consumed.
    fn insert_reservation(
        &self,
        new: NewReservation,
    ) -> BoxFuture<'_, Reservation, StoreError>;

    /// Transition `status` to `new_status` only if the current row matches
    /// `id`, `subject_id` and `expected_status`. Returns rows affected
    /// (0 or 1). This is the one naturally-atomic operation in the system
    /// and must remain a single store call, not read-then-write.
    fn conditional_update_status(
        &self,
        id: &str,
        subject_id: &str,
        expected_status: ReservationStatus,
        new_status: ReservationStatus,
    ) -> BoxFuture<'_, u64, StoreError>;

    /// The subject's reservation with `status = booked` and `end > now`,
    /// if any.
    fn find_active(
        &self,
        subject_id: &str,
        now: DateTime<Utc>,
    ) -> BoxFuture<'_, Option<Reservation>, StoreError>;

    /// A `booked` reservation for the same subject and service starting
    /// within `[day_start, day_end)`, if any.
    fn find_same_day(
        &self,
        subject_id: &str,
        service_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> BoxFuture<'_, Option<Reservation>, StoreError>;

    /// All reservations for one subject, ordered by start time.
    fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> BoxFuture<'_, Vec<Reservation>, StoreError>;
}
