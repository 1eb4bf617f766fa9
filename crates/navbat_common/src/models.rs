// --- File: crates/navbat_common/src/models.rs ---
//! Shared domain models for reservations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persistent reservation state. `Cancelled` is terminal; "completed" is
/// derived at read time from `end < now` and is never written back.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Booked,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Booked => "booked",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(ReservationStatus::Booked),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("unknown reservation status: {other}")),
        }
    }
}

/// A committed appointment. Created only by the reservation guard, mutated
/// only through the conditional status update, never deleted.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub subject_id: String,
    pub service_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ReservationStatus,
}

impl Reservation {
    /// A reservation still consuming capacity: booked and not yet ended.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Booked && self.end > now
    }
}

/// Input to the insert operation; the store assigns the id and sets the
/// status to `Booked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub subject_id: String,
    pub service_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
