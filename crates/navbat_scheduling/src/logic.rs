// --- File: crates/navbat_scheduling/src/logic.rs ---
//! Availability resolver: the public read path.
//!
//! Composes the candidate generator with the occupancy timeline and the
//! policy filters to produce the bookable-times list the front-end
//! displays. Pure given its inputs; `now` is passed explicitly so the
//! lead-time cutoff is the only thing that drifts between identical calls.

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;
use navbat_common::Reservation;
use tracing::debug;

use crate::policy::CalendarPolicy;
use crate::timeline::{build_timeline, span_is_free};

/// Bookable start times for one (day, duration) pair, chronological.
///
/// An empty result is a valid answer ("no slots"), not an error.
pub fn list_available_times(
    policy: &CalendarPolicy,
    now: DateTime<Tz>,
    day: NaiveDate,
    duration: Duration,
    existing: &[Reservation],
) -> Vec<DateTime<Tz>> {
    let counts = build_timeline(policy, existing);
    let earliest = now + policy.min_lead();

    let mut times = Vec::new();
    for candidate in policy.candidates(day, duration) {
        if candidate < earliest {
            continue;
        }
        if policy.edge_blocked(candidate, duration) {
            continue;
        }
        if !policy.window_fits(candidate, duration) {
            continue;
        }
        if !span_is_free(policy, &counts, candidate, duration) {
            continue;
        }
        times.push(candidate);
    }

    debug!(
        "Resolved {} available start times for {} ({} min)",
        times.len(),
        day,
        duration.num_minutes()
    );
    times
}
