// --- File: crates/navbat_scheduling/src/timeline.rs ---
//! Day occupancy timeline: per-tick reservation counts.
//!
//! Rebuilt from the store on every availability query and every commit
//! re-check, never cached or persisted. Pure counting; the capacity test
//! lives in `span_is_free`.

use std::collections::HashMap;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use navbat_common::Reservation;

use crate::policy::CalendarPolicy;

/// Mapping from tick (granularity-aligned instant) to the number of
/// reservations whose `[start, end)` interval covers it.
pub type Timeline = HashMap<DateTime<Tz>, u32>;

/// Count occupancy per tick for the given reservations.
///
/// Callers pass reservations already filtered to the day of interest (the
/// store's overlap query does that); anything handed in is counted.
pub fn build_timeline(policy: &CalendarPolicy, reservations: &[Reservation]) -> Timeline {
    let tz = policy.timezone();
    let mut counts = Timeline::new();
    for reservation in reservations {
        let end = reservation.end.with_timezone(&tz);
        let mut tick = policy.ceil_to_step(reservation.start.with_timezone(&tz));
        while tick < end {
            *counts.entry(tick).or_insert(0) += 1;
            tick += policy.step();
        }
    }
    counts
}

/// True if every tick in `[start, start + duration)` is below the capacity
/// ceiling. Short-circuits on the first violation.
pub fn span_is_free(
    policy: &CalendarPolicy,
    counts: &Timeline,
    start: DateTime<Tz>,
    duration: Duration,
) -> bool {
    let end = start + duration;
    let mut tick = start;
    while tick < end {
        if counts.get(&tick).copied().unwrap_or(0) >= policy.capacity() {
            return false;
        }
        tick += policy.step();
    }
    true
}
