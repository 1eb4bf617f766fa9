#[cfg(test)]
mod tests {
    use crate::logic::list_available_times;
    use crate::policy::CalendarPolicy;
    use crate::timeline::{build_timeline, span_is_free};
    use chrono::{Duration, NaiveDate, NaiveTime, Utc};
    use navbat_common::{Reservation, ReservationStatus};
    use navbat_config::SchedulingConfig;
    use proptest::prelude::*;

    fn policy() -> CalendarPolicy {
        CalendarPolicy::from_config(&SchedulingConfig::default()).unwrap()
    }

    // Monday, no blackout.
    fn open_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
    }

    fn reservations_from_specs(
        policy: &CalendarPolicy,
        day: NaiveDate,
        specs: &[(i64, i64)],
    ) -> Vec<Reservation> {
        let midnight = policy.at(day, NaiveTime::MIN);
        specs
            .iter()
            .enumerate()
            .map(|(i, &(tick, length))| {
                let start = midnight + Duration::minutes(tick * 5);
                Reservation {
                    id: format!("r{i}"),
                    subject_id: format!("s{i}"),
                    service_id: "consult".to_string(),
                    start: start.with_timezone(&Utc),
                    end: (start + Duration::minutes(length * 5)).with_timezone(&Utc),
                    status: ReservationStatus::Booked,
                }
            })
            .collect()
    }

    proptest! {
        // Every resolved slot honors lead time, window fit, edge rules and
        // the per-tick capacity ceiling, and the list is chronological.
        #[test]
        fn resolved_slots_respect_all_invariants(
            duration_steps in 1i64..=12,
            now_minutes in 0i64..(24 * 60),
            existing_specs in prop::collection::vec((0i64..288, 1i64..=24), 0..6),
        ) {
            let policy = policy();
            let day = open_day();
            let duration = Duration::minutes(duration_steps * 5);
            let now = policy.at(day, NaiveTime::MIN) + Duration::minutes(now_minutes);
            let existing = reservations_from_specs(&policy, day, &existing_specs);

            let slots = list_available_times(&policy, now, day, duration, &existing);

            let counts = build_timeline(&policy, &existing);
            let earliest = now + policy.min_lead();

            for pair in slots.windows(2) {
                prop_assert!(pair[0] < pair[1], "slots must be chronological");
            }
            for slot in &slots {
                prop_assert!(*slot >= earliest, "slot {slot} breaks the lead-time floor");
                prop_assert!(policy.window_fits(*slot, duration), "slot {slot} does not fit a window");
                prop_assert!(!policy.edge_blocked(*slot, duration), "slot {slot} hits an edge rule");
                prop_assert!(
                    span_is_free(&policy, &counts, *slot, duration),
                    "slot {slot} has a tick at capacity"
                );
            }
        }

        // Blackout days never produce slots, whatever the inputs.
        #[test]
        fn blackout_days_yield_nothing(
            duration_steps in 1i64..=12,
            now_minutes in 0i64..(24 * 60),
        ) {
            let policy = policy();
            // Saturday and the fixed holiday.
            for day in [
                NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            ] {
                let now = policy.at(day, NaiveTime::MIN) + Duration::minutes(now_minutes);
                let slots = list_available_times(
                    &policy,
                    now,
                    day,
                    Duration::minutes(duration_steps * 5),
                    &[],
                );
                prop_assert!(slots.is_empty());
            }
        }
    }
}
