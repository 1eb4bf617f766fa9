// --- File: crates/navbat_scheduling/src/policy.rs ---
//! Calendar policy: pure rules over the office calendar.
//!
//! Working windows, slot granularity, capacity ceiling, minimum lead time,
//! blackout dates and the duration-sensitive edge exceptions near the lunch
//! close are all derived from the injected `SchedulingConfig`, so tests can
//! exercise alternate calendars without touching global state. No I/O here.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike,
             Utc, Weekday};
use chrono_tz::Tz;
use navbat_config::SchedulingConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),
    #[error("Invalid slot step: {0} minutes")]
    InvalidStep(i64),
    #[error("Window boundary {0} is off the slot grid")]
    MisalignedWindow(NaiveTime),
    #[error("Service {0} has non-positive duration: {1} minutes")]
    InvalidServiceDuration(String, i64),
}

/// A contiguous open-for-business interval within a day, closed-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// An explicit exception for one tick near a window end.
///
/// `max_duration = None` blocks the tick for every service; `Some(d)`
/// permits it only for services at or under `d`. These protect a fixed
/// administrative closing procedure and are not derivable from window math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRule {
    pub at: NaiveTime,
    pub max_duration: Option<Duration>,
}

/// The validated, immutable calendar value object.
#[derive(Debug, Clone)]
pub struct CalendarPolicy {
    tz: Tz,
    windows: Vec<WorkingWindow>,
    step: Duration,
    capacity: u32,
    min_lead: Duration,
    rest_days: Vec<Weekday>,
    holidays: Vec<(u32, u32)>,
    edge_rules: Vec<EdgeRule>,
}

impl CalendarPolicy {
    /// Validate and freeze a `SchedulingConfig` into a policy.
    pub fn from_config(config: &SchedulingConfig) -> Result<Self, PolicyError> {
        let tz: Tz = config
            .timezone
            .parse()
            .map_err(|_| PolicyError::UnknownTimezone(config.timezone.clone()))?;

        // The tick grid is hour-anchored, so the step must divide the hour
        // and every window boundary must sit on the grid, or occupancy
        // counts and candidate walks would key different instants.
        if config.slot_step_minutes <= 0
            || config.slot_step_minutes > 60
            || 60 % config.slot_step_minutes != 0
        {
            return Err(PolicyError::InvalidStep(config.slot_step_minutes));
        }
        for window in &config.windows {
            for boundary in [window.start, window.end] {
                if boundary.second() != 0
                    || i64::from(boundary.minute()) % config.slot_step_minutes != 0
                {
                    return Err(PolicyError::MisalignedWindow(boundary));
                }
            }
        }

        if let Some(service) = config.services.iter().find(|s| s.duration_minutes <= 0) {
            return Err(PolicyError::InvalidServiceDuration(
                service.id.clone(),
                service.duration_minutes,
            ));
        }

        let rest_days = config
            .rest_days
            .iter()
            .map(|name| {
                name.parse::<Weekday>()
                    .map_err(|_| PolicyError::UnknownWeekday(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tz,
            windows: config
                .windows
                .iter()
                .map(|w| WorkingWindow {
                    start: w.start,
                    end: w.end,
                })
                .collect(),
            step: Duration::minutes(config.slot_step_minutes),
            capacity: config.capacity,
            min_lead: Duration::minutes(config.min_lead_minutes),
            rest_days,
            holidays: config.holidays.iter().map(|h| (h.month, h.day)).collect(),
            edge_rules: config
                .edge_rules
                .iter()
                .map(|r| EdgeRule {
                    at: r.at,
                    max_duration: r.max_duration_minutes.map(Duration::minutes),
                })
                .collect(),
        })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn windows(&self) -> &[WorkingWindow] {
        &self.windows
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn min_lead(&self) -> Duration {
        self.min_lead
    }

    /// Current wall-clock time in the office timezone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// Localize a calendar date and time-of-day to the office timezone.
    pub fn at(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
        match self.tz.from_local_datetime(&date.and_time(time)) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            // A DST gap; the office zones in use have fixed offsets, but
            // fall back to the UTC reading rather than panic.
            LocalResult::None => self.tz.from_utc_datetime(&date.and_time(time)),
        }
    }

    /// Half-open local-midnight bounds of one calendar day.
    pub fn day_bounds(&self, date: NaiveDate) -> (DateTime<Tz>, DateTime<Tz>) {
        let start = self.at(date, NaiveTime::MIN);
        (start, start + Duration::days(1))
    }

    /// True for weekly rest days and fixed annual holidays.
    pub fn is_blackout(&self, date: NaiveDate) -> bool {
        if self.rest_days.contains(&date.weekday()) {
            return true;
        }
        self.holidays
            .iter()
            .any(|&(month, day)| date.month() == month && date.day() == day)
    }

    /// Round a timestamp up to the next granularity boundary. Aligned
    /// inputs are returned unchanged.
    pub fn ceil_to_step(&self, instant: DateTime<Tz>) -> DateTime<Tz> {
        let step_minutes = self.step.num_minutes();
        let floored_minute = (i64::from(instant.minute()) / step_minutes) * step_minutes;
        let floored = instant
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .and_then(|t| t.with_minute(floored_minute as u32))
            .unwrap_or(instant);
        if floored < instant {
            floored + self.step
        } else {
            floored
        }
    }

    /// True if `start` lies inside some working window and the whole
    /// `[start, start + duration)` span fits before that window's end.
    pub fn window_fits(&self, start: DateTime<Tz>, duration: Duration) -> bool {
        let time_of_day = start.time();
        self.windows.iter().any(|w| {
            time_of_day >= w.start
                && time_of_day < w.end
                && start + duration <= self.at(start.date_naive(), w.end)
        })
    }

    /// True if an edge rule blocks `start` for this duration.
    pub fn edge_blocked(&self, start: DateTime<Tz>, duration: Duration) -> bool {
        self.edge_rules.iter().any(|rule| {
            start.time() == rule.at
                && match rule.max_duration {
                    None => true,
                    Some(max) => duration > max,
                }
        })
    }

    /// Legal candidate start times for a (day, duration) pair, ignoring
    /// occupancy and the current time. Chronological within each window,
    /// windows concatenated in daily order. Blackout days yield nothing.
    pub fn candidates(&self, day: NaiveDate, duration: Duration) -> Vec<DateTime<Tz>> {
        if self.is_blackout(day) {
            return Vec::new();
        }

        let mut out = Vec::new();
        for window in &self.windows {
            let window_end = self.at(day, window.end);
            let mut cursor = self.at(day, window.start);
            while cursor + duration <= window_end {
                out.push(cursor);
                cursor += self.step;
            }
        }
        out
    }
}
