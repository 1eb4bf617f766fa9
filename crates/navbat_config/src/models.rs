// --- File: crates/navbat_config/src/models.rs ---

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g., sqlite:navbat.db, loaded via APP_DATABASE__URL
}

// --- Working Window ---
// A contiguous open-for-business interval within a day, closed-open.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:30:00"))]
    pub start: NaiveTime,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "13:00:00"))]
    pub end: NaiveTime,
}

// --- Fixed annual holiday (recurs every year) ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct HolidayConfig {
    pub month: u32,
    pub day: u32,
}

// --- Duration-sensitive edge exception near a window end ---
// `max_duration_minutes = None` blocks the tick outright; `Some(n)` permits
// it only for services at or under `n` minutes.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRuleConfig {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "12:50:00"))]
    pub at: NaiveTime,
    pub max_duration_minutes: Option<i64>,
}

// --- Service catalog entry ---
// Immutable reference data, read-only to the scheduler. The out-of-band
// service bypasses slot selection and the single-active-reservation gate.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub id: String,
    pub name: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub out_of_band: bool,
}

// --- Scheduling Config ---
// The injectable calendar value object. Defaults reproduce the production
// office calendar so a bare config file still yields a working scheduler.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// IANA timezone the office calendar is expressed in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Daily working windows in daily order (e.g., morning then afternoon).
    #[serde(default = "default_windows")]
    pub windows: Vec<WindowConfig>,
    /// Slot granularity in minutes.
    #[serde(default = "default_step")]
    pub slot_step_minutes: i64,
    /// Maximum reservations permitted to cover any one tick.
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Minimum gap between "now" and a bookable start time, in minutes.
    #[serde(default = "default_lead")]
    pub min_lead_minutes: i64,
    /// Weekly rest days, lowercase English weekday names (e.g., "sat").
    #[serde(default = "default_rest_days")]
    pub rest_days: Vec<String>,
    /// Fixed annual holidays.
    #[serde(default = "default_holidays")]
    pub holidays: Vec<HolidayConfig>,
    /// Edge exceptions protecting the closing procedure before lunch.
    #[serde(default = "default_edge_rules")]
    pub edge_rules: Vec<EdgeRuleConfig>,
    /// Service catalog.
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

fn default_timezone() -> String {
    "Asia/Tashkent".to_string()
}

fn default_windows() -> Vec<WindowConfig> {
    vec![
        WindowConfig {
            start: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        },
        WindowConfig {
            start: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        },
    ]
}

fn default_step() -> i64 {
    5
}

fn default_capacity() -> u32 {
    2
}

fn default_lead() -> i64 {
    120
}

fn default_rest_days() -> Vec<String> {
    vec!["sat".to_string(), "sun".to_string()]
}

fn default_holidays() -> Vec<HolidayConfig> {
    // 1 September, every year.
    vec![HolidayConfig { month: 9, day: 1 }]
}

fn default_edge_rules() -> Vec<EdgeRuleConfig> {
    vec![
        EdgeRuleConfig {
            at: NaiveTime::from_hms_opt(12, 50, 0).unwrap(),
            max_duration_minutes: Some(10),
        },
        EdgeRuleConfig {
            at: NaiveTime::from_hms_opt(12, 55, 0).unwrap(),
            max_duration_minutes: None,
        },
    ]
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            windows: default_windows(),
            slot_step_minutes: default_step(),
            capacity: default_capacity(),
            min_lead_minutes: default_lead(),
            rest_days: default_rest_days(),
            holidays: default_holidays(),
            edge_rules: default_edge_rules(),
            services: Vec::new(),
        }
    }
}

impl SchedulingConfig {
    /// Look up a catalog entry by id.
    pub fn service(&self, service_id: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.id == service_id)
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // Central DB config; absent means the in-memory store is used.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub scheduling: SchedulingConfig,
}
