//! Unified configuration for Navbat.
//!
//! Configuration is layered: built-in defaults, an optional file named by
//! `CONFIG_PATH`, then `APP_*__*` environment overrides
//! (e.g., `APP_SERVER__PORT=9000`, `APP_DATABASE__URL=sqlite:navbat.db`).
//! A `.env` file is honored and loaded exactly once.

pub mod models;

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use tracing::debug;

pub use models::{
    AppConfig, DatabaseConfig, EdgeRuleConfig, HolidayConfig, SchedulingConfig, ServerConfig,
    ServiceConfig, WindowConfig,
};

static DOTENV: OnceCell<()> = OnceCell::new();

/// Load `.env` into the process environment, once.
pub fn ensure_dotenv_loaded() {
    DOTENV.get_or_init(|| {
        // Missing .env is fine; real env vars still apply.
        let _ = dotenv::dotenv();
    });
}

/// Load the application configuration.
///
/// Dependent crates call this so they do not need to know where the
/// configuration comes from.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let mut builder = Config::builder();
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        debug!("Loading configuration file from {}", path);
        builder = builder.add_source(File::with_name(&path));
    }
    let config = builder
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    config.try_deserialize()
}
