// --- File: crates/bookify_config/src/lib.rs ---
//! Unified configuration for Bookify.
//!
//! Configuration is layered: `config/default.toml`, then an optional
//! `config/{RUN_ENV}.toml`, then `BOOKIFY_*` environment variable
//! overrides (double underscore as section separator, e.g.
//! `BOOKIFY_SERVER__PORT=9090`). A `.env` file is loaded once before the
//! first read so local development secrets reach the process environment.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;

pub mod models;
pub use models::{AppConfig, GcalConfig, LoggingConfig, SchedulingConfig, ServerConfig};

static DOTENV_LOADED: OnceCell<()> = OnceCell::new();

/// Loads `.env` into the process environment exactly once.
/// Dependent crates call this so they do not need to care whether the
/// binary or a test harness got there first.
pub fn ensure_dotenv_loaded() {
    DOTENV_LOADED.get_or_init(|| {
        // A missing .env file is the normal case in production.
        let _ = dotenv::dotenv();
    });
}

/// Loads the application configuration.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

    let config = Config::builder()
        // Baseline server settings so an empty config directory still
        // yields a runnable instance.
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8086)?
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix("BOOKIFY").separator("__"))
        .build()?;

    let mut app_config: AppConfig = config.try_deserialize()?;

    apply_env_secret_overrides(&mut app_config);
    Ok(app_config)
}

// Secrets never live in config files; the well-known env vars win over
// whatever the file layer produced.
fn apply_env_secret_overrides(config: &mut AppConfig) {
    if let Ok(client_id) = std::env::var("GCAL_CLIENT_ID") {
        config
            .gcal
            .get_or_insert_with(GcalConfig::default)
            .client_id = Some(client_id);
    }
    if let Ok(calendar_id) = std::env::var("GCAL_CALENDAR_ID") {
        config
            .gcal
            .get_or_insert_with(GcalConfig::default)
            .calendar_id = Some(calendar_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_runnable() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.use_gcal);
        assert!(config.scheduling.is_none());
    }

    #[test]
    fn scheduling_section_deserializes_with_partial_fields() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "server": {"host": "0.0.0.0", "port": 8080},
                "scheduling": {"slot_step_minutes": 15}
            }"#,
        )
        .unwrap();
        let scheduling = config.scheduling.unwrap();
        assert_eq!(scheduling.slot_step_minutes, Some(15));
        assert_eq!(scheduling.default_duration_minutes, None);
        assert_eq!(scheduling.time_zone, None);
    }

    #[test]
    fn use_gcal_defaults_to_false() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server": {"host": "127.0.0.1", "port": 8086}}"#).unwrap();
        assert!(!config.use_gcal);
        assert!(config.gcal.is_none());
    }
}
