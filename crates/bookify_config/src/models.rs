// --- File: crates/bookify_config/src/models.rs ---

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
            port: 8086,
        }
    }
}

// --- Scheduling Config ---
// Knobs for the booking & availability core. All optional in the config
// file; the handlers fall back to the documented defaults.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SchedulingConfig {
    /// Grid step for slot start times, in minutes (UI renders a 30-minute grid).
    pub slot_step_minutes: Option<i64>,
    /// Default slot duration when a query omits one.
    pub default_duration_minutes: Option<i64>,
    /// IANA timezone name used to resolve working-hours windows to instants.
    pub time_zone: Option<String>,
}

// --- Google Calendar Sync Config ---
// Holds non-secret sync config. Secrets loaded directly from env vars:
// GCAL_CLIENT_SECRET
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub calendar_id: Option<String>,
    /// Base URL of the calendar REST API, overridable for tests.
    pub api_base_url: Option<String>,
    /// Base URL of the OAuth token/authorize endpoints, overridable for tests.
    pub oauth_base_url: Option<String>,
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Directory for rolling log files; stdout only when unset.
    pub directory: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub scheduling: Option<SchedulingConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            use_gcal: false,
            scheduling: None,
            gcal: None,
            logging: None,
        }
    }
}
