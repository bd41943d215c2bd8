// --- File: crates/bookify_gcal/src/routes.rs ---

use crate::handlers::{
    calendar_connect_handler, calendar_disconnect_handler, calendar_status_handler,
    oauth_callback_handler, GcalState,
};
use crate::service::GoogleCalendarSyncService;
use axum::{
    routing::{get, post},
    Router,
};
use bookify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the calendar sync feature.
/// The sync service is created by the backend so the scheduling engine can
/// share the same instance for its fire-and-forget notifies.
pub fn routes(config: Arc<AppConfig>, sync: Arc<GoogleCalendarSyncService>) -> Router {
    let state = Arc::new(GcalState { config, sync });

    Router::new()
        .route("/calendar/status", get(calendar_status_handler))
        .route("/calendar/connect", get(calendar_connect_handler))
        .route("/calendar/oauth/callback", get(oauth_callback_handler))
        .route("/calendar/disconnect", post(calendar_disconnect_handler))
        .with_state(state)
}
