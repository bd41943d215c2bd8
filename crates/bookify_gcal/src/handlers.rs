// File: crates/bookify_gcal/src/handlers.rs
use crate::service::{GcalSyncError, GoogleCalendarSyncService};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use bookify_common::services::{CalendarSyncService, SyncConnectionStatus};
use bookify_config::AppConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

// Define shared state needed by calendar sync handlers
#[derive(Clone)]
pub struct GcalState {
    pub config: Arc<AppConfig>,
    pub sync: Arc<GoogleCalendarSyncService>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct HostQuery {
    pub host_id: String,
}

#[derive(Deserialize, Debug)]
pub struct OAuthCallbackQuery {
    pub code: String,
    /// The host id, carried through the OAuth round-trip as state.
    pub state: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConnectResponse {
    pub auth_url: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DisconnectRequest {
    pub host_id: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DisconnectResponse {
    pub success: bool,
    pub message: String,
}

fn ensure_enabled(state: &GcalState) -> Result<(), (StatusCode, String)> {
    if !state.config.use_gcal {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Calendar sync is disabled.".to_string(),
        ));
    }
    Ok(())
}

fn map_sync_error(err: GcalSyncError) -> (StatusCode, String) {
    info!("calendar sync request failed: {}", err);
    match err {
        GcalSyncError::Config(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error: calendar sync is not configured.".to_string(),
        ),
        GcalSyncError::NotConnected(_) | GcalSyncError::Expired(_) => (
            StatusCode::CONFLICT,
            "No usable calendar connection for this host.".to_string(),
        ),
        _ => (
            StatusCode::BAD_GATEWAY,
            "Calendar provider request failed.".to_string(),
        ),
    }
}

/// Handler to get the host's calendar connection status.
#[axum::debug_handler]
pub async fn calendar_status_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<HostQuery>,
) -> Result<Json<SyncConnectionStatus>, (StatusCode, String)> {
    ensure_enabled(&state)?;
    let status = state
        .sync
        .connection_status(&query.host_id)
        .await
        .map_err(map_sync_error)?;
    Ok(Json(status))
}

/// Handler to start connecting the host's calendar. Returns the OAuth
/// authorize URL the host's browser should be redirected to.
#[axum::debug_handler]
pub async fn calendar_connect_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<HostQuery>,
) -> Result<Json<ConnectResponse>, (StatusCode, String)> {
    ensure_enabled(&state)?;
    let auth_url = state
        .sync
        .authorize_url(&query.host_id)
        .await
        .map_err(map_sync_error)?;
    Ok(Json(ConnectResponse { auth_url }))
}

/// Handler for the OAuth callback: exchanges the code and stores the
/// host's connection.
#[axum::debug_handler]
pub async fn oauth_callback_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<SyncConnectionStatus>, (StatusCode, String)> {
    ensure_enabled(&state)?;
    let status = state
        .sync
        .exchange_code(&query.state, &query.code)
        .await
        .map_err(map_sync_error)?;
    info!("calendar connection completed for host {}", query.state);
    Ok(Json(status))
}

/// Handler to disconnect the host's calendar and forget stored tokens.
#[axum::debug_handler]
pub async fn calendar_disconnect_handler(
    State(state): State<Arc<GcalState>>,
    Json(payload): Json<DisconnectRequest>,
) -> Result<Json<DisconnectResponse>, (StatusCode, String)> {
    ensure_enabled(&state)?;
    state
        .sync
        .disconnect(&payload.host_id)
        .await
        .map_err(map_sync_error)?;
    Ok(Json(DisconnectResponse {
        success: true,
        message: "Calendar disconnected.".to_string(),
    }))
}
