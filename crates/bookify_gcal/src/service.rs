// --- File: crates/bookify_gcal/src/service.rs ---
//! Google Calendar sync service implementation.
//!
//! This module provides an implementation of the CalendarSyncService trait
//! over the Google OAuth2 and Calendar v3 REST endpoints. The core consumes
//! it fire-and-forget: a failed push or removal is the caller's warning to
//! log, never a failed booking.

use bookify_common::services::{
    BoxFuture, CalendarSyncService, SyncConnectionStatus, SyncEvent, SyncEventResult,
};
use bookify_config::GcalConfig;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::connection::{ConnectionStore, HostConnection};

const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const DEFAULT_OAUTH_BASE: &str = "https://oauth2.googleapis.com";
const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

/// Errors that can occur when talking to the calendar provider.
#[derive(Error, Debug)]
pub enum GcalSyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("Host {0} has no connected calendar")]
    NotConnected(String),
    #[error("Stored credentials for host {0} have expired")]
    Expired(String),
    #[error("Sync configuration error: {0}")]
    Config(String),
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

#[derive(Deserialize, Debug)]
struct UserInfoResponse {
    email: Option<String>,
}

#[derive(Serialize)]
struct AuthorizeParams<'a> {
    client_id: &'a str,
    redirect_uri: &'a str,
    response_type: &'a str,
    scope: &'a str,
    access_type: &'a str,
    prompt: &'a str,
    state: &'a str,
}

#[derive(Serialize)]
struct EventTimePayload {
    #[serde(rename = "dateTime")]
    date_time: String,
}

#[derive(Serialize)]
struct EventAttendeePayload {
    email: String,
}

#[derive(Serialize)]
struct EventPayload {
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start: EventTimePayload,
    end: EventTimePayload,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attendees: Vec<EventAttendeePayload>,
}

#[derive(Deserialize, Debug)]
struct EventResponse {
    id: Option<String>,
    status: Option<String>,
}

/// Google Calendar sync service implementation.
pub struct GoogleCalendarSyncService {
    config: GcalConfig,
    connections: Arc<ConnectionStore>,
    http: Client,
}

impl GoogleCalendarSyncService {
    /// Create a new sync service sharing the application HTTP client.
    pub fn new(config: GcalConfig) -> Self {
        Self {
            config,
            connections: Arc::new(ConnectionStore::new()),
            http: bookify_common::HTTP_CLIENT.clone(),
        }
    }

    pub fn connections(&self) -> Arc<ConnectionStore> {
        self.connections.clone()
    }

    fn api_base(&self) -> &str {
        self.config.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    fn oauth_base(&self) -> &str {
        self.config
            .oauth_base_url
            .as_deref()
            .unwrap_or(DEFAULT_OAUTH_BASE)
    }

    fn calendar_id(&self) -> &str {
        self.config.calendar_id.as_deref().unwrap_or("primary")
    }

    fn client_id(&self) -> Result<&str, GcalSyncError> {
        self.config
            .client_id
            .as_deref()
            .ok_or_else(|| GcalSyncError::Config("gcal.client_id is not configured".to_string()))
    }

    fn client_secret(&self) -> Result<String, GcalSyncError> {
        std::env::var("GCAL_CLIENT_SECRET")
            .map_err(|_| GcalSyncError::Config("GCAL_CLIENT_SECRET is not set".to_string()))
    }

    fn redirect_uri(&self) -> Result<&str, GcalSyncError> {
        self.config
            .redirect_uri
            .as_deref()
            .ok_or_else(|| GcalSyncError::Config("gcal.redirect_uri is not configured".to_string()))
    }

    /// A valid bearer token for the host, refreshing through the stored
    /// refresh token when the access token has expired.
    async fn ensure_access_token(&self, host_id: &str) -> Result<String, GcalSyncError> {
        let connection = self
            .connections
            .get(host_id)
            .ok_or_else(|| GcalSyncError::NotConnected(host_id.to_string()))?;

        if !connection.is_expired() {
            return Ok(connection.access_token);
        }

        let Some(refresh_token) = connection.refresh_token.clone() else {
            return Err(GcalSyncError::Expired(host_id.to_string()));
        };

        debug!("refreshing calendar access token for host {}", host_id);
        let client_id = self.client_id()?.to_string();
        let client_secret = self.client_secret()?;
        let response = self
            .http
            .post(format!("{}/token", self.oauth_base()))
            .form(&[
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;
        let token: TokenResponse = Self::parse_response(response).await?;

        let expires_at = Utc::now() + Duration::seconds(token.expires_in);
        self.connections
            .update_access_token(host_id, token.access_token.clone(), expires_at);
        Ok(token.access_token)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GcalSyncError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GcalSyncError::Provider {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn status_impl(&self, host_id: &str) -> Result<SyncConnectionStatus, GcalSyncError> {
        Ok(self.connections.status(host_id))
    }

    fn authorize_url_impl(&self, host_id: &str) -> Result<String, GcalSyncError> {
        let params = AuthorizeParams {
            client_id: self.client_id()?,
            redirect_uri: self.redirect_uri()?,
            response_type: "code",
            scope: CALENDAR_SCOPE,
            access_type: "offline",
            prompt: "consent",
            // The host id rides along as OAuth state so the callback knows
            // which calendar to attach the tokens to.
            state: host_id,
        };
        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| GcalSyncError::Config(format!("failed to encode authorize URL: {}", e)))?;
        let endpoint = match self.config.oauth_base_url.as_deref() {
            Some(base) => format!("{}/authorize", base),
            None => AUTHORIZE_ENDPOINT.to_string(),
        };
        Ok(format!("{}?{}", endpoint, query))
    }

    async fn exchange_code_impl(
        &self,
        host_id: &str,
        code: &str,
    ) -> Result<SyncConnectionStatus, GcalSyncError> {
        let client_id = self.client_id()?.to_string();
        let client_secret = self.client_secret()?;
        let redirect_uri = self.redirect_uri()?.to_string();
        let response = self
            .http
            .post(format!("{}/token", self.oauth_base()))
            .form(&[
                ("code", code),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        let token: TokenResponse = Self::parse_response(response).await?;

        // Best-effort: a missing email leaves the connection usable.
        let email = match self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&token.access_token)
            .send()
            .await
        {
            Ok(response) => Self::parse_response::<UserInfoResponse>(response)
                .await
                .ok()
                .and_then(|info| info.email),
            Err(_) => None,
        };

        let connection = HostConnection {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            email,
        };
        self.connections.insert(host_id, connection);
        info!("calendar connected for host {}", host_id);
        Ok(self.connections.status(host_id))
    }

    async fn disconnect_impl(&self, host_id: &str) -> Result<(), GcalSyncError> {
        if let Some(connection) = self.connections.get(host_id) {
            // Best-effort revoke; the provider forgetting us is not required
            // for our own state to be cleared.
            let _ = self
                .http
                .post(format!("{}/revoke", self.oauth_base()))
                .form(&[("token", connection.access_token.as_str())])
                .send()
                .await;
        }
        self.connections.remove(host_id);
        info!("calendar disconnected for host {}", host_id);
        Ok(())
    }

    async fn push_booking_impl(
        &self,
        host_id: &str,
        event: SyncEvent,
    ) -> Result<SyncEventResult, GcalSyncError> {
        let access_token = self.ensure_access_token(host_id).await?;
        let payload = EventPayload {
            summary: event.summary,
            description: event.description,
            start: EventTimePayload {
                date_time: event.start_time,
            },
            end: EventTimePayload {
                date_time: event.end_time,
            },
            attendees: event
                .attendee_emails
                .into_iter()
                .map(|email| EventAttendeePayload { email })
                .collect(),
        };

        let request = match &event.event_id {
            Some(event_id) => self.http.put(format!(
                "{}/calendars/{}/events/{}",
                self.api_base(),
                self.calendar_id(),
                event_id
            )),
            None => self.http.post(format!(
                "{}/calendars/{}/events",
                self.api_base(),
                self.calendar_id()
            )),
        };
        let response = request
            .bearer_auth(&access_token)
            .json(&payload)
            .send()
            .await?;
        let created: EventResponse = Self::parse_response(response).await?;

        Ok(SyncEventResult {
            event_id: created.id,
            status: created.status.unwrap_or_else(|| "confirmed".to_string()),
        })
    }

    async fn remove_booking_impl(
        &self,
        host_id: &str,
        event_id: &str,
    ) -> Result<(), GcalSyncError> {
        let access_token = self.ensure_access_token(host_id).await?;
        let response = self
            .http
            .delete(format!(
                "{}/calendars/{}/events/{}",
                self.api_base(),
                self.calendar_id(),
                event_id
            ))
            .bearer_auth(&access_token)
            .send()
            .await?;

        let status = response.status();
        // A mirrored event already gone on the provider side is a success.
        if !status.is_success() && status.as_u16() != 404 && status.as_u16() != 410 {
            let message = response.text().await.unwrap_or_default();
            return Err(GcalSyncError::Provider {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

impl CalendarSyncService for GoogleCalendarSyncService {
    type Error = GcalSyncError;

    fn connection_status(&self, host_id: &str) -> BoxFuture<'_, SyncConnectionStatus, Self::Error> {
        let host_id = host_id.to_string();
        Box::pin(async move { self.status_impl(&host_id).await })
    }

    fn authorize_url(&self, host_id: &str) -> BoxFuture<'_, String, Self::Error> {
        let host_id = host_id.to_string();
        Box::pin(async move { self.authorize_url_impl(&host_id) })
    }

    fn exchange_code(
        &self,
        host_id: &str,
        code: &str,
    ) -> BoxFuture<'_, SyncConnectionStatus, Self::Error> {
        let host_id = host_id.to_string();
        let code = code.to_string();
        Box::pin(async move { self.exchange_code_impl(&host_id, &code).await })
    }

    fn disconnect(&self, host_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let host_id = host_id.to_string();
        Box::pin(async move { self.disconnect_impl(&host_id).await })
    }

    fn push_booking(
        &self,
        host_id: &str,
        event: SyncEvent,
    ) -> BoxFuture<'_, SyncEventResult, Self::Error> {
        let host_id = host_id.to_string();
        Box::pin(async move { self.push_booking_impl(&host_id, event).await })
    }

    fn remove_booking(&self, host_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let host_id = host_id.to_string();
        let event_id = event_id.to_string();
        Box::pin(async move { self.remove_booking_impl(&host_id, &event_id).await })
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockCalendarSyncService;
    use super::*;

    fn configured_service() -> GoogleCalendarSyncService {
        GoogleCalendarSyncService::new(GcalConfig {
            client_id: Some("client-id-123".to_string()),
            redirect_uri: Some("http://127.0.0.1:8086/api/calendar/oauth/callback".to_string()),
            calendar_id: Some("primary".to_string()),
            api_base_url: None,
            oauth_base_url: None,
        })
    }

    #[test]
    fn authorize_url_carries_host_id_as_state() {
        let service = configured_service();
        let url = service.authorize_url_impl("host-42").unwrap();
        assert!(url.starts_with(AUTHORIZE_ENDPOINT));
        assert!(url.contains("client_id=client-id-123"));
        assert!(url.contains("state=host-42"));
        assert!(url.contains("access_type=offline"));
    }

    #[test]
    fn authorize_url_without_client_id_is_a_config_error() {
        let service = GoogleCalendarSyncService::new(GcalConfig::default());
        assert!(matches!(
            service.authorize_url_impl("host-1"),
            Err(GcalSyncError::Config(_))
        ));
    }

    #[tokio::test]
    async fn disconnected_host_cannot_push() {
        let service = configured_service();
        let event = SyncEvent {
            start_time: "2025-05-05T10:00:00Z".to_string(),
            end_time: "2025-05-05T11:00:00Z".to_string(),
            summary: "Call".to_string(),
            description: None,
            event_id: None,
            attendee_emails: Vec::new(),
        };
        assert!(matches!(
            service.push_booking_impl("host-1", event).await,
            Err(GcalSyncError::NotConnected(_))
        ));
    }

    #[tokio::test]
    async fn mock_records_pushes_and_removals() {
        let mock = MockCalendarSyncService::new(true);
        let event = SyncEvent {
            start_time: "2025-05-05T10:00:00Z".to_string(),
            end_time: "2025-05-05T11:00:00Z".to_string(),
            summary: "Call".to_string(),
            description: None,
            event_id: None,
            attendee_emails: Vec::new(),
        };

        let result = mock.push_booking("host-1", event).await.unwrap();
        assert!(result.event_id.unwrap().starts_with("mock-event-"));
        mock.remove_booking("host-1", "evt-9").await.unwrap();

        assert_eq!(mock.pushed.lock().unwrap().len(), 1);
        assert_eq!(mock.removed.lock().unwrap().as_slice(), ["evt-9"]);

        let status = mock.connection_status("host-1").await.unwrap();
        assert!(status.connected);
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Recording mock for tests: every push and removal is captured, and
    /// the connection state is set directly.
    pub struct MockCalendarSyncService {
        pub connected: bool,
        pub pushed: Mutex<Vec<SyncEvent>>,
        pub removed: Mutex<Vec<String>>,
    }

    impl MockCalendarSyncService {
        pub fn new(connected: bool) -> Self {
            Self {
                connected,
                pushed: Mutex::new(Vec::new()),
                removed: Mutex::new(Vec::new()),
            }
        }
    }

    impl CalendarSyncService for MockCalendarSyncService {
        type Error = GcalSyncError;

        fn connection_status(
            &self,
            _host_id: &str,
        ) -> BoxFuture<'_, SyncConnectionStatus, Self::Error> {
            let connected = self.connected;
            Box::pin(async move {
                Ok(SyncConnectionStatus {
                    connected,
                    expired: false,
                    email: connected.then(|| "host@example.com".to_string()),
                })
            })
        }

        fn authorize_url(&self, host_id: &str) -> BoxFuture<'_, String, Self::Error> {
            let url = format!("https://example.com/auth?state={}", host_id);
            Box::pin(async move { Ok(url) })
        }

        fn exchange_code(
            &self,
            _host_id: &str,
            _code: &str,
        ) -> BoxFuture<'_, SyncConnectionStatus, Self::Error> {
            Box::pin(async move {
                Ok(SyncConnectionStatus {
                    connected: true,
                    expired: false,
                    email: Some("host@example.com".to_string()),
                })
            })
        }

        fn disconnect(&self, _host_id: &str) -> BoxFuture<'_, (), Self::Error> {
            Box::pin(async move { Ok(()) })
        }

        fn push_booking(
            &self,
            _host_id: &str,
            event: SyncEvent,
        ) -> BoxFuture<'_, SyncEventResult, Self::Error> {
            self.pushed.lock().unwrap().push(event);
            let event_id = format!("mock-event-{}", uuid::Uuid::new_v4());
            Box::pin(async move {
                Ok(SyncEventResult {
                    event_id: Some(event_id),
                    status: "confirmed".to_string(),
                })
            })
        }

        fn remove_booking(&self, _host_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
            self.removed.lock().unwrap().push(event_id.to_string());
            Box::pin(async move { Ok(()) })
        }
    }
}
