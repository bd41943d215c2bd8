// --- File: crates/bookify_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! This module provides trait definitions for the external services the
//! scheduling core talks to. These traits allow for dependency injection and
//! easier testing by decoupling the core from specific implementations.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for the external calendar sync collaborator.
///
/// The scheduling core only consumes this surface: connection management for
/// a host's external calendar, plus fire-and-forget event mirroring after a
/// booking mutation. Sync failures never fail the booking operation that
/// triggered them.
pub trait CalendarSyncService: Send + Sync {
    /// Error type returned by sync operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Current connection state for a host's external calendar.
    fn connection_status(&self, host_id: &str) -> BoxFuture<'_, SyncConnectionStatus, Self::Error>;

    /// OAuth authorize URL the host's browser should be sent to.
    fn authorize_url(&self, host_id: &str) -> BoxFuture<'_, String, Self::Error>;

    /// Complete the OAuth flow with the code returned by the provider.
    fn exchange_code(
        &self,
        host_id: &str,
        code: &str,
    ) -> BoxFuture<'_, SyncConnectionStatus, Self::Error>;

    /// Disconnect the host's external calendar and forget stored tokens.
    fn disconnect(&self, host_id: &str) -> BoxFuture<'_, (), Self::Error>;

    /// Mirror a booking to the external calendar.
    fn push_booking(
        &self,
        host_id: &str,
        event: SyncEvent,
    ) -> BoxFuture<'_, SyncEventResult, Self::Error>;

    /// Remove a mirrored booking from the external calendar.
    fn remove_booking(&self, host_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error>;
}

/// A trait for notification service operations.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send an email notification.
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// A factory for creating service instances.
///
/// This trait provides methods for creating instances of the external
/// services. It's used by the application to get access to the services it
/// needs without caring which adapters are compiled in.
pub trait ServiceFactory: Send + Sync {
    /// Get a calendar sync service instance.
    fn calendar_sync_service(&self) -> Option<Arc<dyn CalendarSyncService<Error = BoxedError>>>;

    /// Get a notification service instance.
    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>>;
}

/// Connection state of a host's external calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConnectionStatus {
    /// Whether an external calendar is currently linked.
    pub connected: bool,
    /// Whether the stored credentials have expired and need a reconnect.
    pub expired: bool,
    /// The account email on the provider side, when known.
    pub email: Option<String>,
}

impl SyncConnectionStatus {
    /// Status for a host with no stored connection.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            expired: false,
            email: None,
        }
    }
}

/// An event to mirror into the external calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEvent {
    /// The start time of the event, RFC 3339.
    pub start_time: String,
    /// The end time of the event, RFC 3339.
    pub end_time: String,
    /// The summary or title of the event.
    pub summary: String,
    /// An optional description of the event.
    pub description: Option<String>,
    /// Existing provider-side event id, set when updating a mirrored event.
    pub event_id: Option<String>,
    /// Attendee emails to invite on the provider side.
    pub attendee_emails: Vec<String>,
}

/// Represents the result of mirroring an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEventResult {
    /// The provider-side id of the event.
    pub event_id: Option<String>,
    /// The provider-side status of the event.
    pub status: String,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// The ID of the notification.
    pub id: String,
    /// The status of the notification.
    pub status: String,
}
