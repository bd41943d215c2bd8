// --- File: crates/services/bookify_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! This module provides an implementation of the ServiceFactory trait for
//! the backend service. The factory initializes external-service adapters
//! based on the application configuration and feature flags, and hands them
//! out behind the shared trait objects the scheduling core consumes.
use bookify_config::AppConfig;
use std::sync::Arc;
#[allow(unused_imports)]
use {
    bookify_common::services::{
        BoxFuture, BoxedError, CalendarSyncService, NotificationService, ServiceFactory,
        SyncConnectionStatus, SyncEvent, SyncEventResult,
    },
    tracing::{error, info},
};

#[cfg(feature = "gcal")]
use bookify_gcal::service::GoogleCalendarSyncService;

/// Adapter erasing the concrete sync error type behind `BoxedError`, so the
/// scheduling engine can hold any sync implementation.
#[cfg(feature = "gcal")]
struct BoxedCalendarSyncService {
    inner: Arc<GoogleCalendarSyncService>,
}

#[cfg(feature = "gcal")]
impl CalendarSyncService for BoxedCalendarSyncService {
    type Error = BoxedError;

    fn connection_status(&self, host_id: &str) -> BoxFuture<'_, SyncConnectionStatus, Self::Error> {
        let host_id = host_id.to_string();
        let inner = self.inner.clone();
        Box::pin(async move {
            inner
                .connection_status(&host_id)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn authorize_url(&self, host_id: &str) -> BoxFuture<'_, String, Self::Error> {
        let host_id = host_id.to_string();
        let inner = self.inner.clone();
        Box::pin(async move {
            inner
                .authorize_url(&host_id)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn exchange_code(
        &self,
        host_id: &str,
        code: &str,
    ) -> BoxFuture<'_, SyncConnectionStatus, Self::Error> {
        let host_id = host_id.to_string();
        let code = code.to_string();
        let inner = self.inner.clone();
        Box::pin(async move {
            inner
                .exchange_code(&host_id, &code)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn disconnect(&self, host_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let host_id = host_id.to_string();
        let inner = self.inner.clone();
        Box::pin(async move {
            inner
                .disconnect(&host_id)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn push_booking(
        &self,
        host_id: &str,
        event: SyncEvent,
    ) -> BoxFuture<'_, SyncEventResult, Self::Error> {
        let host_id = host_id.to_string();
        let inner = self.inner.clone();
        Box::pin(async move {
            inner
                .push_booking(&host_id, event)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn remove_booking(&self, host_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let host_id = host_id.to_string();
        let event_id = event_id.to_string();
        let inner = self.inner.clone();
        Box::pin(async move {
            inner
                .remove_booking(&host_id, &event_id)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// Service factory for the backend.
pub struct BookifyServiceFactory {
    #[allow(dead_code)]
    config: Arc<AppConfig>,
    #[cfg(feature = "gcal")]
    gcal_service: Option<Arc<GoogleCalendarSyncService>>,
}

impl BookifyServiceFactory {
    /// Create a new service factory, initializing adapters per config.
    pub fn new(config: Arc<AppConfig>) -> Self {
        #[cfg(feature = "gcal")]
        let gcal_service = if config.use_gcal && config.gcal.is_some() {
            info!("Initializing Google Calendar sync service...");
            let service = GoogleCalendarSyncService::new(
                config.gcal.clone().unwrap_or_default(),
            );
            Some(Arc::new(service))
        } else {
            info!("Calendar sync compiled in, but disabled via runtime config.");
            None
        };

        Self {
            config,
            #[cfg(feature = "gcal")]
            gcal_service,
        }
    }

    /// The concrete sync service, for the routes that manage connections.
    #[cfg(feature = "gcal")]
    pub fn gcal_service(&self) -> Option<Arc<GoogleCalendarSyncService>> {
        self.gcal_service.clone()
    }
}

impl ServiceFactory for BookifyServiceFactory {
    fn calendar_sync_service(&self) -> Option<Arc<dyn CalendarSyncService<Error = BoxedError>>> {
        #[cfg(feature = "gcal")]
        {
            if let Some(inner) = self.gcal_service.clone() {
                return Some(Arc::new(BoxedCalendarSyncService { inner }));
            }
        }
        None
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>> {
        // No notification adapter is wired yet; booking mutations only log.
        None
    }
}
