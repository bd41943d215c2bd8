// --- File: crates/services/bookify_backend/src/app_state.rs ---
use bookify_common::services::ServiceFactory;
use bookify_config::AppConfig;
use bookify_scheduling::engine::SchedulingEngine;
use std::sync::Arc;

use crate::service_factory::BookifyServiceFactory;

/// Application state shared across all routes.
///
/// The factory owns the external-service adapters; the scheduling engine is
/// built once here and shared between the scheduling router and anything
/// else that needs to reach the core.
pub struct AppState {
    #[allow(dead_code)]
    pub config: Arc<AppConfig>,
    pub service_factory: Arc<BookifyServiceFactory>,
    pub engine: Arc<SchedulingEngine>,
}

impl AppState {
    /// Create a new AppState from the loaded configuration.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let service_factory = Arc::new(BookifyServiceFactory::new(config.clone()));

        let mut engine = SchedulingEngine::from_config(&config);
        if let Some(sync) = service_factory.calendar_sync_service() {
            engine = engine.with_sync(sync);
        }

        Self {
            config,
            service_factory,
            engine: Arc::new(engine),
        }
    }
}
