// --- File: crates/bookify_scheduling/src/routes.rs ---

use crate::engine::SchedulingEngine;
use crate::handlers::{
    cancel_booking_handler, check_availability_handler, create_booking_handler,
    get_availability_handler, get_slots_handler, list_bookings_handler, save_availability_handler,
    update_booking_handler, SchedulingState,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use bookify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the booking and availability
/// core. The engine is shared with the caller so the backend can hand the
/// same instance to other feature routers.
pub fn routes(config: Arc<AppConfig>, engine: Arc<SchedulingEngine>) -> Router {
    let state = Arc::new(SchedulingState { config, engine });

    Router::new()
        .route(
            "/availability",
            get(get_availability_handler).post(save_availability_handler),
        )
        .route("/bookings/slots", get(get_slots_handler))
        .route("/bookings/availability", post(check_availability_handler))
        .route(
            "/bookings",
            get(list_bookings_handler).post(create_booking_handler),
        )
        .route(
            "/bookings/{booking_id}",
            put(update_booking_handler).delete(cancel_booking_handler),
        )
        .with_state(state)
}
