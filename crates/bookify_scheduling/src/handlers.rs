// File: crates/bookify_scheduling/src/handlers.rs
use crate::engine::SchedulingEngine;
use crate::error::SchedulingError;
use crate::models::{
    AvailabilitySlot, Booking, BookingDraft, BookingPatch, BookingStatus, BookingView,
    WorkingHoursWindow,
};
use crate::repository::BookingFilter;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use bookify_config::AppConfig;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

// Define shared state needed by scheduling handlers
#[derive(Clone)]
pub struct SchedulingState {
    pub config: Arc<AppConfig>,
    pub engine: Arc<SchedulingEngine>,
}

// --- Wire types ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Host whose week is requested
    pub host_id: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityResponse {
    pub host_id: String,
    /// Always exactly 7 windows, ordered Sunday (0) through Saturday (6).
    pub week: Vec<WorkingHoursWindow>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SaveAvailabilityRequest {
    pub user_id: String,
    pub slots: Vec<WorkingHoursWindow>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SlotsQuery {
    pub host_id: String,
    /// Target calendar day in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", param(example = "2025-05-05"))]
    pub date: String,
    /// Slot duration in minutes; the configured default when omitted
    #[cfg_attr(feature = "openapi", param(example = 30))]
    pub duration: Option<i64>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotsResponse {
    pub slots: Vec<AvailabilitySlot>,
    pub date: String,
    pub duration: i64,
    pub host_id: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckAvailabilityRequest {
    pub host_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Booking to ignore, so an edit can check its own new interval
    pub exclude_booking_id: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckAvailabilityResponse {
    pub available: bool,
    pub conflicts: Vec<Booking>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct BookingsQuery {
    pub host_id: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<BookingStatus>,
    /// Start date in YYYY-MM-DD format
    pub start_date: Option<String>,
    /// End date in YYYY-MM-DD format, inclusive
    pub end_date: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingsResponse {
    pub bookings: Vec<BookingView>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, SchedulingError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        SchedulingError::validation(field, format!("invalid date `{}` (expected YYYY-MM-DD)", value))
    })
}

// --- Handlers ---

/// Handler to get a host's working-hours week.
#[axum::debug_handler]
pub async fn get_availability_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, SchedulingError> {
    let week = state.engine.week(&query.host_id);
    Ok(Json(AvailabilityResponse {
        host_id: query.host_id,
        week: week.windows().to_vec(),
    }))
}

/// Handler to replace a host's working-hours week wholesale.
#[axum::debug_handler]
pub async fn save_availability_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<SaveAvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, SchedulingError> {
    let week = state.engine.replace_week(&payload.user_id, payload.slots)?;
    info!("availability saved for host {}", payload.user_id);
    Ok(Json(AvailabilityResponse {
        host_id: payload.user_id,
        week: week.windows().to_vec(),
    }))
}

/// Handler to get bookable slots for a host on a given date.
#[axum::debug_handler]
pub async fn get_slots_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, SchedulingError> {
    let date = parse_date(&query.date, "date")?;
    let duration = query
        .duration
        .unwrap_or(state.engine.settings().default_duration_minutes);
    let slots = state.engine.available_slots(&query.host_id, date, duration)?;
    Ok(Json(SlotsResponse {
        slots,
        date: query.date,
        duration,
        host_id: query.host_id,
    }))
}

/// Handler for the advisory ad-hoc conflict check the booking form runs
/// before submitting. The authoritative check re-runs at write time.
#[axum::debug_handler]
pub async fn check_availability_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<CheckAvailabilityRequest>,
) -> Result<Json<CheckAvailabilityResponse>, SchedulingError> {
    let conflicts = state.engine.conflicts_for(
        &payload.host_id,
        payload.start_time,
        payload.end_time,
        payload.exclude_booking_id.as_deref(),
    )?;
    Ok(Json(CheckAvailabilityResponse {
        available: conflicts.is_empty(),
        conflicts,
    }))
}

/// Handler to list bookings, optionally filtered by host, client, status
/// and date range.
#[axum::debug_handler]
pub async fn list_bookings_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<BookingsResponse>, SchedulingError> {
    let range = match (&query.start_date, &query.end_date) {
        (Some(start), Some(end)) => {
            let start_date = parse_date(start, "start_date")?;
            let end_date = parse_date(end, "end_date")?;
            if end_date < start_date {
                return Err(SchedulingError::validation(
                    "end_date",
                    "end_date must not be before start_date",
                ));
            }
            // End date is inclusive: extend the range to the following midnight.
            let range_start = Utc.from_utc_datetime(&start_date.and_hms_opt(0, 0, 0).unwrap());
            let range_end = Utc.from_utc_datetime(
                &end_date
                    .succ_opt()
                    .unwrap_or(end_date)
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            );
            Some((range_start, range_end))
        }
        (None, None) => None,
        _ => {
            return Err(SchedulingError::validation(
                "start_date",
                "start_date and end_date must be provided together",
            ));
        }
    };

    let filter = BookingFilter {
        host_id: query.host_id,
        client_id: query.client_id,
        status: query.status,
        range,
    };
    Ok(Json(BookingsResponse {
        bookings: state.engine.bookings_expanded(&filter),
    }))
}

/// Handler to create a booking.
#[axum::debug_handler]
pub async fn create_booking_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<BookingDraft>,
) -> Result<(StatusCode, Json<Booking>), SchedulingError> {
    let booking = state.engine.create_booking(payload)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler to update a booking. A time change is a reschedule and re-runs
/// conflict checking; a status change runs the lifecycle state machine.
#[axum::debug_handler]
pub async fn update_booking_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<BookingPatch>,
) -> Result<Json<Booking>, SchedulingError> {
    let booking = state.engine.update_booking(&booking_id, payload)?;
    Ok(Json(booking))
}

/// Handler to cancel a booking. Cancellation keeps the record with status
/// `CANCELLED`; it is rejected for bookings already in a terminal state.
#[axum::debug_handler]
pub async fn cancel_booking_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(booking_id): Path<String>,
    payload: Option<Json<CancelBookingRequest>>,
) -> Result<Json<Booking>, SchedulingError> {
    let reason = payload.and_then(|Json(body)| body.reason);
    let booking = state.engine.cancel_booking(&booking_id, reason)?;
    Ok(Json(booking))
}
