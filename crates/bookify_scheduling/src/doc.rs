// File: crates/bookify_scheduling/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{
    AvailabilityResponse, BookingsResponse, CancelBookingRequest, CheckAvailabilityRequest,
    CheckAvailabilityResponse, SaveAvailabilityRequest, SlotsResponse,
};
use crate::directory::{ClientRecord, ServiceRecord};
use crate::models::{
    Attendee, AvailabilitySlot, Booking, BookingDraft, BookingPatch, BookingStatus, BookingView,
    WorkingHoursWindow,
};

#[utoipa::path(
    get,
    path = "/availability",
    params(
        ("host_id" = String, Query, description = "Host whose week is requested")
    ),
    responses(
        (status = 200, description = "Ordered 7-element working-hours week", body = AvailabilityResponse)
    )
)]
fn doc_get_availability_handler() {}

#[utoipa::path(
    post,
    path = "/availability",
    request_body(content = SaveAvailabilityRequest),
    responses(
        (status = 200, description = "Saved week", body = AvailabilityResponse),
        (status = 400, description = "Invalid week: wrong day coverage or start >= end on an active day")
    )
)]
fn doc_save_availability_handler() {}

#[utoipa::path(
    get,
    path = "/bookings/slots",
    params(
        ("host_id" = String, Query, description = "Host to compute slots for"),
        ("date" = String, Query, description = "Target day in YYYY-MM-DD format", example = "2025-05-05"),
        ("duration" = Option<i64>, Query, description = "Slot duration in minutes", example = 30)
    ),
    responses(
        (status = 200, description = "Bookable slots, ascending and disjoint", body = SlotsResponse),
        (status = 400, description = "Invalid date or non-positive duration")
    )
)]
fn doc_get_slots_handler() {}

#[utoipa::path(
    post,
    path = "/bookings/availability",
    request_body(content = CheckAvailabilityRequest),
    responses(
        (status = 200, description = "Advisory conflict check result", body = CheckAvailabilityResponse)
    )
)]
fn doc_check_availability_handler() {}

#[utoipa::path(
    post,
    path = "/bookings",
    request_body(content = BookingDraft, example = json!({
        "host_id": "host-1",
        "client_id": "client-9",
        "title": "Quarterly strategy review",
        "start_time": "2025-05-15T10:00:00Z",
        "end_time": "2025-05-15T11:00:00Z"
    })),
    responses(
        (status = 201, description = "Created booking", body = Booking),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Interval conflicts with existing occupying bookings")
    )
)]
fn doc_create_booking_handler() {}

#[utoipa::path(
    put,
    path = "/bookings/{booking_id}",
    params(
        ("booking_id" = String, Path, description = "The booking to update")
    ),
    request_body(content = BookingPatch),
    responses(
        (status = 200, description = "Updated booking", body = Booking),
        (status = 404, description = "Unknown booking"),
        (status = 409, description = "Conflict or illegal status transition")
    )
)]
fn doc_update_booking_handler() {}

#[utoipa::path(
    delete,
    path = "/bookings/{booking_id}",
    params(
        ("booking_id" = String, Path, description = "The booking to cancel")
    ),
    request_body(content = CancelBookingRequest),
    responses(
        (status = 200, description = "Cancelled booking", body = Booking),
        (status = 404, description = "Unknown booking"),
        (status = 409, description = "Booking already in a terminal state")
    )
)]
fn doc_cancel_booking_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_availability_handler,
        doc_save_availability_handler,
        doc_get_slots_handler,
        doc_check_availability_handler,
        doc_create_booking_handler,
        doc_update_booking_handler,
        doc_cancel_booking_handler
    ),
    components(
        schemas(
            WorkingHoursWindow,
            AvailabilityResponse,
            SaveAvailabilityRequest,
            SlotsResponse,
            AvailabilitySlot,
            CheckAvailabilityRequest,
            CheckAvailabilityResponse,
            Booking,
            BookingView,
            ClientRecord,
            ServiceRecord,
            BookingDraft,
            BookingPatch,
            BookingStatus,
            Attendee,
            BookingsResponse,
            CancelBookingRequest
        )
    ),
    tags(
        (name = "scheduling", description = "Booking and Availability API")
    ),
    servers(
        (url = "/api", description = "Scheduling API server")
    )
)]
pub struct SchedulingApiDoc;
