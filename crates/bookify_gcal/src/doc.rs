// File: crates/bookify_gcal/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{ConnectResponse, DisconnectRequest, DisconnectResponse};

#[utoipa::path(
    get,
    path = "/calendar/status",
    params(
        ("host_id" = String, Query, description = "Host whose connection is checked")
    ),
    responses(
        (status = 200, description = "Connection status", example = json!({
            "connected": true,
            "expired": false,
            "email": "host@example.com"
        })),
        (status = 503, description = "Calendar sync disabled")
    )
)]
fn doc_calendar_status_handler() {}

#[utoipa::path(
    get,
    path = "/calendar/connect",
    params(
        ("host_id" = String, Query, description = "Host to connect")
    ),
    responses(
        (status = 200, description = "OAuth authorize URL", body = ConnectResponse),
        (status = 500, description = "Sync not configured")
    )
)]
fn doc_calendar_connect_handler() {}

#[utoipa::path(
    post,
    path = "/calendar/disconnect",
    request_body(content = DisconnectRequest),
    responses(
        (status = 200, description = "Disconnect result", body = DisconnectResponse,
         example = json!({
             "success": true,
             "message": "Calendar disconnected."
         })
        )
    )
)]
fn doc_calendar_disconnect_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_calendar_status_handler,
        doc_calendar_connect_handler,
        doc_calendar_disconnect_handler
    ),
    components(
        schemas(
            ConnectResponse,
            DisconnectRequest,
            DisconnectResponse
        )
    ),
    tags(
        (name = "calendar-sync", description = "External calendar sync API")
    ),
    servers(
        (url = "/api", description = "Calendar sync API server")
    )
)]
pub struct GcalApiDoc;
