// --- File: crates/bookify_scheduling/src/error.rs ---
//! Error taxonomy of the scheduling core.
//!
//! Every core operation returns a typed error from this module; the
//! presentation layer translates them into the JSON error envelope. Sync
//! collaborator failures never appear here: they are logged as warnings
//! attached to an otherwise successful mutation.

use crate::models::{Booking, BookingStatus};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookify_common::HttpStatusCode;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    /// Malformed input. Carries the offending field for field-level messages.
    #[error("Validation failed for `{field}`: {message}")]
    Validation { field: &'static str, message: String },

    /// The requested interval overlaps existing occupying bookings.
    /// Carries the full conflicting set so callers can offer alternatives.
    #[error("Requested interval conflicts with {} existing booking(s)", .0.len())]
    Conflict(Vec<Booking>),

    /// The referenced booking does not exist.
    #[error("Booking not found: {0}")]
    NotFound(String),

    /// Illegal lifecycle transition; the stored state is left untouched.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// The booking is in a state that does not allow the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SchedulingError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SchedulingError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Short machine-readable code used in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            SchedulingError::Validation { .. } => "validation_error",
            SchedulingError::Conflict(_) => "conflict",
            SchedulingError::NotFound(_) => "not_found",
            SchedulingError::InvalidTransition { .. } | SchedulingError::InvalidState(_) => {
                "invalid_state"
            }
            SchedulingError::Internal(_) => "internal_error",
        }
    }
}

impl HttpStatusCode for SchedulingError {
    fn status_code(&self) -> u16 {
        match self {
            SchedulingError::Validation { .. } => 400,
            SchedulingError::Conflict(_) => 409,
            SchedulingError::NotFound(_) => 404,
            SchedulingError::InvalidTransition { .. } => 409,
            SchedulingError::InvalidState(_) => 409,
            SchedulingError::Internal(_) => 500,
        }
    }
}

impl IntoResponse for SchedulingError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self {
            SchedulingError::Conflict(conflicts) => json!({
                "error": {
                    "code": self.code(),
                    "message": self.to_string(),
                    "conflicts": conflicts,
                }
            }),
            _ => json!({
                "error": {
                    "code": self.code(),
                    "message": self.to_string(),
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}
