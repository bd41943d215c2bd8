// --- File: crates/bookify_scheduling/src/lifecycle.rs ---
//! Booking status state machine.
//!
//! Transition table:
//!
//! ```text
//! PENDING     -> CONFIRMED | CANCELLED | RESCHEDULED
//! CONFIRMED   -> CANCELLED | RESCHEDULED | COMPLETED | NO_SHOW
//! RESCHEDULED -> CONFIRMED | CANCELLED | RESCHEDULED
//! CANCELLED   -> (terminal)
//! COMPLETED   -> (terminal)
//! NO_SHOW     -> (terminal)
//! ```
//!
//! Invalid transitions are reported to the caller and never applied; the
//! booking's prior state is preserved unchanged on failure.

use crate::error::SchedulingError;
use crate::models::BookingStatus;
use chrono::{DateTime, Utc};

/// Whether `from -> to` is a legal transition.
pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Pending, Cancelled)
            | (Pending, Rescheduled)
            | (Confirmed, Cancelled)
            | (Confirmed, Rescheduled)
            | (Confirmed, Completed)
            | (Confirmed, NoShow)
            | (Rescheduled, Confirmed)
            | (Rescheduled, Cancelled)
            | (Rescheduled, Rescheduled)
    )
}

/// Validates a transition, yielding a typed error for illegal ones.
pub fn validate_transition(
    from: BookingStatus,
    to: BookingStatus,
) -> Result<(), SchedulingError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(SchedulingError::InvalidTransition { from, to })
    }
}

/// Validates a transition that depends on wall-clock time.
///
/// `COMPLETED` is only reachable once the booking's end has elapsed; a
/// booking cannot be completed while it is still in the future.
pub fn validate_timed_transition(
    from: BookingStatus,
    to: BookingStatus,
    booking_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), SchedulingError> {
    validate_transition(from, to)?;
    if to == BookingStatus::Completed && now < booking_end {
        return Err(SchedulingError::InvalidState(format!(
            "cannot complete a booking before its end time {}",
            booking_end
        )));
    }
    Ok(())
}

/// Resolves the initial status of a new booking. The creator may choose
/// `PENDING` or `CONFIRMED`; anything else is rejected.
pub fn initial_status(requested: Option<BookingStatus>) -> Result<BookingStatus, SchedulingError> {
    match requested {
        None => Ok(BookingStatus::Pending),
        Some(status @ (BookingStatus::Pending | BookingStatus::Confirmed)) => Ok(status),
        Some(other) => Err(SchedulingError::validation(
            "status",
            format!("a booking cannot be created as {}", other),
        )),
    }
}
