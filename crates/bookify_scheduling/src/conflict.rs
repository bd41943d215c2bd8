// --- File: crates/bookify_scheduling/src/conflict.rs ---
//! Interval conflict detection.
//!
//! Intervals are half-open `[start, end)`: a booking ending at 10:00 does
//! not conflict with one starting at 10:00. Only bookings in an occupying
//! status count.

use crate::error::SchedulingError;
use crate::models::Booking;
use chrono::{DateTime, Utc};

/// Half-open overlap test: `[s1, e1)` and `[s2, e2)` overlap iff
/// `s1 < e2 && s2 < e1`.
pub fn intervals_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && s2 < e1
}

/// Returns the occupying bookings whose interval overlaps `[start, end)`,
/// skipping `exclude_booking_id` so an update can check against all *other*
/// bookings.
pub fn conflicting_bookings<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_booking_id: Option<&str>,
) -> Vec<Booking> {
    let mut conflicts: Vec<Booking> = bookings
        .into_iter()
        .filter(|b| b.occupies())
        .filter(|b| exclude_booking_id != Some(b.id.as_str()))
        .filter(|b| intervals_overlap(b.start_time, b.end_time, start, end))
        .cloned()
        .collect();
    conflicts.sort_by_key(|b| b.start_time);
    conflicts
}

/// Validates that `[start, end)` is free on the host calendar represented by
/// `bookings`, yielding `Conflict` with the overlapping set otherwise.
pub fn check_interval<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_booking_id: Option<&str>,
) -> Result<(), SchedulingError> {
    let conflicts = conflicting_bookings(bookings, start, end, exclude_booking_id);
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(SchedulingError::Conflict(conflicts))
    }
}
