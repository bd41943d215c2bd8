// --- File: crates/bookify_scheduling/src/slots.rs ---
//! Free-slot computation.
//!
//! A slot query resolves the host's working-hours window for the requested
//! date, subtracts the occupying bookings, and emits candidate intervals of
//! exactly the requested duration. Start times align to a fixed grid
//! (30-minute steps by default, anchored at local midnight) so the calendar
//! UI renders them on its grid; when alignment would waste an otherwise free
//! opening at the tail of a gap, the candidate falls back flush against the
//! gap's start.

use crate::error::SchedulingError;
use crate::models::{AvailabilitySlot, WorkingHoursWindow};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Merges overlapping or touching busy periods into a sorted disjoint set.
pub fn merge_busy_periods(
    busy: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    if busy.is_empty() {
        return vec![];
    }
    let mut sorted = busy.to_vec();
    sorted.sort_by_key(|(start, _)| *start);
    let mut merged = vec![sorted[0]];
    for &(start, end) in &sorted[1..] {
        let last = merged.last_mut().unwrap();
        if start <= last.1 {
            last.1 = last.1.max(end);
        } else {
            merged.push((start, end));
        }
    }
    merged
}

/// Subtracts a merged, sorted busy set from `[window_start, window_end)`,
/// producing the disjoint free sub-intervals in ascending order.
pub fn free_intervals(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    merged_busy: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut free = Vec::new();
    let mut cursor = window_start;
    for &(busy_start, busy_end) in merged_busy {
        if busy_end <= window_start || busy_start >= window_end {
            continue;
        }
        let clipped_start = busy_start.max(window_start);
        let clipped_end = busy_end.min(window_end);
        if clipped_start > cursor {
            free.push((cursor, clipped_start));
        }
        cursor = cursor.max(clipped_end);
    }
    if cursor < window_end {
        free.push((cursor, window_end));
    }
    free
}

/// Resolves a local wall-clock time on `date` to a UTC instant.
/// Ambiguous local times (DST fold) resolve to the earlier instant; times
/// inside a DST gap do not exist and yield `None`.
fn local_instant(time_zone: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    match time_zone.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Rounds `instant` up to the next grid point, where the grid is anchored at
/// local midnight and spaced `step` apart. A non-positive step disables
/// alignment.
fn align_up_to_grid(instant: DateTime<Utc>, step: Duration, time_zone: Tz) -> DateTime<Utc> {
    let step_seconds = step.num_seconds();
    if step_seconds <= 0 {
        return instant;
    }
    let local = instant.with_timezone(&time_zone);
    let since_midnight = local.time() - NaiveTime::from_hms_opt(0, 0, 0).unwrap();
    let remainder = since_midnight.num_seconds() % step_seconds;
    if remainder == 0 {
        instant
    } else {
        instant + Duration::seconds(step_seconds - remainder)
    }
}

/// Computes every bookable slot of `duration` within the working-hours
/// window on `date`, given the host's occupying booking intervals.
///
/// The returned slots are disjoint and strictly ascending. An inactive
/// window or a fully booked day yields an empty list, not an error.
pub fn generate_slots(
    window: &WorkingHoursWindow,
    date: NaiveDate,
    duration: Duration,
    step: Duration,
    time_zone: Tz,
    busy_periods: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Result<Vec<AvailabilitySlot>, SchedulingError> {
    if duration <= Duration::zero() {
        return Err(SchedulingError::validation(
            "duration",
            format!("duration must be positive, got {} minutes", duration.num_minutes()),
        ));
    }
    if !window.is_active {
        return Ok(vec![]);
    }

    let (Some(window_start), Some(window_end)) = (
        local_instant(time_zone, date, window.start_time),
        local_instant(time_zone, date, window.end_time),
    ) else {
        // The window edge falls into a DST gap on this date; there is no
        // well-defined instant to anchor slots to.
        debug!(
            "working hours window on {} does not exist in {}",
            date, time_zone
        );
        return Ok(vec![]);
    };
    if window_end <= window_start {
        return Ok(vec![]);
    }

    let merged_busy = merge_busy_periods(busy_periods);
    let mut slots = Vec::new();

    for (free_start, free_end) in free_intervals(window_start, window_end, &merged_busy) {
        let mut cursor = free_start;
        loop {
            let aligned = align_up_to_grid(cursor, step, time_zone);
            // Prefer the grid point; fall back flush against the gap start
            // when the grid point leaves too little room but the gap itself
            // still fits a full slot.
            let slot_start = if aligned + duration <= free_end {
                aligned
            } else {
                cursor
            };
            if slot_start + duration > free_end {
                break;
            }
            slots.push(AvailabilitySlot {
                start_time: slot_start,
                end_time: slot_start + duration,
            });
            cursor = slot_start + duration;
        }
    }

    Ok(slots)
}
