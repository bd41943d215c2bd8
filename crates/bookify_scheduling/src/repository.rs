// --- File: crates/bookify_scheduling/src/repository.rs ---
//! In-memory booking repository.
//!
//! Each host's bookings live behind that host's own mutex, making
//! conflict-check-then-write a single atomic unit per host: two concurrent
//! creates for overlapping intervals cannot both pass the check. Read
//! queries take snapshots and run concurrently; a slot returned to a client
//! can always go stale, which is why every write re-validates here instead
//! of trusting a previously computed slot.
//!
//! Lock order is host calendar first, then the id index; no path holds the
//! index while waiting on a host calendar.

use crate::conflict;
use crate::error::SchedulingError;
use crate::lifecycle;
use crate::models::{Booking, BookingDraft, BookingPatch, BookingStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Filter for booking list queries. Absent fields match everything.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub host_id: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

#[derive(Default)]
struct HostCalendar {
    bookings: HashMap<String, Booking>,
}

#[derive(Default)]
pub struct BookingRepository {
    hosts: RwLock<HashMap<String, Arc<Mutex<HostCalendar>>>>,
    /// booking id -> host id, so id-addressed operations find the calendar.
    index: RwLock<HashMap<String, String>>,
}

impl BookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn calendar(&self, host_id: &str) -> Arc<Mutex<HostCalendar>> {
        if let Some(calendar) = self
            .hosts
            .read()
            .expect("host map lock poisoned")
            .get(host_id)
        {
            return calendar.clone();
        }
        self.hosts
            .write()
            .expect("host map lock poisoned")
            .entry(host_id.to_string())
            .or_default()
            .clone()
    }

    fn host_of(&self, booking_id: &str) -> Result<String, SchedulingError> {
        self.index
            .read()
            .expect("index lock poisoned")
            .get(booking_id)
            .cloned()
            .ok_or_else(|| SchedulingError::NotFound(booking_id.to_string()))
    }

    /// Bookings for a host whose interval overlaps `[start, end)`, every
    /// status included, ascending by start time.
    pub fn list_by_host_and_range(
        &self,
        host_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Booking> {
        let calendar = self.calendar(host_id);
        let guard = calendar.lock().expect("host calendar lock poisoned");
        let mut bookings: Vec<Booking> = guard
            .bookings
            .values()
            .filter(|b| conflict::intervals_overlap(b.start_time, b.end_time, start, end))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.start_time);
        bookings
    }

    /// Intervals of the host's occupying bookings overlapping `[start, end)`.
    pub fn occupying_intervals(
        &self,
        host_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.list_by_host_and_range(host_id, start, end)
            .into_iter()
            .filter(|b| b.occupies())
            .map(|b| b.interval())
            .collect()
    }

    /// All bookings matching the filter, ascending by start time.
    pub fn list(&self, filter: &BookingFilter) -> Vec<Booking> {
        let calendars: Vec<Arc<Mutex<HostCalendar>>> = match &filter.host_id {
            Some(host_id) => vec![self.calendar(host_id)],
            None => self
                .hosts
                .read()
                .expect("host map lock poisoned")
                .values()
                .cloned()
                .collect(),
        };

        let mut bookings = Vec::new();
        for calendar in calendars {
            let guard = calendar.lock().expect("host calendar lock poisoned");
            bookings.extend(guard.bookings.values().cloned());
        }

        bookings.retain(|b| {
            filter
                .client_id
                .as_ref()
                .is_none_or(|client| &b.client_id == client)
                && filter.status.is_none_or(|status| b.status == status)
                && filter.range.is_none_or(|(start, end)| {
                    conflict::intervals_overlap(b.start_time, b.end_time, start, end)
                })
        });
        bookings.sort_by_key(|b| b.start_time);
        bookings
    }

    pub fn get(&self, booking_id: &str) -> Result<Booking, SchedulingError> {
        let host_id = self.host_of(booking_id)?;
        let calendar = self.calendar(&host_id);
        let guard = calendar.lock().expect("host calendar lock poisoned");
        guard
            .bookings
            .get(booking_id)
            .cloned()
            .ok_or_else(|| SchedulingError::NotFound(booking_id.to_string()))
    }

    /// Creates a booking, holding the host lock across the conflict check
    /// and the insert.
    pub fn create(&self, draft: BookingDraft) -> Result<Booking, SchedulingError> {
        validate_interval(draft.start_time, draft.end_time)?;
        if draft.host_id.is_empty() {
            return Err(SchedulingError::validation("host_id", "host_id is required"));
        }
        if draft.client_id.is_empty() {
            return Err(SchedulingError::validation(
                "client_id",
                "client_id is required",
            ));
        }
        if draft.title.trim().is_empty() {
            return Err(SchedulingError::validation("title", "title is required"));
        }
        let status = lifecycle::initial_status(draft.status)?;

        let calendar = self.calendar(&draft.host_id);
        let mut guard = calendar.lock().expect("host calendar lock poisoned");
        conflict::check_interval(
            guard.bookings.values(),
            draft.start_time,
            draft.end_time,
            None,
        )?;

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            host_id: draft.host_id,
            client_id: draft.client_id,
            service_id: draft.service_id,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            meeting_url: draft.meeting_url,
            notes: draft.notes,
            attendees: draft.attendees,
            start_time: draft.start_time,
            end_time: draft.end_time,
            duration_minutes: (draft.end_time - draft.start_time).num_minutes(),
            status,
            google_event_id: None,
            cancellation_reason: None,
            created_at: now,
            created_by: draft.created_by,
            updated_at: now,
        };

        // Insert while still holding the host lock, then index.
        guard.bookings.insert(booking.id.clone(), booking.clone());
        self.index
            .write()
            .expect("index lock poisoned")
            .insert(booking.id.clone(), booking.host_id.clone());

        info!(
            "created booking {} for host {} [{} - {}] as {}",
            booking.id, booking.host_id, booking.start_time, booking.end_time, booking.status
        );
        Ok(booking)
    }

    /// Applies a partial update. An interval change re-runs conflict
    /// checking against all *other* bookings and moves the booking to
    /// `RESCHEDULED`; a status field runs the lifecycle state machine. All
    /// validation happens on a working copy, so a failed update leaves the
    /// stored booking byte-for-byte unchanged.
    pub fn update(&self, booking_id: &str, patch: BookingPatch) -> Result<Booking, SchedulingError> {
        let host_id = self.host_of(booking_id)?;
        let calendar = self.calendar(&host_id);
        let mut guard = calendar.lock().expect("host calendar lock poisoned");

        let current = guard
            .bookings
            .get(booking_id)
            .ok_or_else(|| SchedulingError::NotFound(booking_id.to_string()))?;
        let mut updated = current.clone();

        if patch.changes_interval() {
            let new_start = patch.start_time.unwrap_or(current.start_time);
            let new_end = patch.end_time.unwrap_or(current.end_time);
            validate_interval(new_start, new_end)?;
            lifecycle::validate_transition(current.status, BookingStatus::Rescheduled)?;
            conflict::check_interval(
                guard.bookings.values(),
                new_start,
                new_end,
                Some(booking_id),
            )?;
            updated.start_time = new_start;
            updated.end_time = new_end;
            updated.duration_minutes = (new_end - new_start).num_minutes();
            updated.status = BookingStatus::Rescheduled;
        }

        if let Some(to) = patch.status {
            // Re-sending the current status is a no-op, not a transition.
            if to != updated.status {
                lifecycle::validate_timed_transition(
                    updated.status,
                    to,
                    updated.end_time,
                    Utc::now(),
                )?;
                updated.status = to;
            }
        }

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(SchedulingError::validation("title", "title is required"));
            }
            updated.title = title;
        }
        if let Some(description) = patch.description {
            updated.description = Some(description);
        }
        if let Some(location) = patch.location {
            updated.location = Some(location);
        }
        if let Some(meeting_url) = patch.meeting_url {
            updated.meeting_url = Some(meeting_url);
        }
        if let Some(notes) = patch.notes {
            updated.notes = Some(notes);
        }
        if let Some(attendees) = patch.attendees {
            updated.attendees = attendees;
        }
        if let Some(service_id) = patch.service_id {
            updated.service_id = Some(service_id);
        }
        updated.updated_at = Utc::now();

        guard.bookings.insert(booking_id.to_string(), updated.clone());
        debug!("updated booking {} to {}", booking_id, updated.status);
        Ok(updated)
    }

    /// Cancels a booking, recording the optional reason. Allowed from the
    /// occupying statuses only; terminal bookings are rejected and left
    /// untouched.
    pub fn cancel(
        &self,
        booking_id: &str,
        reason: Option<String>,
    ) -> Result<Booking, SchedulingError> {
        let host_id = self.host_of(booking_id)?;
        let calendar = self.calendar(&host_id);
        let mut guard = calendar.lock().expect("host calendar lock poisoned");

        let current = guard
            .bookings
            .get(booking_id)
            .ok_or_else(|| SchedulingError::NotFound(booking_id.to_string()))?;
        lifecycle::validate_transition(current.status, BookingStatus::Cancelled)?;

        let mut cancelled = current.clone();
        cancelled.status = BookingStatus::Cancelled;
        cancelled.cancellation_reason = reason;
        cancelled.updated_at = Utc::now();
        guard
            .bookings
            .insert(booking_id.to_string(), cancelled.clone());

        info!("cancelled booking {} for host {}", booking_id, host_id);
        Ok(cancelled)
    }

    /// Records the provider-side event id after a successful sync push.
    /// Not a lifecycle operation; scheduling state is unaffected.
    pub fn attach_google_event_id(&self, booking_id: &str, event_id: &str) {
        let Ok(host_id) = self.host_of(booking_id) else {
            return;
        };
        let calendar = self.calendar(&host_id);
        let mut guard = calendar.lock().expect("host calendar lock poisoned");
        if let Some(booking) = guard.bookings.get_mut(booking_id) {
            booking.google_event_id = Some(event_id.to_string());
        }
    }
}

fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), SchedulingError> {
    if end <= start {
        return Err(SchedulingError::validation(
            "end_time",
            format!("end_time {} must be after start_time {}", end, start),
        ));
    }
    Ok(())
}
