// --- File: crates/bookify_scheduling/src/engine.rs ---
//! Scheduling engine: the operation surface handlers talk to.
//!
//! The engine composes the working-hours store, the booking repository and
//! the slot cache, and owns the two cross-cutting rules: every mutation
//! invalidates exactly the cached reads it affects, and every successful
//! mutation notifies the external calendar sync collaborator
//! fire-and-forget. A sync failure is a logged warning, never a failed
//! booking operation.

use crate::cache::{SlotCache, SlotCacheKey};
use crate::conflict;
use crate::directory::DirectoryStore;
use crate::error::SchedulingError;
use crate::models::{
    AvailabilitySlot, Booking, BookingDraft, BookingPatch, BookingStatus, BookingView, DayOfWeek,
    WeekSchedule, WorkingHoursWindow,
};
use crate::repository::{BookingFilter, BookingRepository};
use crate::slots;
use crate::working_hours::WorkingHoursStore;
use bookify_common::services::{BoxedError, CalendarSyncService, SyncEvent};
use bookify_config::AppConfig;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Deployment-level slot generation settings.
#[derive(Debug, Clone)]
pub struct SlotSettings {
    /// Grid step for slot start times, in minutes.
    pub step_minutes: i64,
    /// Duration used when a slot query omits one.
    pub default_duration_minutes: i64,
    /// Timezone working-hours windows are interpreted in.
    pub time_zone: Tz,
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            step_minutes: 30,
            default_duration_minutes: 30,
            time_zone: Tz::UTC,
        }
    }
}

impl SlotSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        let defaults = Self::default();
        let Some(scheduling) = config.scheduling.as_ref() else {
            return defaults;
        };
        let time_zone = scheduling
            .time_zone
            .as_deref()
            .and_then(|name| Tz::from_str(name).ok())
            .unwrap_or(defaults.time_zone);
        Self {
            step_minutes: scheduling.slot_step_minutes.unwrap_or(defaults.step_minutes),
            default_duration_minutes: scheduling
                .default_duration_minutes
                .unwrap_or(defaults.default_duration_minutes),
            time_zone,
        }
    }
}

enum SyncAction {
    Upsert,
    Remove,
}

pub struct SchedulingEngine {
    working_hours: WorkingHoursStore,
    repository: Arc<BookingRepository>,
    slot_cache: Arc<SlotCache>,
    directory: Arc<DirectoryStore>,
    settings: SlotSettings,
    sync: Option<Arc<dyn CalendarSyncService<Error = BoxedError>>>,
}

impl SchedulingEngine {
    pub fn new(settings: SlotSettings) -> Self {
        Self {
            working_hours: WorkingHoursStore::new(),
            repository: Arc::new(BookingRepository::new()),
            slot_cache: Arc::new(SlotCache::new()),
            directory: Arc::new(DirectoryStore::new()),
            settings,
            sync: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(SlotSettings::from_config(config))
    }

    /// Attaches the external calendar sync collaborator.
    pub fn with_sync(
        mut self,
        sync: Arc<dyn CalendarSyncService<Error = BoxedError>>,
    ) -> Self {
        self.sync = Some(sync);
        self
    }

    pub fn settings(&self) -> &SlotSettings {
        &self.settings
    }

    /// The registry resolving client/service references for display.
    pub fn directory(&self) -> Arc<DirectoryStore> {
        self.directory.clone()
    }

    // --- Availability ---

    pub fn week(&self, host_id: &str) -> WeekSchedule {
        self.working_hours.get_week(host_id)
    }

    /// Replaces the host's week and drops every cached slot list for them.
    pub fn replace_week(
        &self,
        host_id: &str,
        windows: Vec<WorkingHoursWindow>,
    ) -> Result<WeekSchedule, SchedulingError> {
        let week = self.working_hours.set_week(host_id, windows)?;
        self.slot_cache.invalidate_host(host_id);
        Ok(week)
    }

    // --- Slots ---

    /// Bookable slots of `duration_minutes` for the host on `date`.
    /// Cached per (host, date, duration); mutations invalidate the tags
    /// they touch.
    pub fn available_slots(
        &self,
        host_id: &str,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> Result<Vec<AvailabilitySlot>, SchedulingError> {
        let key = SlotCacheKey {
            host_id: host_id.to_string(),
            date,
            duration_minutes,
        };
        if let Some(slots) = self.slot_cache.get(&key) {
            debug!("slot cache hit for host {} on {}", host_id, date);
            return Ok(slots);
        }

        let window = self
            .working_hours
            .window_for(host_id, DayOfWeek::from(date.weekday()));

        // Over-fetch one day either side in UTC; the generator clips to the
        // local window, so bookings straddling midnight are still seen.
        let fetch_start = Utc
            .from_utc_datetime(&(date - Duration::days(1)).and_hms_opt(0, 0, 0).unwrap());
        let fetch_end =
            Utc.from_utc_datetime(&(date + Duration::days(2)).and_hms_opt(0, 0, 0).unwrap());
        let busy = self
            .repository
            .occupying_intervals(host_id, fetch_start, fetch_end);

        let computed = slots::generate_slots(
            &window,
            date,
            Duration::minutes(duration_minutes),
            Duration::minutes(self.settings.step_minutes),
            self.settings.time_zone,
            &busy,
        )?;
        self.slot_cache.insert(key, computed.clone());
        Ok(computed)
    }

    // --- Conflict checks ---

    /// Advisory conflict check for an ad-hoc interval. Never authorizes a
    /// write: creates and updates re-check under the host lock.
    pub fn conflicts_for(
        &self,
        host_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<&str>,
    ) -> Result<Vec<Booking>, SchedulingError> {
        if end <= start {
            return Err(SchedulingError::validation(
                "end_time",
                format!("end_time {} must be after start_time {}", end, start),
            ));
        }
        let snapshot = self.repository.list_by_host_and_range(host_id, start, end);
        Ok(conflict::conflicting_bookings(
            &snapshot,
            start,
            end,
            exclude_booking_id,
        ))
    }

    // --- Bookings ---

    pub fn bookings(&self, filter: &BookingFilter) -> Vec<Booking> {
        self.repository.list(filter)
    }

    /// Bookings with their client/service references resolved for display.
    /// An unresolvable reference expands to `None`; the caller renders a
    /// placeholder.
    pub fn bookings_expanded(&self, filter: &BookingFilter) -> Vec<BookingView> {
        self.repository
            .list(filter)
            .into_iter()
            .map(|booking| {
                let client = self.directory.client(&booking.client_id);
                let service = booking
                    .service_id
                    .as_deref()
                    .and_then(|id| self.directory.service(id));
                BookingView {
                    booking,
                    client,
                    service,
                }
            })
            .collect()
    }

    pub fn booking(&self, booking_id: &str) -> Result<Booking, SchedulingError> {
        self.repository.get(booking_id)
    }

    pub fn create_booking(&self, draft: BookingDraft) -> Result<Booking, SchedulingError> {
        let booking = self.repository.create(draft)?;
        self.invalidate_booking_dates(&booking, None);
        self.notify_sync(&booking, SyncAction::Upsert);
        Ok(booking)
    }

    pub fn update_booking(
        &self,
        booking_id: &str,
        patch: BookingPatch,
    ) -> Result<Booking, SchedulingError> {
        let before = self.repository.get(booking_id)?;
        let booking = self.repository.update(booking_id, patch)?;
        self.invalidate_booking_dates(&booking, Some(&before));
        let action = if booking.status == BookingStatus::Cancelled {
            SyncAction::Remove
        } else {
            SyncAction::Upsert
        };
        self.notify_sync(&booking, action);
        Ok(booking)
    }

    pub fn cancel_booking(
        &self,
        booking_id: &str,
        reason: Option<String>,
    ) -> Result<Booking, SchedulingError> {
        let booking = self.repository.cancel(booking_id, reason)?;
        self.invalidate_booking_dates(&booking, None);
        self.notify_sync(&booking, SyncAction::Remove);
        Ok(booking)
    }

    /// Invalidates the slot cache tags a mutation touched: the booking's
    /// current local date, and its prior date when an update moved it.
    fn invalidate_booking_dates(&self, booking: &Booking, before: Option<&Booking>) {
        let tz = self.settings.time_zone;
        self.slot_cache
            .invalidate_date(&booking.host_id, booking.start_time.with_timezone(&tz).date_naive());
        self.slot_cache
            .invalidate_date(&booking.host_id, booking.end_time.with_timezone(&tz).date_naive());
        if let Some(before) = before {
            self.slot_cache.invalidate_date(
                &booking.host_id,
                before.start_time.with_timezone(&tz).date_naive(),
            );
        }
    }

    /// Fire-and-forget mirror to the external calendar. Skipped when no
    /// sync collaborator is wired or the booking is not mirrored and the
    /// host has no active connection. Failures are logged warnings; the
    /// booking mutation has already committed and is never rolled back.
    fn notify_sync(&self, booking: &Booking, action: SyncAction) {
        let Some(sync) = self.sync.clone() else {
            return;
        };
        let repository = self.repository.clone();
        let booking = booking.clone();

        tokio::spawn(async move {
            let connected = match sync.connection_status(&booking.host_id).await {
                Ok(status) => status.connected && !status.expired,
                Err(err) => {
                    warn!(
                        "calendar sync status check failed for host {}: {}",
                        booking.host_id, err
                    );
                    false
                }
            };
            if booking.google_event_id.is_none() && !connected {
                return;
            }

            let outcome = match action {
                SyncAction::Remove => match booking.google_event_id.as_deref() {
                    Some(event_id) => sync
                        .remove_booking(&booking.host_id, event_id)
                        .await
                        .map(|_| None),
                    None => return,
                },
                SyncAction::Upsert => {
                    let event = SyncEvent {
                        start_time: booking.start_time.to_rfc3339(),
                        end_time: booking.end_time.to_rfc3339(),
                        summary: booking.title.clone(),
                        description: booking.description.clone(),
                        event_id: booking.google_event_id.clone(),
                        attendee_emails: booking
                            .attendees
                            .iter()
                            .map(|a| a.email.clone())
                            .collect(),
                    };
                    sync.push_booking(&booking.host_id, event)
                        .await
                        .map(|result| result.event_id)
                }
            };

            match outcome {
                Ok(Some(event_id)) => {
                    repository.attach_google_event_id(&booking.id, &event_id);
                    debug!("booking {} mirrored as event {}", booking.id, event_id);
                }
                Ok(None) => debug!("booking {} sync completed", booking.id),
                Err(err) => {
                    warn!("calendar sync for booking {} failed: {}", booking.id, err);
                }
            }
        });
    }
}
