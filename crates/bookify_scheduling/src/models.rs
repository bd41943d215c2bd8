// --- File: crates/bookify_scheduling/src/models.rs ---
//! Domain model of the booking and availability core.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Day of the week with an explicit wire encoding (Sunday = 0 .. Saturday = 6).
///
/// The encoding is part of the availability API contract; positional array
/// indexing is never used to infer a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DayOfWeek {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl DayOfWeek {
    /// All days in wire order, Sunday first.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Position in the wire order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DayOfWeek::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("day_of_week must be 0-6, got {}", value))
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day as u8
    }
}

/// A recurring weekly availability window for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WorkingHoursWindow {
    /// Wire encoding 0-6, Sunday = 0.
    #[cfg_attr(feature = "openapi", schema(value_type = u8, example = 1))]
    pub day_of_week: DayOfWeek,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:00:00"))]
    pub start_time: NaiveTime,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "17:00:00"))]
    pub end_time: NaiveTime,
    pub is_active: bool,
}

impl WorkingHoursWindow {
    pub fn new(day_of_week: DayOfWeek, start: NaiveTime, end: NaiveTime, is_active: bool) -> Self {
        Self {
            day_of_week,
            start_time: start,
            end_time: end,
            is_active,
        }
    }
}

/// A full week of working-hours windows, one per day, ordered Sunday..Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
    days: [WorkingHoursWindow; 7],
}

impl WeekSchedule {
    /// The fixed fallback week for hosts that never saved availability:
    /// Monday-Friday active 09:00-17:00, weekend inactive. Pure and
    /// deterministic; it is never written back on read.
    pub fn default_week() -> Self {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        let days = DayOfWeek::ALL
            .map(|day| WorkingHoursWindow::new(day, nine, five, !day.is_weekend()));
        Self { days }
    }

    /// Builds a week from exactly 7 windows covering each day once.
    /// Validation errors carry the offending field so callers can surface
    /// field-level messages.
    pub fn from_windows(
        windows: Vec<WorkingHoursWindow>,
    ) -> Result<Self, crate::error::SchedulingError> {
        use crate::error::SchedulingError;

        if windows.len() != 7 {
            return Err(SchedulingError::Validation {
                field: "slots",
                message: format!("expected exactly 7 windows, got {}", windows.len()),
            });
        }

        let mut week = Self::default_week();
        let mut seen = [false; 7];
        for window in windows {
            let idx = window.day_of_week.index();
            if seen[idx] {
                return Err(SchedulingError::Validation {
                    field: "day_of_week",
                    message: format!("day {} appears more than once", idx),
                });
            }
            seen[idx] = true;
            if window.is_active && window.start_time >= window.end_time {
                return Err(SchedulingError::Validation {
                    field: "start_time",
                    message: format!(
                        "active day {} has start_time {} >= end_time {}",
                        idx, window.start_time, window.end_time
                    ),
                });
            }
            week.days[idx] = window;
        }
        Ok(week)
    }

    pub fn window_for(&self, day: DayOfWeek) -> &WorkingHoursWindow {
        &self.days[day.index()]
    }

    pub fn windows(&self) -> &[WorkingHoursWindow; 7] {
        &self.days
    }
}

/// Status of a booking. The occupying statuses block the booking's interval
/// on the host calendar; the terminal statuses accept no further transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
    Rescheduled,
}

impl BookingStatus {
    /// Whether a booking in this status blocks its interval.
    pub fn is_occupying(self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Rescheduled
        )
    }

    /// Whether this status accepts no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::Completed | BookingStatus::NoShow
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::NoShow => "NO_SHOW",
            BookingStatus::Rescheduled => "RESCHEDULED",
        };
        f.write_str(name)
    }
}

/// A person invited to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Attendee {
    pub name: String,
    pub email: String,
}

/// A scheduled booking on a host calendar.
///
/// Bookings are never physically deleted; cancellation is a status change
/// that keeps the record for history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Booking {
    pub id: String,
    pub host_id: String,
    pub client_id: String,
    pub service_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub meeting_url: Option<String>,
    /// Internal notes, not shown to the client.
    pub notes: Option<String>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T10:00:00Z"))]
    pub start_time: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T11:00:00Z"))]
    pub end_time: DateTime<Utc>,
    /// Derived from the interval; kept on the record for display queries.
    pub duration_minutes: i64,
    pub status: BookingStatus,
    /// Provider-side event id; presence means the booking is mirrored
    /// to the host's external calendar.
    pub google_event_id: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The half-open interval `[start_time, end_time)` this booking occupies.
    pub fn interval(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start_time, self.end_time)
    }

    pub fn occupies(&self) -> bool {
        self.status.is_occupying()
    }
}

/// Payload for creating a booking.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingDraft {
    pub host_id: String,
    pub client_id: String,
    pub service_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub meeting_url: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Initial status; `PENDING` when omitted. Only `PENDING` or
    /// `CONFIRMED` are accepted at creation time.
    pub status: Option<BookingStatus>,
    pub created_by: Option<String>,
}

/// Partial update for a booking. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub meeting_url: Option<String>,
    pub notes: Option<String>,
    pub attendees: Option<Vec<Attendee>>,
    pub service_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
}

impl BookingPatch {
    /// Whether this patch moves the booking's interval.
    pub fn changes_interval(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }
}

/// A booking with its client/service references resolved for display.
/// `None` means the reference could not be resolved; the UI shows a
/// placeholder instead of failing.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub client: Option<crate::directory::ClientRecord>,
    pub service: Option<crate::directory::ServiceRecord>,
}

/// A computed free interval of exactly the requested duration.
/// Produced fresh on every query and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilitySlot {
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T10:00:00Z"))]
    pub start_time: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T10:30:00Z"))]
    pub end_time: DateTime<Utc>,
}
