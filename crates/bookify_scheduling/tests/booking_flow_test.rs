//! End-to-end booking flow against the engine's public surface:
//! configure a week, query slots, book one, watch the slot list shrink,
//! reschedule, cancel, and see the interval open up again.

use bookify_scheduling::engine::{SchedulingEngine, SlotSettings};
use bookify_scheduling::error::SchedulingError;
use bookify_scheduling::models::{BookingDraft, BookingPatch, BookingStatus, DayOfWeek, WorkingHoursWindow};
use bookify_scheduling::repository::BookingFilter;
use chrono::{Duration, NaiveDate, NaiveTime};

fn engine() -> SchedulingEngine {
    SchedulingEngine::new(SlotSettings::default())
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
}

fn draft_for(start: chrono::DateTime<chrono::Utc>, minutes: i64) -> BookingDraft {
    BookingDraft {
        host_id: "host-1".to_string(),
        client_id: "client-1".to_string(),
        service_id: Some("service-initial-call".to_string()),
        title: "Initial call".to_string(),
        description: None,
        location: Some("Video".to_string()),
        meeting_url: None,
        notes: Some("prefers mornings".to_string()),
        attendees: Vec::new(),
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        status: Some(BookingStatus::Confirmed),
        created_by: Some("dashboard".to_string()),
    }
}

#[test]
fn full_booking_flow() {
    let engine = engine();

    // The host narrows Monday to 09:00-13:00.
    let mut week: Vec<WorkingHoursWindow> =
        bookify_scheduling::models::WeekSchedule::default_week()
            .windows()
            .to_vec();
    week[DayOfWeek::Monday.index()] = WorkingHoursWindow::new(
        DayOfWeek::Monday,
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        true,
    );
    engine.replace_week("host-1", week).unwrap();

    // Four 60-minute slots to start with.
    let slots = engine.available_slots("host-1", monday(), 60).unwrap();
    assert_eq!(slots.len(), 4);

    // Book the first slot.
    let first = slots[0];
    let booking = engine
        .create_booking(draft_for(first.start_time, 60))
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);

    // The slot list shrinks and no remaining slot touches the booking.
    let slots = engine.available_slots("host-1", monday(), 60).unwrap();
    assert_eq!(slots.len(), 3);
    for slot in &slots {
        assert!(slot.start_time >= booking.end_time || slot.end_time <= booking.start_time);
    }

    // Double-booking the same interval fails with the conflict attached.
    let err = engine
        .create_booking(draft_for(first.start_time, 60))
        .unwrap_err();
    match err {
        SchedulingError::Conflict(conflicts) => assert_eq!(conflicts[0].id, booking.id),
        other => panic!("expected Conflict, got {:?}", other),
    }

    // Reschedule into the last free hour.
    let target = slots.last().copied().unwrap();
    let moved = engine
        .update_booking(
            &booking.id,
            BookingPatch {
                start_time: Some(target.start_time),
                end_time: Some(target.end_time),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(moved.status, BookingStatus::Rescheduled);

    // The original hour is bookable again.
    let slots = engine.available_slots("host-1", monday(), 60).unwrap();
    assert!(slots.iter().any(|s| s.start_time == first.start_time));

    // Cancel and verify the whole morning opens back up.
    let cancelled = engine
        .cancel_booking(&moved.id, Some("client moved abroad".to_string()))
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let slots = engine.available_slots("host-1", monday(), 60).unwrap();
    assert_eq!(slots.len(), 4);

    // History survives: the cancelled booking is still listed.
    let all = engine.bookings(&BookingFilter {
        host_id: Some("host-1".to_string()),
        ..Default::default()
    });
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, BookingStatus::Cancelled);
    assert_eq!(all[0].cancellation_reason.as_deref(), Some("client moved abroad"));
}

#[test]
fn stale_slot_is_revalidated_at_write_time() {
    let engine = engine();

    // Client A fetches slots.
    let slots = engine.available_slots("host-1", monday(), 30).unwrap();
    let chosen = slots[0];

    // Client B books the same slot first.
    engine.create_booking(draft_for(chosen.start_time, 30)).unwrap();

    // Client A's stale slot is rejected at write time.
    let err = engine
        .create_booking(draft_for(chosen.start_time, 30))
        .unwrap_err();
    assert!(matches!(err, SchedulingError::Conflict(_)));
}

#[test]
fn terminal_bookings_reject_every_followup() {
    let engine = engine();
    let slots = engine.available_slots("host-1", monday(), 30).unwrap();
    let booking = engine
        .create_booking(draft_for(slots[0].start_time, 30))
        .unwrap();
    engine.cancel_booking(&booking.id, None).unwrap();

    // Reschedule, confirm and re-cancel all fail and change nothing.
    assert!(engine
        .update_booking(
            &booking.id,
            BookingPatch {
                start_time: Some(slots[1].start_time),
                end_time: Some(slots[1].end_time),
                ..Default::default()
            },
        )
        .is_err());
    assert!(engine
        .update_booking(
            &booking.id,
            BookingPatch {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            },
        )
        .is_err());
    assert!(engine.cancel_booking(&booking.id, None).is_err());

    let stored = engine.booking(&booking.id).unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);
    assert_eq!(stored.start_time, slots[0].start_time);
}
