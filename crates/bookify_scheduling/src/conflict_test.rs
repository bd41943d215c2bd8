#[cfg(test)]
mod tests {
    use crate::conflict::{check_interval, conflicting_bookings, intervals_overlap};
    use crate::error::SchedulingError;
    use crate::models::{Booking, BookingStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, hour, minute, 0).unwrap()
    }

    fn booking(id: &str, start: DateTime<Utc>, end: DateTime<Utc>, status: BookingStatus) -> Booking {
        Booking {
            id: id.to_string(),
            host_id: "host-1".to_string(),
            client_id: "client-1".to_string(),
            service_id: None,
            title: "Session".to_string(),
            description: None,
            location: None,
            meeting_url: None,
            notes: None,
            attendees: Vec::new(),
            start_time: start,
            end_time: end,
            duration_minutes: (end - start).num_minutes(),
            status,
            google_event_id: None,
            cancellation_reason: None,
            created_at: at(0, 0),
            created_by: None,
            updated_at: at(0, 0),
        }
    }

    #[test]
    fn half_open_intervals_do_not_conflict_back_to_back() {
        assert!(!intervals_overlap(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
        assert!(!intervals_overlap(at(10, 0), at(11, 0), at(9, 0), at(10, 0)));
        assert!(intervals_overlap(at(9, 0), at(10, 1), at(10, 0), at(11, 0)));
        assert!(intervals_overlap(at(9, 0), at(12, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn only_occupying_statuses_conflict() {
        let bookings = vec![
            booking("a", at(10, 0), at(11, 0), BookingStatus::Confirmed),
            booking("b", at(10, 0), at(11, 0), BookingStatus::Cancelled),
            booking("c", at(10, 0), at(11, 0), BookingStatus::Completed),
            booking("d", at(10, 0), at(11, 0), BookingStatus::NoShow),
        ];
        let conflicts = conflicting_bookings(&bookings, at(10, 30), at(11, 30), None);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, "a");
    }

    #[test]
    fn excluded_booking_is_ignored() {
        let bookings = vec![
            booking("a", at(10, 0), at(11, 0), BookingStatus::Confirmed),
            booking("b", at(11, 0), at(12, 0), BookingStatus::Pending),
        ];
        // Moving "a" inside its own old interval conflicts with nothing.
        assert!(check_interval(&bookings, at(10, 15), at(10, 45), Some("a")).is_ok());
        // But it still conflicts with "b".
        let err = check_interval(&bookings, at(10, 30), at(11, 30), Some("a")).unwrap_err();
        match err {
            SchedulingError::Conflict(conflicts) => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].id, "b");
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn conflicts_are_reported_ascending() {
        let bookings = vec![
            booking("late", at(14, 0), at(15, 0), BookingStatus::Pending),
            booking("early", at(9, 0), at(10, 0), BookingStatus::Confirmed),
            booking("mid", at(11, 0), at(12, 0), BookingStatus::Rescheduled),
        ];
        let conflicts = conflicting_bookings(&bookings, at(8, 0), at(18, 0), None);
        let ids: Vec<&str> = conflicts.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["early", "mid", "late"]);
    }
}
