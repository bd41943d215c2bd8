#[cfg(test)]
mod tests {
    use crate::error::SchedulingError;
    use crate::models::{DayOfWeek, WorkingHoursWindow};
    use crate::slots::{free_intervals, generate_slots, merge_busy_periods};
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use chrono_tz::Tz;

    fn monday() -> NaiveDate {
        // 2025-05-05 is a Monday
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    fn nine_to_five(day: DayOfWeek, is_active: bool) -> WorkingHoursWindow {
        WorkingHoursWindow::new(
            day,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            is_active,
        )
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, hour, minute, 0).unwrap()
    }

    #[test]
    fn empty_day_yields_the_full_grid() {
        let window = nine_to_five(DayOfWeek::Monday, true);
        let slots = generate_slots(
            &window,
            monday(),
            Duration::minutes(30),
            Duration::minutes(30),
            Tz::UTC,
            &[],
        )
        .unwrap();

        // 09:00-17:00 holds exactly 16 half-hour slots.
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].start_time, at(9, 0));
        assert_eq!(slots[0].end_time, at(9, 30));
        assert_eq!(slots[15].start_time, at(16, 30));
        assert_eq!(slots[15].end_time, at(17, 0));

        for pair in slots.windows(2) {
            assert!(pair[0].start_time < pair[1].start_time, "slots must ascend");
            assert!(
                pair[0].end_time <= pair[1].start_time,
                "slots must not overlap"
            );
        }
    }

    #[test]
    fn inactive_day_yields_no_slots() {
        let window = nine_to_five(DayOfWeek::Monday, false);
        for duration in [15, 30, 60, 240] {
            let slots = generate_slots(
                &window,
                monday(),
                Duration::minutes(duration),
                Duration::minutes(30),
                Tz::UTC,
                &[],
            )
            .unwrap();
            assert!(slots.is_empty());
        }
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        let window = nine_to_five(DayOfWeek::Monday, true);
        for duration in [0, -30] {
            let result = generate_slots(
                &window,
                monday(),
                Duration::minutes(duration),
                Duration::minutes(30),
                Tz::UTC,
                &[],
            );
            assert!(matches!(
                result,
                Err(SchedulingError::Validation { field: "duration", .. })
            ));
        }
    }

    #[test]
    fn slots_route_around_an_existing_booking() {
        let window = nine_to_five(DayOfWeek::Monday, true);
        let busy = vec![(at(10, 0), at(11, 0))];
        let slots = generate_slots(
            &window,
            monday(),
            Duration::minutes(60),
            Duration::minutes(30),
            Tz::UTC,
            &busy,
        )
        .unwrap();

        for slot in &slots {
            assert!(
                slot.end_time <= at(10, 0) || slot.start_time >= at(11, 0),
                "slot {:?} overlaps the booked hour",
                slot
            );
        }
        // 09:00-10:00 before, then 11:00 through 16:00 starts after.
        assert_eq!(slots.len(), 7);
        assert_eq!(slots[0].start_time, at(9, 0));
        assert_eq!(slots[1].start_time, at(11, 0));
        assert_eq!(slots.last().unwrap().end_time, at(17, 0));
    }

    #[test]
    fn fully_booked_day_yields_no_slots() {
        let window = nine_to_five(DayOfWeek::Monday, true);
        let busy = vec![(at(9, 0), at(17, 0))];
        let slots = generate_slots(
            &window,
            monday(),
            Duration::minutes(30),
            Duration::minutes(30),
            Tz::UTC,
            &busy,
        )
        .unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn grid_alignment_resumes_after_an_off_grid_booking() {
        let window = nine_to_five(DayOfWeek::Monday, true);
        // Booking ends at 09:45; the next slot snaps to the 10:00 grid line.
        let busy = vec![(at(9, 0), at(9, 45))];
        let slots = generate_slots(
            &window,
            monday(),
            Duration::minutes(30),
            Duration::minutes(30),
            Tz::UTC,
            &busy,
        )
        .unwrap();

        assert_eq!(slots[0].start_time, at(10, 0));
        assert_eq!(slots.len(), 14);
    }

    #[test]
    fn flush_start_is_used_when_the_grid_would_waste_an_opening() {
        let window = nine_to_five(DayOfWeek::Monday, true);
        // Free gap is exactly [09:10, 09:40): aligning to 09:30 leaves only
        // 10 minutes, but the gap itself fits a half-hour slot.
        let busy = vec![(at(9, 0), at(9, 10)), (at(9, 40), at(17, 0))];
        let slots = generate_slots(
            &window,
            monday(),
            Duration::minutes(30),
            Duration::minutes(30),
            Tz::UTC,
            &busy,
        )
        .unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_time, at(9, 10));
        assert_eq!(slots[0].end_time, at(9, 40));
    }

    #[test]
    fn bookings_straddling_the_window_edges_are_clipped() {
        let window = nine_to_five(DayOfWeek::Monday, true);
        let busy = vec![(at(8, 0), at(9, 30)), (at(16, 30), at(18, 0))];
        let slots = generate_slots(
            &window,
            monday(),
            Duration::minutes(30),
            Duration::minutes(30),
            Tz::UTC,
            &busy,
        )
        .unwrap();

        assert_eq!(slots[0].start_time, at(9, 30));
        assert_eq!(slots.last().unwrap().end_time, at(16, 30));
        assert_eq!(slots.len(), 14);
    }

    #[test]
    fn merge_busy_periods_merges_overlapping_and_touching() {
        let periods = vec![
            (at(13, 0), at(14, 0)),
            (at(9, 0), at(10, 0)),
            (at(9, 30), at(11, 0)),
            (at(11, 0), at(12, 0)),
        ];
        let merged = merge_busy_periods(&periods);
        assert_eq!(merged, vec![(at(9, 0), at(12, 0)), (at(13, 0), at(14, 0))]);
    }

    #[test]
    fn free_intervals_subtracts_in_order() {
        let merged = vec![(at(10, 0), at(11, 0)), (at(12, 0), at(13, 0))];
        let free = free_intervals(at(9, 0), at(17, 0), &merged);
        assert_eq!(
            free,
            vec![
                (at(9, 0), at(10, 0)),
                (at(11, 0), at(12, 0)),
                (at(13, 0), at(17, 0)),
            ]
        );
    }

    #[test]
    fn windows_resolve_in_the_configured_timezone() {
        let window = nine_to_five(DayOfWeek::Monday, true);
        let slots = generate_slots(
            &window,
            monday(),
            Duration::minutes(30),
            Duration::minutes(30),
            Tz::Europe__Zurich,
            &[],
        )
        .unwrap();

        // 09:00 Zurich in May is 07:00 UTC (CEST).
        assert_eq!(slots[0].start_time, at(7, 0));
        assert_eq!(slots.len(), 16);
    }
}
