#[cfg(test)]
mod tests {
    use crate::error::SchedulingError;
    use crate::models::{BookingDraft, BookingPatch, BookingStatus};
    use crate::repository::{BookingFilter, BookingRepository};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, hour, minute, 0).unwrap()
    }

    fn draft(host: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> BookingDraft {
        BookingDraft {
            host_id: host.to_string(),
            client_id: "client-1".to_string(),
            service_id: None,
            title: "Strategy session".to_string(),
            description: None,
            location: None,
            meeting_url: None,
            notes: None,
            attendees: Vec::new(),
            start_time: start,
            end_time: end,
            status: None,
            created_by: Some("tester".to_string()),
        }
    }

    #[test]
    fn create_defaults_to_pending_and_derives_duration() {
        let repo = BookingRepository::new();
        let booking = repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.duration_minutes, 60);
        assert_eq!(repo.get(&booking.id).unwrap().id, booking.id);
    }

    #[test]
    fn create_rejects_inverted_intervals_and_blank_fields() {
        let repo = BookingRepository::new();
        assert!(matches!(
            repo.create(draft("host-1", at(11, 0), at(10, 0))),
            Err(SchedulingError::Validation { field: "end_time", .. })
        ));
        let mut blank_title = draft("host-1", at(10, 0), at(11, 0));
        blank_title.title = "  ".to_string();
        assert!(matches!(
            repo.create(blank_title),
            Err(SchedulingError::Validation { field: "title", .. })
        ));
    }

    #[test]
    fn overlapping_create_is_rejected_with_the_conflicting_booking() {
        let repo = BookingRepository::new();
        let first = repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();

        let err = repo
            .create(draft("host-1", at(10, 30), at(11, 30)))
            .unwrap_err();
        match err {
            SchedulingError::Conflict(conflicts) => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].id, first.id);
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn back_to_back_bookings_coexist() {
        let repo = BookingRepository::new();
        repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();
        repo.create(draft("host-1", at(11, 0), at(12, 0))).unwrap();
        repo.create(draft("host-1", at(9, 0), at(10, 0))).unwrap();
    }

    #[test]
    fn different_hosts_do_not_conflict() {
        let repo = BookingRepository::new();
        repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();
        repo.create(draft("host-2", at(10, 0), at(11, 0))).unwrap();
    }

    #[test]
    fn cancelled_bookings_release_their_interval() {
        let repo = BookingRepository::new();
        let booking = repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();
        repo.cancel(&booking.id, Some("client asked".to_string()))
            .unwrap();

        let replacement = repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();
        assert_eq!(replacement.status, BookingStatus::Pending);

        let cancelled = repo.get(&booking.id).unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("client asked"));
    }

    #[test]
    fn cancelling_a_terminal_booking_fails_and_changes_nothing() {
        let repo = BookingRepository::new();
        let booking = repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();
        repo.cancel(&booking.id, None).unwrap();

        let err = repo.cancel(&booking.id, Some("again".to_string())).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidTransition { .. }));

        let stored = repo.get(&booking.id).unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        assert_eq!(stored.cancellation_reason, None);
    }

    #[test]
    fn reschedule_moves_the_booking_and_marks_it_rescheduled() {
        let repo = BookingRepository::new();
        let booking = repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();

        let patch = BookingPatch {
            start_time: Some(at(14, 0)),
            end_time: Some(at(15, 30)),
            ..Default::default()
        };
        let updated = repo.update(&booking.id, patch).unwrap();

        assert_eq!(updated.status, BookingStatus::Rescheduled);
        assert_eq!(updated.start_time, at(14, 0));
        assert_eq!(updated.duration_minutes, 90);

        // The old interval is free again.
        repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();
    }

    #[test]
    fn reschedule_into_a_conflict_fails_and_keeps_the_old_interval() {
        let repo = BookingRepository::new();
        let blocker = repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();
        let movable = repo.create(draft("host-1", at(14, 0), at(15, 0))).unwrap();

        let patch = BookingPatch {
            start_time: Some(at(10, 30)),
            end_time: Some(at(11, 30)),
            ..Default::default()
        };
        let err = repo.update(&movable.id, patch).unwrap_err();
        match err {
            SchedulingError::Conflict(conflicts) => assert_eq!(conflicts[0].id, blocker.id),
            other => panic!("expected Conflict, got {:?}", other),
        }

        let stored = repo.get(&movable.id).unwrap();
        assert_eq!(stored.start_time, at(14, 0));
        assert_eq!(stored.end_time, at(15, 0));
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[test]
    fn reschedule_within_own_interval_is_allowed() {
        let repo = BookingRepository::new();
        let booking = repo.create(draft("host-1", at(10, 0), at(12, 0))).unwrap();

        let patch = BookingPatch {
            start_time: Some(at(10, 30)),
            end_time: Some(at(11, 30)),
            ..Default::default()
        };
        let updated = repo.update(&booking.id, patch).unwrap();
        assert_eq!(updated.status, BookingStatus::Rescheduled);
    }

    #[test]
    fn status_patch_runs_the_state_machine() {
        let repo = BookingRepository::new();
        let booking = repo.create(draft("host-1", at(10, 0), at(11, 0))).unwrap();

        let confirmed = repo
            .update(
                &booking.id,
                BookingPatch {
                    status: Some(BookingStatus::Confirmed),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        // Completing a future booking is rejected, state untouched.
        let err = repo
            .update(
                &booking.id,
                BookingPatch {
                    status: Some(BookingStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidState(_)));
        assert_eq!(
            repo.get(&booking.id).unwrap().status,
            BookingStatus::Confirmed
        );
    }

    #[test]
    fn completing_a_past_booking_succeeds() {
        let repo = BookingRepository::new();
        let end = Utc::now() - Duration::hours(1);
        let start = end - Duration::hours(1);
        let booking = repo.create(draft("host-1", start, end)).unwrap();
        repo.update(
            &booking.id,
            BookingPatch {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            },
        )
        .unwrap();

        let completed = repo
            .update(
                &booking.id,
                BookingPatch {
                    status: Some(BookingStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);
    }

    #[test]
    fn unknown_booking_ids_yield_not_found() {
        let repo = BookingRepository::new();
        assert!(matches!(
            repo.get("missing"),
            Err(SchedulingError::NotFound(_))
        ));
        assert!(matches!(
            repo.update("missing", BookingPatch::default()),
            Err(SchedulingError::NotFound(_))
        ));
        assert!(matches!(
            repo.cancel("missing", None),
            Err(SchedulingError::NotFound(_))
        ));
    }

    #[test]
    fn list_filters_by_status_client_and_range() {
        let repo = BookingRepository::new();
        let first = repo.create(draft("host-1", at(9, 0), at(10, 0))).unwrap();
        let mut other_client = draft("host-1", at(11, 0), at(12, 0));
        other_client.client_id = "client-2".to_string();
        let second = repo.create(other_client).unwrap();
        repo.cancel(&first.id, None).unwrap();

        let cancelled = repo.list(&BookingFilter {
            status: Some(BookingStatus::Cancelled),
            ..Default::default()
        });
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, first.id);

        let by_client = repo.list(&BookingFilter {
            client_id: Some("client-2".to_string()),
            ..Default::default()
        });
        assert_eq!(by_client.len(), 1);
        assert_eq!(by_client[0].id, second.id);

        let in_morning = repo.list(&BookingFilter {
            host_id: Some("host-1".to_string()),
            range: Some((at(8, 0), at(10, 30))),
            ..Default::default()
        });
        assert_eq!(in_morning.len(), 1);
        assert_eq!(in_morning[0].id, first.id);
    }

    #[test]
    fn listing_is_ordered_by_start_time() {
        let repo = BookingRepository::new();
        repo.create(draft("host-1", at(15, 0), at(16, 0))).unwrap();
        repo.create(draft("host-1", at(9, 0), at(10, 0))).unwrap();
        repo.create(draft("host-1", at(12, 0), at(13, 0))).unwrap();

        let listed = repo.list_by_host_and_range("host-1", at(0, 0), at(23, 59));
        let starts: Vec<_> = listed.iter().map(|b| b.start_time).collect();
        assert_eq!(starts, vec![at(9, 0), at(12, 0), at(15, 0)]);
    }

    // Two concurrent creates for the same overlapping interval: exactly one
    // may win. The host mutex serializes check-then-insert.
    #[test]
    fn concurrent_overlapping_creates_admit_exactly_one() {
        let repo = Arc::new(BookingRepository::new());

        for round in 0..20 {
            let hour = 8 + (round % 8);
            let start = at(hour, 0);
            let end = at(hour, 45);

            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let repo = repo.clone();
                    let host = format!("race-host-{}", round);
                    std::thread::spawn(move || repo.create(draft(&host, start, end)))
                })
                .collect();

            let successes = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|r| r.is_ok())
                .count();
            assert_eq!(successes, 1, "round {}", round);
        }
    }

    // The double-booking invariant holds after an arbitrary mixed workload.
    #[test]
    fn occupying_bookings_never_overlap_after_a_mixed_workload() {
        let repo = Arc::new(BookingRepository::new());
        let host = "workload-host";

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let repo = repo.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let offset = ((worker * 25 + i) * 7) % 540;
                        let start = at(8, 0) + Duration::minutes(offset as i64);
                        let end = start + Duration::minutes(30);
                        if let Ok(booking) = repo.create(draft(host, start, end)) {
                            if i % 3 == 0 {
                                let _ = repo.cancel(&booking.id, None);
                            } else if i % 3 == 1 {
                                let _ = repo.update(
                                    &booking.id,
                                    BookingPatch {
                                        start_time: Some(start + Duration::minutes(5)),
                                        end_time: Some(end + Duration::minutes(5)),
                                        ..Default::default()
                                    },
                                );
                            }
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let occupying: Vec<_> = repo
            .list_by_host_and_range(host, at(0, 0), at(23, 59))
            .into_iter()
            .filter(|b| b.occupies())
            .collect();
        for (i, a) in occupying.iter().enumerate() {
            for b in &occupying[i + 1..] {
                assert!(
                    a.end_time <= b.start_time || b.end_time <= a.start_time,
                    "bookings {} and {} overlap",
                    a.id,
                    b.id
                );
            }
        }
    }
}
