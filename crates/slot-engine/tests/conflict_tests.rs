//! Tests for slot-vs-event blocking, with and without buffers.

use chrono::{TimeZone, Utc, Weekday};
use slot_engine::{
    find_conflicts, is_slot_available, is_slot_available_with_buffer,
    is_slot_available_with_events, overlaps, Availability, BusyEvent, CandidateSlot, SlotError,
    TimeOfDay, WeeklyAvailabilityRule,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn rule(weekday: Weekday, start_hour: u32, end_hour: u32) -> WeeklyAvailabilityRule {
    WeeklyAvailabilityRule::new(
        weekday,
        TimeOfDay::new(start_hour, 0).unwrap(),
        TimeOfDay::new(end_hour, 0).unwrap(),
    )
}

/// Helper to create a BusyEvent from hour ranges on a day in January 2024.
fn event(day: u32, start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> BusyEvent {
    BusyEvent::new(
        Utc.with_ymd_and_hms(2024, 1, day, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2024, 1, day, end_hour, end_min, 0)
            .unwrap(),
    )
}

fn slot(day: u32, hour: u32, minute: u32, duration_minutes: u32) -> CandidateSlot {
    CandidateSlot::new(
        Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap(),
        duration_minutes,
    )
}

fn office_hours() -> Availability {
    Availability::new([
        rule(Weekday::Mon, 8, 18),
        rule(Weekday::Tue, 8, 18),
        rule(Weekday::Wed, 8, 18),
        rule(Weekday::Thu, 8, 18),
        rule(Weekday::Fri, 12, 20),
    ])
    .unwrap()
}

fn every_day(start_hour: u32, end_hour: u32) -> Availability {
    Availability::new(
        [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ]
        .map(|d| rule(d, start_hour, end_hour)),
    )
    .unwrap()
}

fn unbuffered_week() -> Vec<BusyEvent> {
    vec![
        event(15, 11, 0, 12, 0),   // Monday
        event(16, 10, 30, 11, 30), // Tuesday
        event(17, 13, 0, 14, 0),   // Wednesday
        event(18, 15, 30, 16, 50), // Thursday
        event(19, 18, 0, 19, 55),  // Friday
    ]
}

fn buffered_week() -> Vec<BusyEvent> {
    vec![
        event(15, 8, 30, 9, 30).with_buffer(15, 15),
        event(16, 10, 30, 11, 30).with_buffer(35, 25),
        event(17, 17, 0, 17, 30).with_buffer(0, 0),
        event(18, 15, 0, 16, 0).with_buffer(10, 10),
        event(19, 9, 45, 10, 15).with_buffer(5, 5),
    ]
}

// ── Overlap primitive ───────────────────────────────────────────────────────

#[test]
fn overlap_is_half_open_and_symmetric() {
    let t = |h: u32, m: u32| Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap();

    assert!(overlaps(t(9, 0), t(10, 0), t(9, 30), t(10, 30)));
    assert!(overlaps(t(9, 30), t(10, 30), t(9, 0), t(10, 0)));
    // Containment either way.
    assert!(overlaps(t(9, 0), t(12, 0), t(10, 0), t(11, 0)));
    assert!(overlaps(t(10, 0), t(11, 0), t(9, 0), t(12, 0)));
    // Touching ends do not overlap.
    assert!(!overlaps(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
    assert!(!overlaps(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
}

// ── Slot vs events ──────────────────────────────────────────────────────────

#[test]
fn slots_clear_of_events_are_available() {
    let availability = office_hours();
    let events = unbuffered_week();
    let available = [
        slot(15, 17, 15, 45),
        slot(16, 13, 45, 45),
        slot(17, 15, 0, 60),
        slot(18, 15, 0, 20),
        slot(19, 16, 30, 60),
    ];

    for s in &available {
        assert!(
            is_slot_available_with_events(&availability, &events, s),
            "slot at {} for {} minutes should be available",
            s.start,
            s.duration_minutes
        );
    }
}

#[test]
fn slots_overlapping_events_are_unavailable() {
    let availability = office_hours();
    let events = unbuffered_week();
    let unavailable = [
        slot(15, 11, 15, 45),
        slot(16, 10, 45, 45),
        slot(17, 13, 0, 60),
        slot(18, 15, 30, 20),
        slot(19, 18, 30, 60),
    ];

    for s in &unavailable {
        assert!(
            !is_slot_available_with_events(&availability, &events, s),
            "slot at {} for {} minutes should be unavailable",
            s.start,
            s.duration_minutes
        );
    }
}

#[test]
fn every_overlap_shape_blocks_the_slot() {
    let availability = office_hours();
    let events = vec![event(15, 11, 0, 12, 0)];

    // Starts inside the event.
    assert!(!is_slot_available_with_events(&availability, &events, &slot(15, 11, 15, 15)));
    // Ends inside the event.
    assert!(!is_slot_available_with_events(&availability, &events, &slot(15, 10, 45, 60)));
    // Spans the whole event.
    assert!(!is_slot_available_with_events(&availability, &events, &slot(15, 10, 30, 120)));
    // Exactly the event.
    assert!(!is_slot_available_with_events(&availability, &events, &slot(15, 11, 0, 60)));
}

#[test]
fn slots_touching_an_event_are_available() {
    let availability = office_hours();
    let events = vec![event(15, 11, 0, 12, 0)];

    // Ends exactly when the event starts.
    assert!(is_slot_available_with_events(&availability, &events, &slot(15, 10, 30, 30)));
    // Starts exactly when the event ends.
    assert!(is_slot_available_with_events(&availability, &events, &slot(15, 12, 0, 30)));
}

#[test]
fn event_check_still_applies_the_window() {
    let availability = office_hours();

    // No events at all, but Saturday has no rule and Friday opens at noon.
    assert!(!is_slot_available_with_events(&availability, &[], &slot(20, 10, 0, 30)));
    assert!(!is_slot_available_with_events(&availability, &[], &slot(19, 11, 30, 60)));
    assert!(is_slot_available_with_events(&availability, &[], &slot(19, 12, 0, 60)));
}

#[test]
fn event_check_ignores_buffers() {
    let availability = office_hours();
    let events = vec![event(16, 10, 30, 11, 30).with_buffer(35, 25)];

    assert!(is_slot_available_with_events(&availability, &events, &slot(16, 11, 30, 15)));
    assert!(!is_slot_available_with_buffer(&availability, &events, &slot(16, 11, 30, 15)));
}

// ── Slot vs buffered events ─────────────────────────────────────────────────

#[test]
fn slots_clear_of_buffers_are_available() {
    let availability = every_day(8, 18);
    let events = buffered_week();
    let available = [
        slot(15, 12, 50, 45),
        slot(16, 13, 45, 45),
        slot(17, 15, 0, 60),
        slot(18, 16, 20, 20),
        slot(19, 16, 30, 60),
    ];

    for s in &available {
        assert!(
            is_slot_available_with_buffer(&availability, &events, s),
            "slot at {} for {} minutes should be available",
            s.start,
            s.duration_minutes
        );
    }
}

#[test]
fn slots_inside_buffers_are_unavailable() {
    let availability = every_day(8, 18);
    let events = buffered_week();
    let unavailable = [
        slot(15, 9, 40, 45),
        slot(16, 11, 50, 45),
        slot(17, 17, 10, 60),
        slot(18, 14, 55, 20),
        slot(19, 9, 43, 60),
    ];

    for s in &unavailable {
        assert!(
            !is_slot_available_with_buffer(&availability, &events, s),
            "slot at {} for {} minutes should be unavailable",
            s.start,
            s.duration_minutes
        );
    }
}

#[test]
fn buffer_extends_the_blocked_span_on_both_sides() {
    let availability = every_day(8, 18);
    let events = vec![event(16, 10, 30, 11, 30).with_buffer(35, 25)];

    // Blocked span is [09:55, 11:55).
    assert!(!is_slot_available_with_buffer(&availability, &events, &slot(16, 11, 50, 45)));
    assert!(is_slot_available_with_buffer(&availability, &events, &slot(16, 11, 56, 45)));
    assert!(is_slot_available_with_buffer(&availability, &events, &slot(16, 11, 55, 45)));
    assert!(is_slot_available_with_buffer(&availability, &events, &slot(16, 9, 10, 45)));
    assert!(!is_slot_available_with_buffer(&availability, &events, &slot(16, 9, 11, 45)));
}

#[test]
fn slot_spanning_a_buffered_event_is_unavailable() {
    let availability = every_day(8, 18);
    let events = vec![event(17, 17, 0, 17, 30).with_buffer(5, 5)];

    // 16:30-18:00 swallows the whole blocked span [16:55, 17:35).
    assert!(!is_slot_available_with_buffer(&availability, &events, &slot(17, 16, 30, 90)));
}

#[test]
fn buffers_do_not_move_the_window_boundary() {
    let availability = every_day(8, 18);
    // Buffer reaches back before the window opens.
    let events = vec![event(15, 8, 30, 9, 0).with_buffer(60, 0)];

    assert!(!is_slot_available_with_buffer(&availability, &events, &slot(15, 8, 0, 15)));
    assert!(is_slot_available_with_buffer(&availability, &events, &slot(15, 9, 0, 15)));
    assert!(!is_slot_available_with_buffer(&availability, &events, &slot(15, 7, 0, 15)));
}

#[test]
fn buffered_event_on_another_day_blocks_across_midnight() {
    let availability = every_day(0, 24);
    // Late-night event whose after-buffer spills into the next day.
    let events = vec![event(15, 23, 0, 23, 45).with_buffer(0, 30)];

    assert!(!is_slot_available_with_buffer(&availability, &events, &slot(16, 0, 0, 15)));
    assert!(is_slot_available_with_buffer(&availability, &events, &slot(16, 0, 15, 15)));
}

#[test]
fn buffered_check_gates_on_weekday() {
    let availability = office_hours();
    let saturday = slot(20, 10, 0, 30);
    let far_event = vec![event(15, 10, 0, 11, 0).with_buffer(15, 15)];

    // Saturday has no rule: unavailable with or without events.
    assert!(!is_slot_available_with_buffer(&availability, &[], &saturday));
    assert!(!is_slot_available_with_buffer(&availability, &far_event, &saturday));

    // The same wall-clock slot on a ruled weekday passes.
    assert!(is_slot_available_with_buffer(&availability, &far_event, &slot(16, 10, 0, 30)));
}

#[test]
fn checks_form_a_strict_hierarchy() {
    let availability = every_day(8, 18);
    let events = buffered_week();

    for day in 15..=21 {
        for hour in 6..20 {
            for minute in [0, 20, 40] {
                let s = slot(day, hour, minute, 40);
                let buffered = is_slot_available_with_buffer(&availability, &events, &s);
                let plain = is_slot_available_with_events(&availability, &events, &s);
                let window = is_slot_available(&availability, &s);
                assert!(!buffered || plain, "buffered implies unbuffered at {}", s.start);
                assert!(!plain || window, "event check implies window check at {}", s.start);
            }
        }
    }
}

// ── Conflict explanation ────────────────────────────────────────────────────

#[test]
fn find_conflicts_reports_blocking_events_with_overlap() {
    let events = vec![
        event(16, 9, 0, 10, 0),
        event(16, 10, 30, 11, 30).with_buffer(35, 25),
        event(16, 14, 0, 15, 0),
    ];

    // 09:30-10:30 overlaps the first event by 30 minutes and the second event's
    // blocked span [09:55, 11:55) by 35 minutes.
    let conflicts = find_conflicts(&events, &slot(16, 9, 30, 60));

    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0].event, events[0]);
    assert_eq!(conflicts[0].overlap_minutes, 30);
    assert_eq!(conflicts[1].event, events[1]);
    assert_eq!(conflicts[1].overlap_minutes, 35);
}

#[test]
fn find_conflicts_ignores_adjacent_events() {
    let events = vec![event(16, 9, 0, 10, 0).with_buffer(0, 15)];
    assert!(find_conflicts(&events, &slot(16, 10, 15, 30)).is_empty());
}

// ── Event validation ────────────────────────────────────────────────────────

#[test]
fn inverted_event_fails_validation() {
    let e = event(16, 11, 0, 10, 0);
    assert!(matches!(e.validate(), Err(SlotError::InvalidEvent(_))));
    assert!(event(16, 10, 0, 10, 0).validate().is_ok());
}

#[test]
fn missing_buffer_deserializes_as_zero() {
    let json = r#"{"start": "2024-01-16T10:30:00Z", "end": "2024-01-16T11:30:00Z"}"#;
    let e: BusyEvent = serde_json::from_str(json).unwrap();
    assert_eq!(e.buffer.before, 0);
    assert_eq!(e.buffer.after, 0);
    assert_eq!(e.blocked_span(), (e.start, e.end));

    let partial = r#"{"start": "2024-01-16T10:30:00Z", "end": "2024-01-16T11:30:00Z",
                      "buffer": {"after": 10}}"#;
    let e: BusyEvent = serde_json::from_str(partial).unwrap();
    assert_eq!(e.buffer.before, 0);
    assert_eq!(e.buffer.after, 10);
}
