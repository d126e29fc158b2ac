//! Free time for a single calendar.
//!
//! Walks a date range day by day, applies the weekly window for each date, and
//! removes everything blocked by buffered busy events. Two views of the result are
//! offered: fixed-length candidate slots ([`list_available_slots`]) and maximal
//! free intervals ([`free_intervals`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::Availability;
use crate::conflict::{is_slot_available_with_buffer, overlaps, BusyEvent};
use crate::error::{Result, SlotError};
use crate::expander::{expand_windows, DateRange, DayWindow};
use crate::slot::CandidateSlot;

/// A maximal free interval inside one day's availability window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl FreeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

pub(crate) fn ensure_positive_duration(duration_minutes: u32) -> Result<()> {
    if duration_minutes == 0 {
        return Err(SlotError::InvalidDuration(duration_minutes));
    }
    Ok(())
}

pub(crate) fn validate_events(events: &[BusyEvent]) -> Result<()> {
    events.iter().try_for_each(BusyEvent::validate)
}

/// Events whose blocked span reaches into the window. Any event outside this set
/// cannot block a slot that lies inside the window.
fn events_near(events: &[BusyEvent], window: &DayWindow) -> Vec<BusyEvent> {
    events
        .iter()
        .filter(|e| {
            let (start, end) = e.blocked_span();
            overlaps(window.start, window.end, start, end)
        })
        .cloned()
        .collect()
}

/// Lazily yield open slots in chronological order.
fn open_slots<'a>(
    availability: &'a Availability,
    events: &'a [BusyEvent],
    range: &DateRange,
    duration_minutes: u32,
) -> impl Iterator<Item = CandidateSlot> + 'a {
    expand_windows(availability, range).flat_map(move |window| {
        let nearby = events_near(events, &window);
        window
            .grid(duration_minutes)
            .filter(move |candidate| is_slot_available_with_buffer(availability, &nearby, candidate))
    })
}

/// List every free fixed-length slot in the range.
///
/// For each UTC date from `range.start` to `range.end` inclusive that has a rule,
/// candidates are laid back to back from the window start; a candidate is kept iff
/// [`is_slot_available_with_buffer`] accepts it. Slots that would overrun the
/// window end are dropped rather than shortened.
///
/// # Errors
/// Returns `SlotError::InvalidDuration` for a zero duration and
/// `SlotError::InvalidEvent` if an event ends before it starts.
pub fn list_available_slots(
    availability: &Availability,
    events: &[BusyEvent],
    range: &DateRange,
    duration_minutes: u32,
) -> Result<Vec<CandidateSlot>> {
    ensure_positive_duration(duration_minutes)?;
    validate_events(events)?;

    let slots: Vec<CandidateSlot> =
        open_slots(availability, events, range, duration_minutes).collect();

    debug!(
        days = range.days().len(),
        events = events.len(),
        duration_minutes,
        slots = slots.len(),
        "listed available slots"
    );
    Ok(slots)
}

/// The earliest slot [`list_available_slots`] would return, without enumerating
/// the rest of the range.
pub fn first_available_slot(
    availability: &Availability,
    events: &[BusyEvent],
    range: &DateRange,
    duration_minutes: u32,
) -> Result<Option<CandidateSlot>> {
    ensure_positive_duration(duration_minutes)?;
    validate_events(events)?;

    Ok(open_slots(availability, events, range, duration_minutes).next())
}

/// Merge overlapping or adjacent blocked spans, clipped to the window.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals.
fn merge_blocked_spans(
    events: &[BusyEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut spans: Vec<(DateTime<Utc>, DateTime<Utc>)> = events
        .iter()
        .map(BusyEvent::blocked_span)
        .filter(|&(start, end)| overlaps(start, end, window_start, window_end))
        .map(|(start, end)| (start.max(window_start), end.min(window_end)))
        .collect();

    spans.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

fn window_gaps(events: &[BusyEvent], window: &DayWindow) -> Vec<FreeInterval> {
    let mut gaps = Vec::new();
    let mut cursor = window.start;

    for (busy_start, busy_end) in merge_blocked_spans(events, window.start, window.end) {
        if cursor < busy_start {
            gaps.push(FreeInterval::new(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window.end {
        gaps.push(FreeInterval::new(cursor, window.end));
    }
    gaps
}

/// Free intervals inside each day's window once buffered events are removed.
///
/// Overlapping or touching blocked spans are coalesced first, so the result is
/// sorted and no two intervals overlap.
///
/// # Errors
/// Returns `SlotError::InvalidEvent` if an event ends before it starts.
pub fn free_intervals(
    availability: &Availability,
    events: &[BusyEvent],
    range: &DateRange,
) -> Result<Vec<FreeInterval>> {
    validate_events(events)?;

    let intervals: Vec<FreeInterval> = expand_windows(availability, range)
        .flat_map(|window| window_gaps(events, &window))
        .collect();

    debug!(
        events = events.len(),
        intervals = intervals.len(),
        "computed free intervals"
    );
    Ok(intervals)
}
