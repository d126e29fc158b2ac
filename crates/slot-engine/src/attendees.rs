//! Availability shared by several attendees.
//!
//! Each attendee carries an independent weekly availability and busy-event list.
//! Candidates come from every attendee's grid, so windows that open off each
//! other's grid still contribute slots; a candidate is offered only when it passes
//! every attendee's buffered check.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::availability::Availability;
use crate::conflict::{is_slot_available_with_buffer, BusyEvent};
use crate::error::Result;
use crate::expander::DateRange;
use crate::freebusy::{ensure_positive_duration, free_intervals, validate_events, FreeInterval};
use crate::slot::CandidateSlot;

/// One participant in a multi-person query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub availability: Availability,
    #[serde(default)]
    pub events: Vec<BusyEvent>,
}

impl Attendee {
    pub fn new(availability: Availability, events: Vec<BusyEvent>) -> Self {
        Self {
            availability,
            events,
        }
    }

    /// Whether this attendee can take the slot: inside their window and clear of
    /// their buffered events.
    pub fn is_free(&self, slot: &CandidateSlot) -> bool {
        is_slot_available_with_buffer(&self.availability, &self.events, slot)
    }
}

/// List every fixed-length slot that is free for all attendees.
///
/// For each date, the candidates are the union of every attendee's grid for that
/// date (laid from their own window start), ordered by start with duplicates
/// removed. A candidate is kept iff [`Attendee::is_free`] holds for every attendee.
/// A day on which any attendee has no rule yields nothing. A single attendee gets
/// the same answer as [`list_available_slots`](crate::freebusy::list_available_slots);
/// no attendees get an empty list.
///
/// # Errors
/// Returns `SlotError::InvalidDuration` for a zero duration and
/// `SlotError::InvalidEvent` if any attendee has an event that ends before it starts.
pub fn list_available_slots_for_attendees(
    attendees: &[Attendee],
    range: &DateRange,
    duration_minutes: u32,
) -> Result<Vec<CandidateSlot>> {
    ensure_positive_duration(duration_minutes)?;
    for attendee in attendees {
        validate_events(&attendee.events)?;
    }

    let mut slots = Vec::new();
    for date in range.days() {
        let Some(windows) = attendees
            .iter()
            .map(|a| a.availability.window_on(date))
            .collect::<Option<Vec<_>>>()
        else {
            trace!(%date, "an attendee has no availability rule, skipping day");
            continue;
        };

        let candidates: BTreeSet<CandidateSlot> = windows
            .iter()
            .flat_map(|window| window.grid(duration_minutes))
            .collect();
        slots.extend(
            candidates
                .into_iter()
                .filter(|candidate| attendees.iter().all(|a| a.is_free(candidate))),
        );
    }

    debug!(
        attendees = attendees.len(),
        days = range.days().len(),
        duration_minutes,
        slots = slots.len(),
        "listed slots shared by all attendees"
    );
    Ok(slots)
}

/// Intersect two sorted, non-overlapping interval lists.
fn intersect(a: &[FreeInterval], b: &[FreeInterval]) -> Vec<FreeInterval> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let start = a[i].start.max(b[j].start);
        let end = a[i].end.min(b[j].end);
        if start < end {
            out.push(FreeInterval::new(start, end));
        }
        // Advance whichever interval finishes first; the other may still overlap
        // the next one.
        if a[i].end < b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Free intervals common to every attendee.
///
/// Each attendee's [`free_intervals`] are computed independently and intersected.
/// No attendees yield an empty list.
///
/// # Errors
/// Returns `SlotError::InvalidEvent` if any attendee has an event that ends before
/// it starts.
pub fn common_free_intervals(
    attendees: &[Attendee],
    range: &DateRange,
) -> Result<Vec<FreeInterval>> {
    for attendee in attendees {
        validate_events(&attendee.events)?;
    }
    let Some((first, rest)) = attendees.split_first() else {
        return Ok(Vec::new());
    };

    let mut common = free_intervals(&first.availability, &first.events, range)?;
    for attendee in rest {
        if common.is_empty() {
            break;
        }
        let theirs = free_intervals(&attendee.availability, &attendee.events, range)?;
        common = intersect(&common, &theirs);
    }
    Ok(common)
}
