//! Busy events and slot-vs-event blocking.
//!
//! Every comparison between a slot and an event goes through [`overlaps`], the
//! half-open interval test. Adjacent intervals (one ends exactly when the other
//! starts) do NOT overlap, with or without buffers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::Availability;
use crate::error::{Result, SlotError};
use crate::slot::CandidateSlot;

/// Padding around a busy event, in minutes, during which no slot may be placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Buffer {
    #[serde(default)]
    pub before: u32,
    #[serde(default)]
    pub after: u32,
}

impl Buffer {
    pub fn new(before: u32, after: u32) -> Self {
        Self { before, after }
    }
}

/// A scheduled event occupying `[start, end)`, optionally padded by a [`Buffer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusyEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub buffer: Buffer,
}

impl BusyEvent {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            buffer: Buffer::default(),
        }
    }

    pub fn with_buffer(mut self, before: u32, after: u32) -> Self {
        self.buffer = Buffer::new(before, after);
        self
    }

    /// The span this event blocks once its buffer is applied:
    /// `[start - before, end + after)`.
    pub fn blocked_span(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.start - Duration::minutes(i64::from(self.buffer.before)),
            self.end + Duration::minutes(i64::from(self.buffer.after)),
        )
    }

    /// Reject events that end before they start.
    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(SlotError::InvalidEvent(format!(
                "event ends at {} before it starts at {}",
                self.end.to_rfc3339(),
                self.start.to_rfc3339()
            )));
        }
        Ok(())
    }
}

/// A busy event that blocks a slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub event: BusyEvent,
    /// Minutes shared between the slot and the event's blocked span.
    pub overlap_minutes: i64,
}

/// Half-open interval intersection: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && a_end > b_start`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

fn blocks_unbuffered(event: &BusyEvent, slot: &CandidateSlot) -> bool {
    overlaps(slot.start, slot.end(), event.start, event.end)
}

fn blocks_buffered(event: &BusyEvent, slot: &CandidateSlot) -> bool {
    let (start, end) = event.blocked_span();
    overlaps(slot.start, slot.end(), start, end)
}

/// Check a slot against the weekly window and a list of events, ignoring buffers.
pub fn is_slot_available_with_events(
    availability: &Availability,
    events: &[BusyEvent],
    slot: &CandidateSlot,
) -> bool {
    availability.contains(slot) && !events.iter().any(|e| blocks_unbuffered(e, slot))
}

/// Check a slot against the weekly window and a list of buffered events.
///
/// The window test applies to the slot itself; buffers only widen the span each
/// event blocks.
pub fn is_slot_available_with_buffer(
    availability: &Availability,
    events: &[BusyEvent],
    slot: &CandidateSlot,
) -> bool {
    availability.contains(slot) && !events.iter().any(|e| blocks_buffered(e, slot))
}

/// Find every event whose blocked span overlaps the slot, in input order.
///
/// The overlap duration is `min(slot.end, blocked_end) - max(slot.start, blocked_start)`.
pub fn find_conflicts(events: &[BusyEvent], slot: &CandidateSlot) -> Vec<Conflict> {
    let slot_end = slot.end();

    events
        .iter()
        .filter_map(|event| {
            let (blocked_start, blocked_end) = event.blocked_span();
            if !overlaps(slot.start, slot_end, blocked_start, blocked_end) {
                return None;
            }
            let overlap = slot_end.min(blocked_end) - slot.start.max(blocked_start);
            Some(Conflict {
                event: event.clone(),
                overlap_minutes: overlap.num_minutes(),
            })
        })
        .collect()
}
