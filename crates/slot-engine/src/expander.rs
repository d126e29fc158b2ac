//! Expansion of weekly availability into concrete days, windows and candidate slots.
//!
//! A [`DateRange`] is walked one UTC calendar date at a time by [`DayRange`], a
//! lazy, finite iterator that can be cloned to restart from any position. Each date
//! with a rule becomes a [`DayWindow`], which [`SlotGrid`] cuts into back-to-back
//! fixed-length [`CandidateSlot`]s.

use std::iter::FusedIterator;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::availability::Availability;
use crate::error::{Result, SlotError};
use crate::slot::CandidateSlot;

/// A closed range of instants, `[start, end]`.
///
/// Days are selected by UTC calendar date, not by stepping from `start` in whole
/// days: Mon 12:00 to Tue 11:00 visits both Monday and Tuesday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = SlotError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// # Errors
    /// Returns `SlotError::InvalidRange` if `end` is before `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(SlotError::InvalidRange(format!(
                "range ends at {} before it starts at {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Every UTC calendar date touched by the range, inclusive of both ends.
    pub fn days(&self) -> DayRange {
        DayRange::new(self.start.date_naive(), self.end.date_naive())
    }
}

/// Lazy sequence of consecutive calendar dates, `first..=last`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRange {
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl DayRange {
    /// An empty sequence results when `last` is before `first`.
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            next: (first <= last).then_some(first),
            last,
        }
    }
}

impl Iterator for DayRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|d| *d <= self.last);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|d| (self.last - d).num_days() as usize + 1)
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DayRange {}

impl FusedIterator for DayRange {}

/// One weekday rule applied to a concrete calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Back-to-back candidates of `duration_minutes` starting at the window start.
    pub fn grid(&self, duration_minutes: u32) -> SlotGrid {
        SlotGrid::new(self.start, self.end, duration_minutes)
    }
}

/// Consecutive fixed-length slots inside `[start, end]`.
///
/// Stops before the first slot that would end after `end`; the trailing remainder
/// is never emitted as a shortened slot. A zero duration yields nothing.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_minutes: u32,
}

impl SlotGrid {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            cursor: start,
            end,
            duration_minutes,
        }
    }
}

impl Iterator for SlotGrid {
    type Item = CandidateSlot;

    fn next(&mut self) -> Option<CandidateSlot> {
        if self.duration_minutes == 0 {
            return None;
        }
        let step = Duration::minutes(i64::from(self.duration_minutes));
        let slot_end = self.cursor + step;
        if slot_end > self.end {
            return None;
        }
        let slot = CandidateSlot::new(self.cursor, self.duration_minutes);
        self.cursor = slot_end;
        Some(slot)
    }
}

impl FusedIterator for SlotGrid {}

/// Expand availability over a date range into the concrete window of every day
/// that has a rule, in chronological order.
pub fn expand_windows<'a>(
    availability: &'a Availability,
    range: &DateRange,
) -> impl Iterator<Item = DayWindow> + 'a {
    range.days().filter_map(move |date| {
        let window = availability.window_on(date);
        if window.is_none() {
            trace!(%date, "no availability rule, skipping day");
        }
        window
    })
}
