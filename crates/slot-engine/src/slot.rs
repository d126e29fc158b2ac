//! Fixed-duration candidate slots.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Reference slot length used by the enumerators when callers have no preference.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

/// A proposed meeting slot: an absolute start instant plus a length in minutes.
///
/// Used both as the input to the availability checks and as the output of the
/// enumerators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
}

impl CandidateSlot {
    pub fn new(start: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    /// Exclusive end instant of the slot.
    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.duration()
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Wall-clock start of the slot in minutes since UTC midnight.
    pub(crate) fn start_minute_of_day(&self) -> u32 {
        self.start.hour() * 60 + self.start.minute()
    }

    /// Wall-clock end in minutes since UTC midnight of the start day.
    ///
    /// Not wrapped: a slot running past midnight yields a value above 1440.
    pub(crate) fn end_minute_of_day(&self) -> u32 {
        self.start_minute_of_day().saturating_add(self.duration_minutes)
    }
}
