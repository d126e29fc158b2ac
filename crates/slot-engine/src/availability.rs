//! Recurring weekly availability.
//!
//! A person's availability is at most one time-of-day window per weekday, stored
//! in a fixed 7-entry table indexed by `num_days_from_sunday()`. Windows are UTC
//! wall-clock ranges that never span midnight.
//!
//! The window test here is the single weekday-window primitive every other
//! operation builds on: it is closed on both ends, so a slot starting exactly at
//! the window start or ending exactly at the window end fits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::expander::DayWindow;
use crate::slot::CandidateSlot;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Convert a numeric weekday (0 = Sunday through 6 = Saturday) to [`Weekday`].
pub fn weekday_from_index(index: u8) -> Result<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(SlotError::InvalidWeekday(other)),
    }
}

/// A UTC wall-clock time with minute precision.
///
/// Ranges over `00:00` to `23:59`, plus `24:00` so a window can run to the end
/// of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        let in_day = hour < 24 && minute < 60;
        let end_of_day = hour == 24 && minute == 0;
        if !in_day && !end_of_day {
            return Err(SlotError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// The absolute instant of this wall-clock time on the given UTC date.
    pub fn on(&self, date: NaiveDate) -> DateTime<Utc> {
        // Offsetting from midnight keeps 24:00 representable as the next midnight.
        date.and_time(NaiveTime::MIN).and_utc()
            + Duration::minutes(i64::from(self.minutes_since_midnight()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotError;

    /// Parse `"HH:MM"` (24-hour clock).
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// One weekday's availability window, `[start, end]` in UTC wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailabilityRule {
    pub weekday: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl WeeklyAvailabilityRule {
    pub fn new(weekday: Weekday, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            weekday,
            start,
            end,
        }
    }

    /// Reject windows whose start is after their end.
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(SlotError::InvalidRule(format!(
                "{} window starts at {} but ends at {}",
                self.weekday, self.start, self.end
            )));
        }
        Ok(())
    }

    /// Whether the wall-clock span `[start_minute, end_minute]` lies within this
    /// window, inclusive on both ends.
    fn covers(&self, start_minute: u32, end_minute: u32) -> bool {
        start_minute >= self.start.minutes_since_midnight()
            && end_minute <= self.end.minutes_since_midnight()
    }
}

/// Weekly availability: at most one [`WeeklyAvailabilityRule`] per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<WeeklyAvailabilityRule>",
    into = "Vec<WeeklyAvailabilityRule>"
)]
pub struct Availability {
    table: [Option<WeeklyAvailabilityRule>; 7],
}

impl Availability {
    /// Build the weekday table from a list of rules.
    ///
    /// # Errors
    /// Returns `SlotError::DuplicateWeekday` if two rules name the same weekday,
    /// and `SlotError::InvalidRule` if a rule starts after it ends.
    pub fn new(rules: impl IntoIterator<Item = WeeklyAvailabilityRule>) -> Result<Self> {
        let mut table = [None; 7];
        for rule in rules {
            rule.validate()?;
            let slot = &mut table[rule.weekday.num_days_from_sunday() as usize];
            if slot.is_some() {
                return Err(SlotError::DuplicateWeekday(rule.weekday));
            }
            *slot = Some(rule);
        }
        Ok(Self { table })
    }

    pub fn rule_for(&self, weekday: Weekday) -> Option<&WeeklyAvailabilityRule> {
        self.table[weekday.num_days_from_sunday() as usize].as_ref()
    }

    /// All rules, Sunday first.
    pub fn rules(&self) -> impl Iterator<Item = &WeeklyAvailabilityRule> + '_ {
        self.table.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.table.iter().all(Option::is_none)
    }

    /// The concrete window for a calendar date, or `None` if that weekday has no rule.
    pub fn window_on(&self, date: NaiveDate) -> Option<DayWindow> {
        self.rule_for(date.weekday()).map(|rule| DayWindow {
            date,
            start: rule.start.on(date),
            end: rule.end.on(date),
        })
    }

    /// The weekday-window test.
    ///
    /// True iff the slot's UTC weekday has a rule and the slot's wall-clock span
    /// lies inside it. A span whose end runs past midnight is never inside.
    pub fn contains(&self, slot: &CandidateSlot) -> bool {
        let Some(rule) = self.rule_for(slot.start.weekday()) else {
            return false;
        };
        let end_minute = slot.end_minute_of_day();
        end_minute <= MINUTES_PER_DAY && rule.covers(slot.start_minute_of_day(), end_minute)
    }
}

impl TryFrom<Vec<WeeklyAvailabilityRule>> for Availability {
    type Error = SlotError;

    fn try_from(rules: Vec<WeeklyAvailabilityRule>) -> Result<Self> {
        Self::new(rules)
    }
}

impl From<Availability> for Vec<WeeklyAvailabilityRule> {
    fn from(value: Availability) -> Self {
        value.rules().copied().collect()
    }
}

/// Check whether a slot fits inside the weekly availability window for its weekday.
///
/// Boundaries are inclusive: a slot may start exactly at the window start and end
/// exactly at the window end.
pub fn is_slot_available(availability: &Availability, slot: &CandidateSlot) -> bool {
    availability.contains(slot)
}
