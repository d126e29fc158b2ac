//! Error types for slot-engine operations.

use chrono::Weekday;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Invalid availability rule: {0}")]
    InvalidRule(String),

    #[error("Duplicate availability rule for {0}")]
    DuplicateWeekday(Weekday),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid weekday index {0} (expected 0 = Sunday through 6 = Saturday)")]
    InvalidWeekday(u8),

    /// Slot durations must be positive for enumeration to make progress.
    #[error("Invalid slot duration: {0} minutes")]
    InvalidDuration(u32),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
