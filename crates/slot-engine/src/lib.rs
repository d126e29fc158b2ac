//! # slot-engine
//!
//! Deterministic calendar-slot availability for recurring weekly schedules.
//!
//! Given a weekly availability (one UTC time-of-day window per weekday) and a list
//! of busy events with optional before/after buffers, the engine answers whether a
//! slot can be booked and enumerates every free fixed-length slot in a date range,
//! for one person or for several calendars at once. Every operation is
//! a pure function of its inputs; the system clock is never read.
//!
//! ## Modules
//!
//! - [`availability`]: weekly rules, the weekday table, the window test
//! - [`conflict`]: busy events, buffers, the half-open overlap test
//! - [`expander`]: date ranges → calendar days → day windows → candidate grids
//! - [`freebusy`]: free slots and free intervals for one calendar
//! - [`attendees`]: free slots and free intervals shared by several calendars
//! - [`slot`]: the candidate slot value type
//! - [`error`]: Error types
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc, Weekday};
//! use slot_engine::{
//!     is_slot_available_with_buffer, Availability, BusyEvent, CandidateSlot, TimeOfDay,
//!     WeeklyAvailabilityRule,
//! };
//!
//! let availability = Availability::new([WeeklyAvailabilityRule::new(
//!     Weekday::Mon,
//!     TimeOfDay::new(9, 0).unwrap(),
//!     TimeOfDay::new(12, 0).unwrap(),
//! )])
//! .unwrap();
//!
//! let meeting = BusyEvent::new(
//!     Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap(),
//! )
//! .with_buffer(15, 15);
//!
//! // 09:15-09:45 ends exactly where the buffered meeting starts blocking.
//! let slot = CandidateSlot::new(Utc.with_ymd_and_hms(2024, 1, 15, 9, 15, 0).unwrap(), 30);
//! assert!(is_slot_available_with_buffer(&availability, &[meeting.clone()], &slot));
//!
//! let late = CandidateSlot::new(Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap(), 30);
//! assert!(!is_slot_available_with_buffer(&availability, &[meeting], &late));
//! ```

pub mod attendees;
pub mod availability;
pub mod conflict;
pub mod error;
pub mod expander;
pub mod freebusy;
pub mod slot;

pub use attendees::{common_free_intervals, list_available_slots_for_attendees, Attendee};
pub use availability::{
    is_slot_available, weekday_from_index, Availability, TimeOfDay, WeeklyAvailabilityRule,
};
pub use conflict::{
    find_conflicts, is_slot_available_with_buffer, is_slot_available_with_events, overlaps,
    Buffer, BusyEvent, Conflict,
};
pub use error::SlotError;
pub use expander::{expand_windows, DateRange, DayRange, DayWindow, SlotGrid};
pub use freebusy::{first_available_slot, free_intervals, list_available_slots, FreeInterval};
pub use slot::{CandidateSlot, DEFAULT_SLOT_MINUTES};
