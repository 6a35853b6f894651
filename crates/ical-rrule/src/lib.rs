//! # ical-rrule
//!
//! Recurrence expansion for iCalendar components decoded by `ical-core`.
//!
//! `ical-core` only gathers `DTSTART`, `RRULE`, `RDATE` and `EXDATE` into a
//! [`RecurrenceSet`](ical_core::RecurrenceSet) request. This crate hands that
//! request to the `rrule` crate, which does the recurrence arithmetic with
//! DST-aware timezones from `chrono-tz`.
//!
//! ## Modules
//!
//! - [`expander`]: recurrence set to concrete occurrences
//! - [`error`]: error types

pub mod error;
pub mod expander;

pub use error::RecurError;
pub use expander::{build_rrule_set, expand, expand_event, rrule_text, Occurrence};
