//! # ical-core
//!
//! Pure-Rust codec for **iCalendar** (RFC 5545) data: folded, escaped,
//! parameter-annotated `text/calendar` streams on one side, an owned tree of
//! components with typed property access on the other.
//!
//! The crate does not expand recurrences. It parses `RRULE`, `RDATE` and
//! `EXDATE` into a [`RecurrenceSet`] request that an evaluator such as the
//! `ical-rrule` crate can run.
//!
//! ## Quick start
//!
//! ```rust
//! use ical_core::{decode, encode, Calendar};
//!
//! let ics = "BEGIN:VCALENDAR\r\nPRODID:-//x//\r\nVERSION:2.0\r\n\
//!            BEGIN:VEVENT\r\nDTSTART:20230101T100000Z\r\nUID:1\r\nEND:VEVENT\r\n\
//!            END:VCALENDAR\r\n";
//!
//! let tree = decode(ics).unwrap();
//! let cal = Calendar::new(&tree).unwrap();
//! let event = cal.events().next().unwrap();
//! assert_eq!(event.uid().unwrap().as_deref(), Some("1"));
//!
//! // Properties are already in name order, so encoding reproduces the input.
//! assert_eq!(encode(&tree).unwrap(), ics);
//! ```
//!
//! ## Modules
//!
//! - [`decoder`]: byte stream to component tree (unfolding, tree assembly)
//! - [`encoder`]: component tree to folded CRLF text
//! - [`content_line`]: `name;param=value:value` grammar
//! - [`component`]: `Component` and the `Properties` container
//! - [`property`]: `Property`, `Params` and the typed value accessors
//! - [`value`]: value-type codecs (text, dates, durations, offsets, ...)
//! - [`recur`]: `RRULE` descriptor and recurrence-set requests
//! - [`calendar`]: `Calendar` / `Event` views
//! - [`types`]: `ValueType` and the default-type table
//! - [`names`]: component, property and parameter name constants
//! - [`error`]: error type for decode/encode failures

pub mod calendar;
pub mod component;
pub mod content_line;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod names;
pub mod property;
pub mod recur;
pub mod types;
pub mod value;

pub use calendar::{Calendar, Event, EventStatus};
pub use component::{Component, Properties};
pub use decoder::{decode, Decoder, DecoderOptions};
pub use encoder::{encode, encode_with_options, Encoder, EncoderOptions};
pub use error::{IcalError, Result};
pub use property::{Params, Period, Property};
pub use recur::{
    Frequency, RecurUntil, RecurrenceDate, RecurrenceRule, RecurrenceSet, WeekdayNum,
};
pub use types::ValueType;

pub use chrono_tz::Tz;
