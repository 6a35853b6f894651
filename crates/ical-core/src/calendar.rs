//! Read-only views that interpret a [`Component`] as a calendar or an event.
//!
//! The views borrow the component; they hold no state of their own.

use crate::component::Component;
use crate::error::{IcalError, Result};
use crate::names::*;
use crate::recur::RecurrenceSet;
use crate::types::ValueType;
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// A `VCALENDAR` component.
#[derive(Debug, Clone, Copy)]
pub struct Calendar<'a> {
    component: &'a Component,
}

impl<'a> Calendar<'a> {
    /// View `component` as a calendar. Fails unless it is a `VCALENDAR`.
    pub fn new(component: &'a Component) -> Result<Self> {
        if component.name != COMP_CALENDAR {
            return Err(IcalError::InvalidTopLevelComponent(component.name.clone()));
        }
        Ok(Self { component })
    }

    pub fn component(&self) -> &'a Component {
        self.component
    }

    /// The `VEVENT` children, in order.
    pub fn events(&self) -> impl Iterator<Item = Event<'a>> + 'a {
        self.component
            .children_named(COMP_EVENT)
            .map(|component| Event { component })
    }

    pub fn product_id(&self) -> Result<Option<String>> {
        self.component.properties.text(PROP_PRODUCT_ID)
    }

    pub fn version(&self) -> Result<Option<String>> {
        self.component.properties.text(PROP_VERSION)
    }
}

/// `STATUS` values allowed on a `VEVENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Tentative,
    Confirmed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Tentative => "TENTATIVE",
            EventStatus::Confirmed => "CONFIRMED",
            EventStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for EventStatus {
    type Err = IcalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TENTATIVE" => Ok(EventStatus::Tentative),
            "CONFIRMED" => Ok(EventStatus::Confirmed),
            "CANCELLED" => Ok(EventStatus::Cancelled),
            _ => Err(IcalError::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `VEVENT` component.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    component: &'a Component,
}

impl<'a> Event<'a> {
    /// View `component` as an event. Fails unless it is a `VEVENT`.
    pub fn new(component: &'a Component) -> Result<Self> {
        if component.name != COMP_EVENT {
            return Err(IcalError::MalformedComponent(format!(
                "expected {COMP_EVENT}, got {:?}",
                component.name
            )));
        }
        Ok(Self { component })
    }

    pub fn component(&self) -> &'a Component {
        self.component
    }

    pub fn uid(&self) -> Result<Option<String>> {
        self.component.properties.text(PROP_UID)
    }

    pub fn summary(&self) -> Result<Option<String>> {
        self.component.properties.text(PROP_SUMMARY)
    }

    /// Inclusive start (`DTSTART`).
    pub fn start(&self, loc: Option<Tz>) -> Result<Option<DateTime<Tz>>> {
        self.component
            .properties
            .date_time(PROP_DATE_TIME_START, loc)
    }

    /// Exclusive end.
    ///
    /// Uses `DTEND` when present. Otherwise `DTSTART` plus `DURATION`; without
    /// a `DURATION`, an all-day (`DATE`) start lasts one day and a
    /// `DATE-TIME` start has zero length.
    pub fn end(&self, loc: Option<Tz>) -> Result<Option<DateTime<Tz>>> {
        let props = &self.component.properties;
        if let Some(end) = props.date_time(PROP_DATE_TIME_END, loc)? {
            return Ok(Some(end));
        }

        let Some(start_prop) = props.get(PROP_DATE_TIME_START) else {
            return Ok(None);
        };
        let start = start_prop.date_time(loc)?;

        let length = match props.get(PROP_DURATION) {
            Some(duration) => duration.duration()?,
            None if start_prop.value_type() == Some(ValueType::Date) => Duration::days(1),
            None => Duration::zero(),
        };
        start
            .checked_add_signed(length)
            .map(Some)
            .ok_or_else(|| IcalError::MalformedDuration("event end out of range".to_string()))
    }

    /// `STATUS`, if set.
    pub fn status(&self) -> Result<Option<EventStatus>> {
        match self.component.properties.text(PROP_STATUS)? {
            Some(s) if !s.is_empty() => s.parse().map(Some),
            _ => Ok(None),
        }
    }

    pub fn recurrence_set(&self, loc: Option<Tz>) -> Result<Option<RecurrenceSet>> {
        self.component.recurrence_set(loc)
    }
}

impl Component {
    /// Set or clear the `STATUS` of an event component.
    pub fn set_event_status(&mut self, status: Option<EventStatus>) {
        match status {
            Some(status) => self.properties.set_text(PROP_STATUS, status.as_str()),
            None => {
                self.properties.remove(PROP_STATUS);
            }
        }
    }
}
