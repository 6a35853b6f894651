//! The component tree: named components owning their properties and children.

use crate::error::{IcalError, Result};
use crate::names::*;
use crate::property::Property;
use crate::recur::{RecurrenceDate, RecurrenceRule, RecurrenceSet};
use crate::types::ValueType;
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use std::collections::btree_map::{self, BTreeMap};
use url::Url;

/// Properties of a component, grouped by name.
///
/// Names iterate in sorted order (which is also the encoding order); the
/// instances under one name keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, Vec<Property>>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// First property named `name`.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.entries
            .get(&name.to_ascii_uppercase())
            .and_then(|props| props.first())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.entries
            .get_mut(&name.to_ascii_uppercase())
            .and_then(|props| props.first_mut())
    }

    /// Every property named `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> &[Property] {
        self.entries
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Replace all properties sharing `prop`'s name with `prop`.
    pub fn set(&mut self, mut prop: Property) {
        prop.name.make_ascii_uppercase();
        self.entries.insert(prop.name.clone(), vec![prop]);
    }

    /// Append `prop` after any existing properties of the same name.
    pub fn add(&mut self, mut prop: Property) {
        prop.name.make_ascii_uppercase();
        self.entries.entry(prop.name.clone()).or_default().push(prop);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<Property>> {
        self.entries.remove(&name.to_ascii_uppercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_uppercase())
    }

    /// Number of distinct property names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(name, instances)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<Property>> {
        self.entries.iter()
    }

    /// Every property, in encoding order.
    pub fn values(&self) -> impl Iterator<Item = &Property> {
        self.entries.values().flatten()
    }

    /// Text of the first property named `name`; `Ok(None)` when absent.
    pub fn text(&self, name: &str) -> Result<Option<String>> {
        self.get(name).map(Property::text).transpose()
    }

    pub fn set_text(&mut self, name: &str, text: &str) {
        let mut prop = Property::new(name);
        prop.set_text(text);
        self.set(prop);
    }

    pub fn date_time(&self, name: &str, loc: Option<Tz>) -> Result<Option<DateTime<Tz>>> {
        self.get(name).map(|prop| prop.date_time(loc)).transpose()
    }

    pub fn set_date_time<Z: TimeZone>(&mut self, name: &str, dt: &DateTime<Z>) {
        let mut prop = Property::new(name);
        prop.set_date_time(dt);
        self.set(prop);
    }

    pub fn uri(&self, name: &str) -> Result<Option<Url>> {
        self.get(name).map(Property::uri).transpose()
    }

    pub fn set_uri(&mut self, name: &str, uri: &Url) {
        let mut prop = Property::new(name);
        prop.set_uri(uri);
        self.set(prop);
    }

    /// The `RRULE` descriptor; `Ok(None)` when there is none.
    pub fn recurrence_rule(&self) -> Result<Option<RecurrenceRule>> {
        self.get(PROP_RECURRENCE_RULE)
            .map(Property::recurrence_rule)
            .transpose()
    }

    /// Replace the `RRULE`, or remove it when `rule` is `None`.
    pub fn set_recurrence_rule(&mut self, rule: Option<&RecurrenceRule>) {
        match rule {
            Some(rule) => {
                let mut prop = Property::new(PROP_RECURRENCE_RULE);
                prop.set_recurrence_rule(rule);
                self.set(prop);
            }
            None => {
                self.remove(PROP_RECURRENCE_RULE);
            }
        }
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a Vec<Property>);
    type IntoIter = btree_map::Iter<'a, String, Vec<Property>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iCalendar component (`VCALENDAR`, `VEVENT`, `VALARM`, ...).
///
/// Each component exclusively owns its children; the tree has no
/// back-references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub properties: Properties,
    pub children: Vec<Component>,
}

impl Component {
    /// Create an empty component. The name is upper-cased.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    /// An empty `VCALENDAR`.
    pub fn calendar() -> Self {
        Self::new(COMP_CALENDAR)
    }

    /// An empty `VEVENT`.
    pub fn event() -> Self {
        Self::new(COMP_EVENT)
    }

    /// Children with the given component name, in order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Component> {
        self.children
            .iter()
            .filter(move |child| child.name.eq_ignore_ascii_case(name))
    }

    /// Gather `DTSTART`, `RRULE`, `RDATE` and `EXDATE` into a recurrence-set
    /// request for an external evaluator.
    ///
    /// Returns `Ok(None)` when the component neither has an `RRULE` nor any
    /// `RDATE`, i.e. it does not recur.
    pub fn recurrence_set(&self, loc: Option<Tz>) -> Result<Option<RecurrenceSet>> {
        let rule = self.properties.recurrence_rule()?;
        let rdate_props = self.properties.get_all(PROP_RECURRENCE_DATES);
        if rule.is_none() && rdate_props.is_empty() {
            return Ok(None);
        }

        let start = self
            .properties
            .date_time(PROP_DATE_TIME_START, loc)?
            .ok_or_else(|| {
                IcalError::MalformedComponent(format!(
                    "{}: recurrence without {PROP_DATE_TIME_START}",
                    self.name
                ))
            })?;

        let mut recurrence_dates = Vec::new();
        for prop in rdate_props {
            if prop.value_type() == Some(ValueType::Period) {
                recurrence_dates.extend(
                    prop.period_list(loc)?
                        .into_iter()
                        .map(RecurrenceDate::Period),
                );
            } else {
                recurrence_dates.extend(
                    prop.date_time_list(loc)?
                        .into_iter()
                        .map(RecurrenceDate::Instant),
                );
            }
        }

        let mut exception_dates = Vec::new();
        for prop in self.properties.get_all(PROP_EXCEPTION_DATES) {
            exception_dates.extend(prop.date_time_list(loc)?);
        }

        Ok(Some(RecurrenceSet {
            start,
            rule,
            recurrence_dates,
            exception_dates,
        }))
    }
}
