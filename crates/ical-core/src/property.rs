//! Properties, their parameters, and typed access to property values.
//!
//! A [`Property`] keeps its value as the raw, undecoded string from the
//! content line. Typed accessors decode on demand and fail with
//! [`IcalError::UnexpectedValueType`] when the property's effective value type
//! (the `VALUE` parameter, else the default for its name) is not the one the
//! accessor handles.

use crate::error::{IcalError, Result};
use crate::names::{PARAM_ENCODING, PARAM_FORMAT_TYPE, PARAM_TIMEZONE_ID, PARAM_VALUE};
use crate::recur::RecurrenceRule;
use crate::types::{default_value_type, ValueType};
use crate::value::{
    escape_text_list, format_bool, format_date, format_date_time, format_duration,
    format_utc_offset, localize, parse_bool, parse_date, parse_date_time, parse_duration,
    parse_utc_offset, unescape_text_list, RawDateTime,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use std::collections::btree_map::{self, BTreeMap};
use url::Url;

/// Property parameters: a case-insensitive multi-map ordered by name.
///
/// Names are stored upper-cased. Values keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, Vec<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_uppercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for `name`, in order. Empty if the parameter is absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Replace every value for `name` with `value`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .insert(name.to_ascii_uppercase(), vec![value.into()]);
    }

    /// Append `value` to the values for `name`.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_ascii_uppercase())
            .or_default()
            .push(value.into());
    }

    /// Append several values at once (used by the decoder for `a,b,c` lists).
    pub fn extend<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(name.to_ascii_uppercase())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries.remove(&name.to_ascii_uppercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_uppercase())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate `(name, values)` pairs sorted by name.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A PERIOD value: explicit start and end instants.
///
/// `start/duration` periods are stored with their end already computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl Period {
    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }
}

/// A component property: upper-case name, parameters and raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub params: Params,
    pub value: String,
}

impl Property {
    /// Create an empty property. The name is upper-cased.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            params: Params::new(),
            value: String::new(),
        }
    }

    /// Create a property with a raw, already-encoded value.
    pub fn with_value(name: &str, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(name)
        }
    }

    /// Effective value type: the `VALUE` parameter, else the name's default.
    pub fn value_type(&self) -> Option<ValueType> {
        match self.params.get(PARAM_VALUE) {
            Some(explicit) if !explicit.is_empty() => explicit.parse().ok(),
            _ => default_value_type(&self.name),
        }
    }

    /// Set the value type, omitting the `VALUE` parameter when it would only
    /// restate the default for this property name.
    pub fn set_value_type(&mut self, value_type: Option<ValueType>) {
        match value_type {
            Some(t) if default_value_type(&self.name).as_ref() != Some(&t) => {
                self.params.set(PARAM_VALUE, t.as_str());
            }
            _ => {
                self.params.remove(PARAM_VALUE);
            }
        }
    }

    fn expect_value_type(&self, want: ValueType) -> Result<()> {
        match self.value_type() {
            Some(actual) if actual != want => Err(self.unexpected(want.as_str(), actual)),
            _ => Ok(()),
        }
    }

    fn unexpected(&self, expected: &str, actual: ValueType) -> IcalError {
        IcalError::UnexpectedValueType {
            property: self.name.clone(),
            expected: expected.to_string(),
            actual,
        }
    }

    /// Location for floating times: the `TZID` parameter, else `fallback`, else UTC.
    pub fn location(&self, fallback: Option<Tz>) -> Result<Tz> {
        match self.params.get(PARAM_TIMEZONE_ID) {
            Some(tzid) => tzid
                .trim_start_matches('/')
                .parse::<Tz>()
                .map_err(|_| IcalError::InvalidTimezone(tzid.to_string())),
            None => Ok(fallback.unwrap_or(Tz::UTC)),
        }
    }

    // ------------------------------------------------------------------------
    // BINARY
    // ------------------------------------------------------------------------

    pub fn binary(&self) -> Result<Vec<u8>> {
        self.expect_value_type(ValueType::Binary)?;
        Ok(BASE64.decode(&self.value)?)
    }

    /// Store `data` as an inline base64 BINARY value (`ENCODING=BASE64`).
    pub fn set_binary(&mut self, data: &[u8]) {
        self.set_value_type(Some(ValueType::Binary));
        self.params.set(PARAM_ENCODING, "BASE64");
        self.value = BASE64.encode(data);
    }

    // ------------------------------------------------------------------------
    // BOOLEAN / INTEGER / FLOAT
    // ------------------------------------------------------------------------

    pub fn bool(&self) -> Result<bool> {
        self.expect_value_type(ValueType::Boolean)?;
        parse_bool(&self.value)
    }

    pub fn set_bool(&mut self, value: bool) {
        self.set_value_type(Some(ValueType::Boolean));
        self.value = format_bool(value).to_string();
    }

    pub fn int(&self) -> Result<i64> {
        self.expect_value_type(ValueType::Integer)?;
        Ok(self.value.parse()?)
    }

    pub fn set_int(&mut self, value: i64) {
        self.set_value_type(Some(ValueType::Integer));
        self.value = value.to_string();
    }

    pub fn float(&self) -> Result<f64> {
        self.expect_value_type(ValueType::Float)?;
        Ok(self.value.parse()?)
    }

    pub fn set_float(&mut self, value: f64) {
        self.set_value_type(Some(ValueType::Float));
        self.value = value.to_string();
    }

    // ------------------------------------------------------------------------
    // DATE / DATE-TIME
    // ------------------------------------------------------------------------

    /// Parse the value as a DATE-TIME, or as a DATE at local midnight.
    ///
    /// Values with a trailing `Z` are UTC. Others are read in the location
    /// named by `TZID`, else `loc`, else UTC.
    pub fn date_time(&self, loc: Option<Tz>) -> Result<DateTime<Tz>> {
        match self.value_type() {
            None | Some(ValueType::DateTime) => self.instant(&self.value, loc),
            Some(ValueType::Date) => self.midnight(&self.value, loc),
            Some(other) => Err(self.unexpected("DATE or DATE-TIME", other)),
        }
    }

    /// Parse a comma-separated list of DATE or DATE-TIME values (`EXDATE`, `RDATE`).
    pub fn date_time_list(&self, loc: Option<Tz>) -> Result<Vec<DateTime<Tz>>> {
        let value_type = self.value_type();
        self.value
            .split(',')
            .map(|item| match &value_type {
                None | Some(ValueType::DateTime) => self.instant(item, loc),
                Some(ValueType::Date) => self.midnight(item, loc),
                Some(other) => Err(self.unexpected("DATE or DATE-TIME", other.clone())),
            })
            .collect()
    }

    /// Store `dt` as a UTC DATE-TIME.
    pub fn set_date_time<Z: TimeZone>(&mut self, dt: &DateTime<Z>) {
        self.set_value_type(Some(ValueType::DateTime));
        self.params.remove(PARAM_TIMEZONE_ID);
        self.value = format_date_time(dt);
    }

    pub fn date(&self) -> Result<NaiveDate> {
        self.expect_value_type(ValueType::Date)?;
        parse_date(&self.value)
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.set_value_type(Some(ValueType::Date));
        self.value = format_date(date);
    }

    fn instant(&self, raw: &str, loc: Option<Tz>) -> Result<DateTime<Tz>> {
        match parse_date_time(raw)? {
            RawDateTime::Utc(naive) => Ok(Tz::UTC.from_utc_datetime(&naive)),
            RawDateTime::Floating(naive) => localize(naive, &self.location(loc)?),
        }
    }

    fn midnight(&self, raw: &str, loc: Option<Tz>) -> Result<DateTime<Tz>> {
        let date = parse_date(raw)?;
        localize(date.and_time(NaiveTime::MIN), &self.location(loc)?)
    }

    // ------------------------------------------------------------------------
    // PERIOD
    // ------------------------------------------------------------------------

    /// Parse a comma-separated list of PERIOD values (`start/end` or `start/duration`).
    pub fn period_list(&self, loc: Option<Tz>) -> Result<Vec<Period>> {
        self.expect_value_type(ValueType::Period)?;
        self.value
            .split(',')
            .map(|item| self.period(item, loc))
            .collect()
    }

    fn period(&self, raw: &str, loc: Option<Tz>) -> Result<Period> {
        let (start, end) = raw
            .split_once('/')
            .ok_or_else(|| IcalError::MalformedPeriod(format!("{raw:?}: expected '/'")))?;
        let start = self.instant(start, loc)?;
        let end = if end.starts_with(['P', 'p', '+', '-']) {
            let duration = parse_duration(end)?;
            if duration < Duration::zero() {
                return Err(IcalError::MalformedPeriod(format!(
                    "{raw:?}: negative duration"
                )));
            }
            start.checked_add_signed(duration).ok_or_else(|| {
                IcalError::MalformedPeriod(format!("{raw:?}: end out of range"))
            })?
        } else {
            self.instant(end, loc)?
        };
        if end < start {
            return Err(IcalError::MalformedPeriod(format!(
                "{raw:?}: end precedes start"
            )));
        }
        Ok(Period { start, end })
    }

    /// Store periods as `start/end` pairs in UTC.
    pub fn set_period_list(&mut self, periods: &[Period]) {
        self.set_value_type(Some(ValueType::Period));
        self.params.remove(PARAM_TIMEZONE_ID);
        self.value = periods
            .iter()
            .map(|p| format!("{}/{}", format_date_time(&p.start), format_date_time(&p.end)))
            .collect::<Vec<_>>()
            .join(",");
    }

    // ------------------------------------------------------------------------
    // DURATION
    // ------------------------------------------------------------------------

    pub fn duration(&self) -> Result<Duration> {
        self.expect_value_type(ValueType::Duration)?;
        parse_duration(&self.value)
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.set_value_type(Some(ValueType::Duration));
        self.value = format_duration(duration);
    }

    // ------------------------------------------------------------------------
    // TEXT
    // ------------------------------------------------------------------------

    pub fn text_list(&self) -> Result<Vec<String>> {
        self.expect_value_type(ValueType::Text)?;
        unescape_text_list(&self.value)
    }

    pub fn set_text_list<S: AsRef<str>>(&mut self, items: &[S]) {
        self.set_value_type(Some(ValueType::Text));
        self.value = escape_text_list(items);
    }

    /// First item of the text list.
    pub fn text(&self) -> Result<String> {
        Ok(self.text_list()?.into_iter().next().unwrap_or_default())
    }

    pub fn set_text(&mut self, text: &str) {
        self.set_text_list(&[text]);
    }

    // ------------------------------------------------------------------------
    // URI / CAL-ADDRESS
    // ------------------------------------------------------------------------

    /// Parse the value as a URI.
    ///
    /// Inline BINARY values are returned as a `data:` URI carrying the
    /// base64 payload and the `FMTTYPE` media type, so attachments can be
    /// handled the same way whether they are embedded or referenced.
    pub fn uri(&self) -> Result<Url> {
        match self.value_type() {
            None | Some(ValueType::Uri) => Ok(Url::parse(&self.value)?),
            Some(ValueType::Binary) => {
                let media_type = self.params.get(PARAM_FORMAT_TYPE).unwrap_or_default();
                Ok(Url::parse(&format!("data:{media_type};base64,{}", self.value))?)
            }
            Some(other) => Err(self.unexpected("URI or BINARY", other)),
        }
    }

    pub fn set_uri(&mut self, uri: &Url) {
        self.set_value_type(Some(ValueType::Uri));
        self.params.remove(PARAM_ENCODING);
        self.value = uri.to_string();
    }

    pub fn cal_address(&self) -> Result<Url> {
        self.expect_value_type(ValueType::CalAddress)?;
        Ok(Url::parse(&self.value)?)
    }

    pub fn set_cal_address(&mut self, address: &Url) {
        self.set_value_type(Some(ValueType::CalAddress));
        self.value = address.to_string();
    }

    // ------------------------------------------------------------------------
    // UTC-OFFSET / RECUR
    // ------------------------------------------------------------------------

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        self.expect_value_type(ValueType::UtcOffset)?;
        parse_utc_offset(&self.value)
    }

    pub fn set_utc_offset(&mut self, offset: FixedOffset) {
        self.set_value_type(Some(ValueType::UtcOffset));
        self.value = format_utc_offset(offset);
    }

    pub fn recurrence_rule(&self) -> Result<RecurrenceRule> {
        self.expect_value_type(ValueType::Recur)?;
        self.value.parse()
    }

    pub fn set_recurrence_rule(&mut self, rule: &RecurrenceRule) {
        self.set_value_type(Some(ValueType::Recur));
        self.value = rule.to_string();
    }
}
