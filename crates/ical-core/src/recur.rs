//! RECUR values and recurrence-set requests.
//!
//! This module only marshals data. [`RecurrenceRule`] is the structured form
//! of an `RRULE` value and [`RecurrenceSet`] gathers `DTSTART`, `RRULE`,
//! `RDATE` and `EXDATE` into the request handed to a recurrence evaluator.
//! Expanding occurrences is the evaluator's job (see the `ical-rrule` crate).

use crate::error::{IcalError, Result};
use crate::property::Period;
use crate::value::{format_date, format_date_time, format_floating_date_time, parse_date, parse_date_time, RawDateTime};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// `FREQ` rule part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Secondly => "SECONDLY",
            Frequency::Minutely => "MINUTELY",
            Frequency::Hourly => "HOURLY",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

impl FromStr for Frequency {
    type Err = IcalError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "SECONDLY" => Frequency::Secondly,
            "MINUTELY" => Frequency::Minutely,
            "HOURLY" => Frequency::Hourly,
            "DAILY" => Frequency::Daily,
            "WEEKLY" => Frequency::Weekly,
            "MONTHLY" => Frequency::Monthly,
            "YEARLY" => Frequency::Yearly,
            _ => return Err(malformed(format!("unknown FREQ {s:?}"))),
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `BYDAY` entry: a weekday with an optional ordinal (`3SU`, `-1FR`, `MO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayNum {
    pub ordinal: Option<i16>,
    pub weekday: Weekday,
}

impl WeekdayNum {
    pub fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    pub fn nth(ordinal: i16, weekday: Weekday) -> Self {
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }
}

impl FromStr for WeekdayNum {
    type Err = IcalError;

    fn from_str(s: &str) -> Result<Self> {
        let split = s.len().saturating_sub(2);
        if !s.is_char_boundary(split) {
            return Err(malformed(format!("invalid BYDAY entry {s:?}")));
        }
        let (ordinal, day) = s.split_at(split);
        let weekday = parse_weekday(day)?;
        let ordinal = if ordinal.is_empty() {
            None
        } else {
            let n: i16 = ordinal
                .parse()
                .map_err(|_| malformed(format!("invalid BYDAY ordinal {ordinal:?}")))?;
            if n == 0 || !(-53..=53).contains(&n) {
                return Err(malformed(format!("BYDAY ordinal {n} out of range")));
            }
            Some(n)
        };
        Ok(Self { ordinal, weekday })
    }
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        f.write_str(weekday_code(self.weekday))
    }
}

/// `UNTIL` rule part, in whichever form the rule carried it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurUntil {
    Date(NaiveDate),
    Floating(NaiveDateTime),
    Utc(DateTime<Utc>),
}

impl fmt::Display for RecurUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurUntil::Date(d) => f.write_str(&format_date(*d)),
            RecurUntil::Floating(dt) => f.write_str(&format_floating_date_time(dt)),
            RecurUntil::Utc(dt) => f.write_str(&format_date_time(dt)),
        }
    }
}

/// Structured `RRULE` value (RFC 5545 §3.3.10).
///
/// Parsing checks the grammar and value ranges only; whether the rule makes
/// sense for a given `DTSTART` is decided by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Frequency,
    pub interval: Option<u32>,
    pub count: Option<u32>,
    pub until: Option<RecurUntil>,
    pub by_second: Vec<u8>,
    pub by_minute: Vec<u8>,
    pub by_hour: Vec<u8>,
    pub by_day: Vec<WeekdayNum>,
    pub by_month_day: Vec<i8>,
    pub by_year_day: Vec<i16>,
    pub by_week_no: Vec<i8>,
    pub by_month: Vec<u8>,
    pub by_set_pos: Vec<i16>,
    pub week_start: Option<Weekday>,
}

impl RecurrenceRule {
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            interval: None,
            count: None,
            until: None,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
            week_start: None,
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = IcalError;

    fn from_str(s: &str) -> Result<Self> {
        let mut freq: Option<Frequency> = None;
        let mut rule = RecurrenceRule::new(Frequency::Daily);
        let mut seen: Vec<String> = Vec::new();

        for part in s.split(';') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| malformed(format!("rule part {part:?} has no '='")))?;
            let key = key.to_ascii_uppercase();
            if seen.contains(&key) {
                return Err(malformed(format!("duplicate rule part {key}")));
            }

            match key.as_str() {
                "FREQ" => freq = Some(value.parse()?),
                "INTERVAL" => {
                    let n: u32 = parse_number(&key, value)?;
                    if n == 0 {
                        return Err(malformed("INTERVAL must be positive".to_string()));
                    }
                    rule.interval = Some(n);
                }
                "COUNT" => rule.count = Some(parse_number(&key, value)?),
                "UNTIL" => rule.until = Some(parse_until(value)?),
                "BYSECOND" => rule.by_second = parse_list(&key, value, |n: u8| n <= 60)?,
                "BYMINUTE" => rule.by_minute = parse_list(&key, value, |n: u8| n <= 59)?,
                "BYHOUR" => rule.by_hour = parse_list(&key, value, |n: u8| n <= 23)?,
                "BYDAY" => {
                    rule.by_day = value
                        .split(',')
                        .map(|entry| entry.parse::<WeekdayNum>())
                        .collect::<Result<Vec<_>>>()?;
                }
                "BYMONTHDAY" => {
                    rule.by_month_day = parse_list(&key, value, |n: i8| n != 0 && (-31..=31).contains(&n))?;
                }
                "BYYEARDAY" => {
                    rule.by_year_day = parse_list(&key, value, |n: i16| n != 0 && (-366..=366).contains(&n))?;
                }
                "BYWEEKNO" => {
                    rule.by_week_no = parse_list(&key, value, |n: i8| n != 0 && (-53..=53).contains(&n))?;
                }
                "BYMONTH" => rule.by_month = parse_list(&key, value, |n: u8| (1..=12).contains(&n))?,
                "BYSETPOS" => {
                    rule.by_set_pos = parse_list(&key, value, |n: i16| n != 0 && (-366..=366).contains(&n))?;
                }
                "WKST" => rule.week_start = Some(parse_weekday(value)?),
                _ => return Err(malformed(format!("unknown rule part {key}"))),
            }
            seen.push(key);
        }

        rule.freq = freq.ok_or_else(|| malformed("missing FREQ".to_string()))?;
        if rule.count.is_some() && rule.until.is_some() {
            return Err(malformed("COUNT and UNTIL are mutually exclusive".to_string()));
        }
        Ok(rule)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.freq)?;
        if let Some(n) = self.interval {
            write!(f, ";INTERVAL={n}")?;
        }
        if let Some(n) = self.count {
            write!(f, ";COUNT={n}")?;
        }
        if let Some(until) = &self.until {
            write!(f, ";UNTIL={until}")?;
        }
        write_list(f, "BYSECOND", &self.by_second)?;
        write_list(f, "BYMINUTE", &self.by_minute)?;
        write_list(f, "BYHOUR", &self.by_hour)?;
        write_list(f, "BYDAY", &self.by_day)?;
        write_list(f, "BYMONTHDAY", &self.by_month_day)?;
        write_list(f, "BYYEARDAY", &self.by_year_day)?;
        write_list(f, "BYWEEKNO", &self.by_week_no)?;
        write_list(f, "BYMONTH", &self.by_month)?;
        write_list(f, "BYSETPOS", &self.by_set_pos)?;
        if let Some(day) = self.week_start {
            write!(f, ";WKST={}", weekday_code(day))?;
        }
        Ok(())
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, key: &str, items: &[T]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    write!(f, ";{key}=")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn malformed(message: String) -> IcalError {
    IcalError::MalformedRecurrence(message)
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| malformed(format!("invalid {key} value {value:?}")))
}

fn parse_list<T, F>(key: &str, value: &str, in_range: F) -> Result<Vec<T>>
where
    T: FromStr + Copy + fmt::Display,
    F: Fn(T) -> bool,
{
    value
        .split(',')
        .map(|item| {
            let n: T = parse_number(key, item)?;
            if in_range(n) {
                Ok(n)
            } else {
                Err(malformed(format!("{key} value {n} out of range")))
            }
        })
        .collect()
}

fn parse_until(value: &str) -> Result<RecurUntil> {
    if value.len() == 8 {
        return Ok(RecurUntil::Date(parse_date(value)?));
    }
    Ok(match parse_date_time(value)? {
        RawDateTime::Utc(naive) => RecurUntil::Utc(Utc.from_utc_datetime(&naive)),
        RawDateTime::Floating(naive) => RecurUntil::Floating(naive),
    })
}

fn parse_weekday(code: &str) -> Result<Weekday> {
    Ok(match code.to_ascii_uppercase().as_str() {
        "MO" => Weekday::Mon,
        "TU" => Weekday::Tue,
        "WE" => Weekday::Wed,
        "TH" => Weekday::Thu,
        "FR" => Weekday::Fri,
        "SA" => Weekday::Sat,
        "SU" => Weekday::Sun,
        _ => return Err(malformed(format!("unknown weekday {code:?}"))),
    })
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

// ============================================================================
// Recurrence-set request
// ============================================================================

/// One `RDATE` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RecurrenceDate {
    Instant(DateTime<Tz>),
    Period(Period),
}

impl RecurrenceDate {
    /// When the occurrence starts.
    pub fn start(&self) -> DateTime<Tz> {
        match self {
            RecurrenceDate::Instant(dt) => *dt,
            RecurrenceDate::Period(period) => period.start,
        }
    }
}

/// Everything a recurrence evaluator needs to expand one component.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceSet {
    /// `DTSTART`, resolved to its location.
    pub start: DateTime<Tz>,
    /// `RRULE`, if any.
    pub rule: Option<RecurrenceRule>,
    /// All `RDATE` values, in property order.
    pub recurrence_dates: Vec<RecurrenceDate>,
    /// All `EXDATE` values, in property order.
    pub exception_dates: Vec<DateTime<Tz>>,
}
