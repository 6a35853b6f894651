//! Value codec -- parse/format pairs for the raw value string of a property.
//!
//! These functions know nothing about parameters or value-type checks; the
//! typed accessors on [`Property`](crate::Property) do the type check and then
//! delegate here.
//!
//! - TEXT: `\\`, `\;`, `\,`, `\n`/`\N` escapes; unescaped commas split lists
//! - DATE / DATE-TIME: `YYYYMMDD` and `YYYYMMDDTHHMMSS[Z]`, always written as UTC
//! - DURATION: `[+/-]P(nW | nD[T..] | T..)`, always written as `[-]PT<n>S`
//! - BOOLEAN, UTC-OFFSET

use crate::error::{IcalError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const DATE_LEN: usize = 8;
const DATE_TIME_LEN: usize = 15;

// ============================================================================
// TEXT
// ============================================================================

/// Split a raw TEXT value on unescaped commas and resolve escape sequences.
///
/// A value without commas yields a single item (possibly empty).
pub fn unescape_text_list(raw: &str) -> Result<Vec<String>> {
    let mut items = Vec::new();
    let mut current = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(e @ ('\\' | ';' | ',')) => current.push(e),
                Some('n' | 'N') => current.push('\n'),
                Some(other) => {
                    return Err(IcalError::MalformedText(format!(
                        "invalid escape sequence '\\{other}'"
                    )))
                }
                None => {
                    return Err(IcalError::MalformedText(
                        "backslash at end of text".to_string(),
                    ))
                }
            },
            ',' => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    Ok(items)
}

/// Escape a single TEXT item. Commas are escaped so the item never splits.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    push_escaped(text, &mut out);
    out
}

/// Escape each item and join them with unescaped commas.
pub fn escape_text_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_escaped(item.as_ref(), &mut out);
    }
    out
}

fn push_escaped(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\\' | ';' | ',' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
}

// ============================================================================
// DATE / DATE-TIME
// ============================================================================

/// A DATE-TIME value before a location is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawDateTime {
    /// Trailing `Z`: the timestamp is fixed to UTC.
    Utc(NaiveDateTime),
    /// No `Z`: wall-clock time in whatever location applies.
    Floating(NaiveDateTime),
}

/// Parse a DATE value (`YYYYMMDD`).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    if raw.len() != DATE_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IcalError::MalformedDate(format!(
            "{raw:?}: expected YYYYMMDD"
        )));
    }
    let year: i32 = raw[0..4].parse()?;
    let month: u32 = raw[4..6].parse()?;
    let day: u32 = raw[6..8].parse()?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| IcalError::MalformedDate(format!("{raw:?}: no such calendar date")))
}

/// Parse a DATE-TIME value (`YYYYMMDDTHHMMSS` with an optional `Z`).
pub fn parse_date_time(raw: &str) -> Result<RawDateTime> {
    let (body, utc) = match raw.strip_suffix('Z') {
        Some(body) => (body, true),
        None => (raw, false),
    };
    if body.len() != DATE_TIME_LEN || body.as_bytes()[DATE_LEN] != b'T' {
        return Err(IcalError::MalformedDate(format!(
            "{raw:?}: expected YYYYMMDDTHHMMSS[Z]"
        )));
    }
    let date = parse_date(&body[..DATE_LEN])?;
    let time_part = &body[DATE_LEN + 1..];
    if !time_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IcalError::MalformedDate(format!(
            "{raw:?}: expected HHMMSS after 'T'"
        )));
    }
    let hour: u32 = time_part[0..2].parse()?;
    let minute: u32 = time_part[2..4].parse()?;
    // RFC 5545 allows a leap second of 60; chrono only models it as 59 + 1s nanos.
    let second: u32 = time_part[4..6].parse()?;
    let time = if second == 60 {
        NaiveTime::from_hms_milli_opt(hour, minute, 59, 1_000)
    } else {
        NaiveTime::from_hms_opt(hour, minute, second)
    }
    .ok_or_else(|| IcalError::MalformedDate(format!("{raw:?}: no such time of day")))?;

    let naive = date.and_time(time);
    Ok(if utc {
        RawDateTime::Utc(naive)
    } else {
        RawDateTime::Floating(naive)
    })
}

/// Attach a location to a wall-clock time.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times that
/// do not exist (DST spring-forward gap) are rejected.
pub fn localize<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        IcalError::MalformedDate(format!("{naive} does not exist in the requested timezone"))
    })
}

/// Format a DATE value.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Format an instant as a UTC DATE-TIME (`YYYYMMDDTHHMMSSZ`).
pub fn format_date_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    dt.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format a wall-clock DATE-TIME without a `Z` suffix.
pub fn format_floating_date_time(naive: &NaiveDateTime) -> String {
    naive.format("%Y%m%dT%H%M%S").to_string()
}

// ============================================================================
// DURATION
// ============================================================================

const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const TIME_UNITS: [(char, i64); 3] = [('H', 60 * 60), ('M', 60), ('S', 1)];

/// Parse a DURATION value. Lower-case designators are accepted.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let upper = raw.to_ascii_uppercase();
    DurationParser {
        rest: &upper,
        source: raw,
    }
    .parse()
}

/// Format a duration as `PT<seconds>S` (signed when negative).
///
/// Sub-second precision is truncated toward zero.
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    if seconds < 0 {
        format!("-PT{}S", seconds.unsigned_abs())
    } else {
        format!("PT{seconds}S")
    }
}

/// Cursor over an upper-cased duration string.
struct DurationParser<'a> {
    rest: &'a str,
    source: &'a str,
}

impl DurationParser<'_> {
    fn error(&self, message: &str) -> IcalError {
        IcalError::MalformedDuration(format!("{:?}: {message}", self.source))
    }

    fn consume(&mut self, c: char) -> bool {
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    /// Read a run of ASCII digits as a non-negative count.
    fn count(&mut self) -> Result<i64> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err(self.error("expected a digit"));
        }
        let n = self.rest[..end]
            .parse::<i64>()
            .map_err(|_| self.error("count out of range"))?;
        self.rest = &self.rest[end..];
        Ok(n)
    }

    fn scaled(&self, n: i64, scale: i64) -> Result<i64> {
        n.checked_mul(scale).ok_or_else(|| self.error("duration out of range"))
    }

    fn parse(mut self) -> Result<Duration> {
        let negative = self.consume('-');
        if !negative {
            self.consume('+');
        }
        if !self.consume('P') {
            return Err(self.error("expected 'P'"));
        }
        if self.rest.is_empty() {
            return Err(self.error("empty duration"));
        }

        let mut seconds = 0i64;
        if !self.rest.starts_with('T') {
            let n = self.count()?;
            if self.consume('W') {
                seconds = self.scaled(n, SECONDS_PER_WEEK)?;
                if !self.rest.is_empty() {
                    return Err(self.error("weeks cannot be combined with other fields"));
                }
                return self.finish(seconds, negative);
            }
            if !self.consume('D') {
                return Err(self.error("expected 'D' or 'W'"));
            }
            seconds = self.scaled(n, SECONDS_PER_DAY)?;
        }

        if !self.rest.is_empty() {
            if !self.consume('T') {
                return Err(self.error("expected 'T'"));
            }
            if self.rest.is_empty() {
                return Err(self.error("expected 'H', 'M' or 'S' after 'T'"));
            }
            let mut next_unit = 0;
            while !self.rest.is_empty() {
                let n = self.count()?;
                let Some(offset) = TIME_UNITS[next_unit..]
                    .iter()
                    .position(|(unit, _)| self.rest.starts_with(*unit))
                else {
                    return Err(self.error("expected 'H', 'M' or 'S' in that order"));
                };
                let (unit, scale) = TIME_UNITS[next_unit + offset];
                self.consume(unit);
                next_unit += offset + 1;
                seconds = seconds
                    .checked_add(self.scaled(n, scale)?)
                    .ok_or_else(|| self.error("duration out of range"))?;
            }
        }

        self.finish(seconds, negative)
    }

    fn finish(&self, seconds: i64, negative: bool) -> Result<Duration> {
        let signed = if negative { -seconds } else { seconds };
        Duration::try_seconds(signed).ok_or_else(|| self.error("duration out of range"))
    }
}

// ============================================================================
// BOOLEAN
// ============================================================================

/// Parse a BOOLEAN value (`TRUE`/`FALSE`, any case).
pub fn parse_bool(raw: &str) -> Result<bool> {
    if raw.eq_ignore_ascii_case("TRUE") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("FALSE") {
        Ok(false)
    } else {
        Err(IcalError::MalformedBoolean(raw.to_string()))
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

// ============================================================================
// UTC-OFFSET
// ============================================================================

/// Parse a UTC-OFFSET value (`+HHMM` or `+HHMMSS`, sign mandatory).
///
/// `-0000` is rejected as RFC 5545 §3.3.14 requires.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let malformed = || IcalError::MalformedUtcOffset(raw.to_string());

    let (negative, digits) = if let Some(d) = raw.strip_prefix('+') {
        (false, d)
    } else if let Some(d) = raw.strip_prefix('-') {
        (true, d)
    } else {
        return Err(malformed());
    };
    if !(digits.len() == 4 || digits.len() == 6) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let hours: i32 = digits[0..2].parse()?;
    let minutes: i32 = digits[2..4].parse()?;
    let seconds: i32 = if digits.len() == 6 { digits[4..6].parse()? } else { 0 };
    if minutes > 59 || seconds > 59 {
        return Err(malformed());
    }

    let total = hours * 3600 + minutes * 60 + seconds;
    if negative && total == 0 {
        return Err(malformed());
    }
    FixedOffset::east_opt(if negative { -total } else { total }).ok_or_else(malformed)
}

pub fn format_utc_offset(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let abs = total.unsigned_abs();
    let (hours, minutes, seconds) = (abs / 3600, abs / 60 % 60, abs % 60);
    if seconds == 0 {
        format!("{sign}{hours:02}{minutes:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}{seconds:02}")
    }
}
