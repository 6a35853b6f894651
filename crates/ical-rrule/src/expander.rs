//! Recurrence-set expansion -- turns a [`RecurrenceSet`] request into concrete instants.
//!
//! The request is rendered back into RFC 5545 text (`DTSTART`, `RRULE`, `RDATE`,
//! `EXDATE`) and handed to the `rrule` crate (v0.13), which owns the actual
//! recurrence arithmetic and DST handling through `chrono-tz`.

use crate::error::{RecurError, Result};
use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use ical_core::value::format_floating_date_time;
use ical_core::{Event, RecurUntil, RecurrenceDate, RecurrenceSet};
use rrule::RRuleSet;

/// A single occurrence with start and end times.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Render `set` as the text block the `rrule` crate parses.
///
/// Every instant is written as local time with the start's `TZID`, so
/// exception dates compare equal to the generated occurrences. `UNTIL` is
/// always written in UTC.
pub fn rrule_text(set: &RecurrenceSet) -> String {
    let tz = set.start.timezone();
    let local = |dt: &DateTime<Tz>| format_floating_date_time(&dt.with_timezone(&tz).naive_local());

    let mut text = format!("DTSTART;TZID={}:{}", tz.name(), local(&set.start));

    if let Some(rule) = &set.rule {
        let mut rule = rule.clone();
        let until = rule.until.take();
        text.push_str(&format!("\nRRULE:{rule}"));
        if let Some(until) = until {
            text.push_str(&format!(";UNTIL={}", until_text(&until, tz)));
        }
    }

    let mut rdates: Vec<String> = set
        .recurrence_dates
        .iter()
        .map(|rdate| local(&rdate.start()))
        .collect();
    if set.rule.is_none() {
        rdates.insert(0, local(&set.start));
    }
    if !rdates.is_empty() {
        text.push_str(&format!("\nRDATE;TZID={}:{}", tz.name(), rdates.join(",")));
    }

    if !set.exception_dates.is_empty() {
        let exdates: Vec<String> = set.exception_dates.iter().map(local).collect();
        text.push_str(&format!("\nEXDATE;TZID={}:{}", tz.name(), exdates.join(",")));
    }

    text
}

/// `UNTIL` as a UTC date-time, the only form the evaluator accepts for a
/// zoned start. Floating and DATE bounds are read in the start's location.
fn until_text(until: &RecurUntil, tz: Tz) -> String {
    let utc = match until {
        RecurUntil::Utc(dt) => *dt,
        RecurUntil::Floating(naive) => local_to_utc(*naive, tz),
        // A DATE bound includes the whole day.
        RecurUntil::Date(date) => local_to_utc(
            date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)),
            tz,
        ),
    };
    format!("{}Z", format_floating_date_time(&utc.naive_utc()))
}

/// Earliest instant for a wall-clock time in `tz`. A time skipped by a DST
/// jump moves forward by the usual one-hour gap.
fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            naive
                .checked_add_signed(Duration::hours(1))
                .and_then(|later| tz.from_local_datetime(&later).earliest())
        })
        .map_or_else(|| Utc.from_utc_datetime(&naive), |dt| dt.with_timezone(&Utc))
}

/// Parse the request into an `rrule` recurrence set.
///
/// # Errors
/// Returns `RecurError::InvalidRule` when the evaluator rejects the rule, for
/// example `BYWEEKNO` outside a yearly rule.
pub fn build_rrule_set(set: &RecurrenceSet) -> Result<RRuleSet> {
    let text = rrule_text(set);
    tracing::debug!(%text, "building recurrence set");
    text.parse::<RRuleSet>()
        .map_err(|e| RecurError::InvalidRule(format!("{e}")))
}

/// Expand `set` into at most `limit` occurrence starts, in UTC.
///
/// Exception dates are removed after the limit is applied by the evaluator,
/// so the expansion asks for `limit` plus one per exception date and then
/// truncates.
#[tracing::instrument(skip(set), fields(start = %set.start))]
pub fn expand(set: &RecurrenceSet, limit: u16) -> Result<Vec<DateTime<Utc>>> {
    // Short-circuit: caller explicitly wants zero instances.
    if limit == 0 {
        return Ok(Vec::new());
    }

    let rrule_set = build_rrule_set(set)?;
    let exdate_buffer = u16::try_from(set.exception_dates.len()).unwrap_or(u16::MAX);
    let result = rrule_set.all(limit.saturating_add(exdate_buffer));
    if result.limited {
        tracing::debug!(limit, "expansion stopped at limit");
    }

    let mut starts: Vec<DateTime<Utc>> = result
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc))
        .collect();
    starts.truncate(usize::from(limit));
    Ok(starts)
}

/// Expand an event into occurrences with start and end times.
///
/// Each occurrence lasts as long as the event itself (see [`Event::end`]),
/// except occurrences that come from a `PERIOD` recurrence date, which keep
/// the period's own length. A non-recurring event yields its single
/// occurrence; an event without `DTSTART` yields none.
pub fn expand_event(event: &Event<'_>, loc: Option<Tz>, limit: u16) -> Result<Vec<Occurrence>> {
    let (Some(start), Some(end)) = (event.start(loc)?, event.end(loc)?) else {
        return Ok(Vec::new());
    };
    let length = end.signed_duration_since(start);

    let Some(set) = event.recurrence_set(loc)? else {
        if limit == 0 {
            return Ok(Vec::new());
        }
        return Ok(vec![Occurrence {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        }]);
    };

    let periods: Vec<(DateTime<Utc>, Duration)> = set
        .recurrence_dates
        .iter()
        .filter_map(|rdate| match rdate {
            RecurrenceDate::Period(period) => {
                Some((period.start.with_timezone(&Utc), period.duration()))
            }
            RecurrenceDate::Instant(_) => None,
        })
        .collect();

    expand(&set, limit)?
        .into_iter()
        .map(|start| {
            let length = periods
                .iter()
                .find(|(period_start, _)| *period_start == start)
                .map_or(length, |(_, duration)| *duration);
            let end = start.checked_add_signed(length).ok_or_else(|| {
                RecurError::Expansion(format!("occurrence at {start} ends out of range"))
            })?;
            Ok(Occurrence { start, end })
        })
        .collect()
}
