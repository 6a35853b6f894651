//! iCalendar encoder: component tree to CRLF-folded text.
//!
//! Each component is written as `BEGIN:<name>`, its properties in name order
//! (instances of one name in their original order), its children
//! recursively, then `END:<name>`. Every logical line is folded to at most
//! [`EncoderOptions::max_line_length`] octets per physical line.
//!
//! [`Encoder`] renders the whole tree into memory before touching its
//! writer, so an invalid tree leaves the sink untouched.
//!
//! # Example
//! ```
//! use ical_core::{encode, Component};
//!
//! let mut cal = Component::calendar();
//! cal.properties.set_text("VERSION", "2.0");
//! assert_eq!(encode(&cal).unwrap(), "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n");
//! ```

use crate::component::Component;
use crate::content_line::write_content_line;
use crate::error::{IcalError, Result};
use crate::property::Property;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Octet limit for one physical line, excluding the CRLF (RFC 5545 §3.1).
pub const DEFAULT_MAX_LINE_LENGTH: usize = 75;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Longest physical line in octets, counting the leading space of a
    /// continuation line but not the CRLF.
    pub max_line_length: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// Writes component trees to a byte sink.
pub struct Encoder<W> {
    writer: W,
    options: EncoderOptions,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, EncoderOptions::default())
    }

    pub fn with_options(writer: W, options: EncoderOptions) -> Self {
        Self { writer, options }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encode `component` and everything below it.
    ///
    /// The text is assembled in memory first, so a failing tree writes nothing.
    #[tracing::instrument(skip_all, fields(component = %component.name))]
    pub fn encode(&mut self, component: &Component) -> Result<()> {
        let out = encode_with_options(component, &self.options)?;
        self.writer.write_all(out.as_bytes())?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Encode a component tree with the default options.
pub fn encode(component: &Component) -> Result<String> {
    encode_with_options(component, &EncoderOptions::default())
}

pub fn encode_with_options(component: &Component, options: &EncoderOptions) -> Result<String> {
    let mut out = String::new();
    let mut line = String::new();
    encode_component(component, options, &mut line, &mut out).inspect_err(|err| {
        tracing::warn!(component = %component.name, error = %err, "encoding failed");
    })?;
    Ok(out)
}

fn encode_component(
    component: &Component,
    options: &EncoderOptions,
    line: &mut String,
    out: &mut String,
) -> Result<()> {
    if component.name.is_empty() {
        return Err(IcalError::MalformedComponent(
            "component without a name".to_string(),
        ));
    }
    tracing::debug!(component = %component.name, "open component");

    emit(&Property::with_value("BEGIN", component.name.as_str()), options, line, out)?;
    for prop in component.properties.values() {
        emit(prop, options, line, out)?;
    }
    for child in &component.children {
        encode_component(child, options, line, out)?;
    }
    emit(&Property::with_value("END", component.name.as_str()), options, line, out)?;

    tracing::debug!(component = %component.name, "close component");
    Ok(())
}

fn emit(prop: &Property, options: &EncoderOptions, line: &mut String, out: &mut String) -> Result<()> {
    line.clear();
    write_content_line(prop, line)?;
    fold_line(line, options.max_line_length, out);
    Ok(())
}

/// Append `line` to `out` as one or more CRLF-terminated physical lines of at
/// most `max` octets each.
///
/// Continuation lines start with a single space, which counts toward `max`.
/// Splits only fall on UTF-8 character boundaries; a single character wider
/// than the budget still goes out whole.
pub fn fold_line(line: &str, max: usize, out: &mut String) {
    let mut rest = line;
    let mut budget = max;
    let mut first = true;

    loop {
        if !first {
            out.push(' ');
        }
        if rest.len() <= budget {
            out.push_str(rest);
            out.push_str("\r\n");
            return;
        }

        let mut end = budget;
        while end > 0 && !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }

        out.push_str(&rest[..end]);
        out.push_str("\r\n");
        rest = &rest[end..];
        if rest.is_empty() {
            return;
        }

        if first {
            first = false;
            budget = max.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(line: &str, max: usize) -> String {
        let mut out = String::new();
        fold_line(line, max, &mut out);
        out
    }

    #[test]
    fn folds_on_character_boundaries() {
        assert_eq!(
            fold("A:Ḽơᶉëᶆ ȋṕšᶙṁ", 13),
            "A:Ḽơᶉë\r\n ᶆ ȋṕš\r\n ᶙṁ\r\n"
        );
    }

    #[test]
    fn short_line_is_not_folded() {
        assert_eq!(fold("FOUR:+ eight!", 13), "FOUR:+ eight!\r\n");
    }

    #[test]
    fn continuation_keeps_original_spaces() {
        assert_eq!(
            fold("FOO:Exceeding line limit", 13),
            "FOO:Exceeding\r\n  line limit\r\n"
        );
    }

    #[test]
    fn folds_inside_parameters() {
        assert_eq!(fold("A;ENCODING=8bit:B", 13), "A;ENCODING=8b\r\n it:B\r\n");
    }

    #[test]
    fn exact_limit_stays_on_one_line() {
        let line = format!("X:{}", "a".repeat(73));
        assert_eq!(line.len(), 75);
        assert_eq!(fold(&line, 75), format!("{line}\r\n"));
    }

    #[test]
    fn one_octet_over_limit_folds() {
        let line = format!("X:{}", "a".repeat(74));
        assert_eq!(
            fold(&line, 75),
            format!("{}\r\n a\r\n", &line[..75])
        );
    }

    #[test]
    fn multibyte_character_at_limit_moves_to_next_line() {
        // 74 ASCII octets then a 2-octet character straddling the limit.
        let line = format!("X:{}é", "a".repeat(72));
        assert_eq!(line.len(), 76);
        assert_eq!(fold(&line, 75), format!("{}\r\n é\r\n", &line[..74]));
    }

    #[test]
    fn oversized_character_is_emitted_whole() {
        assert_eq!(fold("ṁṁ", 2), "ṁ\r\n ṁ\r\n");
    }

    #[test]
    fn writer_receives_encoded_bytes() {
        let mut cal = Component::calendar();
        cal.properties.set_text("PRODID", "-//x//");
        let mut encoder = Encoder::new(Vec::new());
        encoder.encode(&cal).unwrap();
        assert_eq!(
            encoder.into_inner(),
            b"BEGIN:VCALENDAR\r\nPRODID:-//x//\r\nEND:VCALENDAR\r\n"
        );
    }

    #[test]
    fn failing_tree_writes_nothing() {
        let mut cal = Component::calendar();
        cal.properties
            .add(Property::with_value("DESCRIPTION", "line\nbreak"));
        let mut encoder = Encoder::new(Vec::new());
        assert!(matches!(
            encoder.encode(&cal),
            Err(IcalError::ValueContainsControlCharacters(_))
        ));
        assert!(encoder.into_inner().is_empty());
    }
}
