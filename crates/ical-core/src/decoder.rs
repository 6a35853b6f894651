//! iCalendar decoder: byte stream to component tree.
//!
//! Decoding runs in three stages over a `BufRead`:
//!
//! 1. **Unfolding**: physical lines (CRLF or bare LF) are joined with every
//!    following line that starts with a single space or tab. Joining works on
//!    bytes, so a fold in the middle of a UTF-8 sequence still reassembles;
//!    the finished logical line must be valid UTF-8.
//! 2. **Content-line parsing**: see [`crate::content_line`].
//! 3. **Tree assembly**: `BEGIN:<X>` opens a nested body that the matching
//!    `END:<X>` closes. Within a body every property comes before the first
//!    child unless [`DecoderOptions::allow_interleaved_properties`] is set.
//!
//! Decoding stops at the first error and never returns a partial tree.

use crate::component::Component;
use crate::content_line::parse_content_line;
use crate::error::{IcalError, Result};
use crate::names::COMP_CALENDAR;
use crate::property::Property;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

const BEGIN: &str = "BEGIN";
const END: &str = "END";

/// Deepest `BEGIN` nesting accepted before the input is rejected.
const MAX_NESTING: usize = 64;

/// Decoder leniency switches. Everything is strict by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Accept a property that appears after a child component and add it to
    /// the enclosing component.
    pub allow_interleaved_properties: bool,
    /// Keep a `"` inside a bare (unquoted) parameter value verbatim instead of
    /// rejecting the line.
    pub lenient_param_quoting: bool,
}

/// Streaming decoder. Each call to [`Decoder::decode`] reads one `VCALENDAR`.
pub struct Decoder<R> {
    reader: R,
    options: DecoderOptions,
    line_no: usize,
    failed: bool,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Self {
            reader,
            options,
            line_no: 0,
            failed: false,
        }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decode the next calendar, or `Ok(None)` once the stream is exhausted.
    #[tracing::instrument(skip(self), fields(start_line = self.line_no))]
    pub fn decode(&mut self) -> Result<Option<Component>> {
        let result = self.decode_calendar();
        if let Err(ref err) = result {
            self.failed = true;
            tracing::warn!(line = self.line_no, error = %err, "decoding failed");
        }
        result
    }

    fn decode_calendar(&mut self) -> Result<Option<Component>> {
        let Some(first) = self.next_property()? else {
            return Ok(None);
        };
        if first.name != BEGIN {
            return Err(IcalError::MalformedComponent(format!(
                "line {}: expected BEGIN, got {}",
                self.line_no, first.name
            )));
        }
        if !first.value.eq_ignore_ascii_case(COMP_CALENDAR) {
            return Err(IcalError::InvalidTopLevelComponent(first.value));
        }
        self.decode_body(&first.value, 1).map(Some)
    }

    /// Read properties and children until the `END` matching `name`.
    fn decode_body(&mut self, name: &str, depth: usize) -> Result<Component> {
        if name.is_empty() {
            return Err(IcalError::MalformedComponent(format!(
                "line {}: BEGIN without a component name",
                self.line_no
            )));
        }
        if depth > MAX_NESTING {
            return Err(IcalError::MalformedComponent(format!(
                "line {}: components nested deeper than {MAX_NESTING}",
                self.line_no
            )));
        }

        let mut component = Component::new(name);
        tracing::debug!(component = %component.name, depth, "open component");

        loop {
            let prop = self.next_property()?.ok_or_else(|| {
                IcalError::UnexpectedEndOfInput(format!("missing END:{}", component.name))
            })?;

            match prop.name.as_str() {
                BEGIN => {
                    let child = self.decode_body(&prop.value, depth + 1)?;
                    component.children.push(child);
                }
                END => {
                    if !prop.value.eq_ignore_ascii_case(&component.name) {
                        return Err(IcalError::MalformedComponent(format!(
                            "line {}: END:{} does not close BEGIN:{}",
                            self.line_no, prop.value, component.name
                        )));
                    }
                    tracing::debug!(
                        component = %component.name,
                        properties = component.properties.len(),
                        children = component.children.len(),
                        "close component"
                    );
                    return Ok(component);
                }
                _ => {
                    if !component.children.is_empty() && !self.options.allow_interleaved_properties
                    {
                        return Err(IcalError::MalformedComponent(format!(
                            "line {}: {} appears after a child of {}",
                            self.line_no, prop.name, component.name
                        )));
                    }
                    component.properties.add(prop);
                }
            }
        }
    }

    fn next_property(&mut self) -> Result<Option<Property>> {
        match self.next_line()? {
            Some(line) => parse_content_line(&line, &self.options).map(Some),
            None => Ok(None),
        }
    }

    /// Next non-empty logical line.
    fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            let Some(mut line) = self.read_physical()? else {
                return Ok(None);
            };
            while matches!(self.reader.fill_buf()?.first(), Some(b' ' | b'\t')) {
                self.reader.consume(1);
                if let Some(rest) = self.read_physical()? {
                    line.extend_from_slice(&rest);
                }
            }
            if line.is_empty() {
                continue;
            }
            if line.contains(&b'\r') {
                return Err(IcalError::MalformedLine(format!(
                    "line {}: CR not followed by LF",
                    self.line_no
                )));
            }
            let line = String::from_utf8(line)?;
            tracing::trace!(line_no = self.line_no, %line, "logical line");
            return Ok(Some(line));
        }
    }

    /// One physical line with its terminator stripped.
    fn read_physical(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        self.line_no += 1;
        Ok(Some(buf))
    }
}

impl<R: BufRead> Iterator for Decoder<R> {
    type Item = Result<Component>;

    /// Yields calendars until end of input; stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.decode().transpose()
    }
}

/// Decode exactly one calendar from a string.
///
/// Empty input is an [`IcalError::UnexpectedEndOfInput`]; anything after the
/// first calendar is ignored.
pub fn decode(input: &str) -> Result<Component> {
    Decoder::new(input.as_bytes())
        .decode()?
        .ok_or_else(|| IcalError::UnexpectedEndOfInput("no calendar in input".to_string()))
}
