//! Error types for iCalendar decoding, encoding and typed value access.

use crate::types::ValueType;
use thiserror::Error;

/// Errors that can occur while decoding, encoding or interpreting iCalendar data.
///
/// Grammar and structural errors are fatal to the decode call that produced
/// them. Value errors only affect the accessor that raised them; the rest of
/// the tree stays usable.
#[derive(Error, Debug)]
pub enum IcalError {
    /// The content line has no property name or no `;`/`:` after it.
    #[error("malformed content line: {0}")]
    MalformedLine(String),

    /// A `;name=value` parameter group is missing its name or `=`.
    #[error("malformed param: {0}")]
    MalformedParam(String),

    /// A parameter value has an unterminated quote or a stray `"`.
    #[error("malformed param value: {0}")]
    MalformedParamValue(String),

    /// The `:` separating parameters from the value is missing.
    #[error("malformed property: {0}")]
    MalformedProperty(String),

    /// A typed accessor was used on a property of another value type.
    #[error("property {property:?}: expected value type {expected}, got {actual}")]
    UnexpectedValueType {
        property: String,
        expected: String,
        actual: ValueType,
    },

    #[error("malformed text: {0}")]
    MalformedText(String),

    #[error("malformed duration: {0}")]
    MalformedDuration(String),

    #[error("malformed date: {0}")]
    MalformedDate(String),

    #[error("malformed boolean: {0:?}")]
    MalformedBoolean(String),

    #[error("malformed UTC offset: {0:?}")]
    MalformedUtcOffset(String),

    #[error("malformed period: {0}")]
    MalformedPeriod(String),

    #[error("malformed recurrence rule: {0}")]
    MalformedRecurrence(String),

    /// A `TZID` parameter names a zone unknown to the IANA database.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid VEVENT STATUS: {0:?}")]
    InvalidStatus(String),

    #[error("integer parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("float parse error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("URI parse error: {0}")]
    Uri(#[from] url::ParseError),

    /// `BEGIN`/`END` nesting is broken or a property follows a child component.
    #[error("malformed component: {0}")]
    MalformedComponent(String),

    /// The stream ended inside a component.
    #[error("unexpected end of input: {0}")]
    UnexpectedEndOfInput(String),

    /// The outermost component is not `VCALENDAR`.
    #[error("invalid top-level component: expected VCALENDAR, got {0:?}")]
    InvalidTopLevelComponent(String),

    /// A property value contains CR or LF and cannot be written as one content line.
    #[error("property {0:?}: value contains a CR or LF")]
    ValueContainsControlCharacters(String),

    /// A parameter value contains `"`, which the grammar cannot express.
    #[error("param {0:?}: value contains a double-quote")]
    ParamValueContainsQuote(String),

    #[error("content line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout ical-core.
pub type Result<T> = std::result::Result<T, IcalError>;
