//! Property value types (RFC 5545 §3.3) and the default-type table.
//!
//! Every property has an effective value type: the explicit `VALUE` parameter
//! if present, otherwise the default registered for its name below. Typed
//! accessors compare against the effective type before decoding anything.

use crate::names::*;
use std::fmt;
use std::str::FromStr;

/// The value type of a property, as named by the `VALUE` parameter.
///
/// Names not defined by RFC 5545 (e.g. `X-` experimental types) are kept in
/// [`ValueType::Other`] so they never silently match a typed accessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Binary,
    Boolean,
    CalAddress,
    Date,
    DateTime,
    Duration,
    Float,
    Integer,
    Period,
    Recur,
    Text,
    Time,
    Uri,
    UtcOffset,
    Other(String),
}

impl ValueType {
    /// The canonical upper-case name used in the `VALUE` parameter.
    pub fn as_str(&self) -> &str {
        match self {
            ValueType::Binary => "BINARY",
            ValueType::Boolean => "BOOLEAN",
            ValueType::CalAddress => "CAL-ADDRESS",
            ValueType::Date => "DATE",
            ValueType::DateTime => "DATE-TIME",
            ValueType::Duration => "DURATION",
            ValueType::Float => "FLOAT",
            ValueType::Integer => "INTEGER",
            ValueType::Period => "PERIOD",
            ValueType::Recur => "RECUR",
            ValueType::Text => "TEXT",
            ValueType::Time => "TIME",
            ValueType::Uri => "URI",
            ValueType::UtcOffset => "UTC-OFFSET",
            ValueType::Other(name) => name,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Ok(match upper.as_str() {
            "BINARY" => ValueType::Binary,
            "BOOLEAN" => ValueType::Boolean,
            "CAL-ADDRESS" => ValueType::CalAddress,
            "DATE" => ValueType::Date,
            "DATE-TIME" => ValueType::DateTime,
            "DURATION" => ValueType::Duration,
            "FLOAT" => ValueType::Float,
            "INTEGER" => ValueType::Integer,
            "PERIOD" => ValueType::Period,
            "RECUR" => ValueType::Recur,
            "TEXT" => ValueType::Text,
            "TIME" => ValueType::Time,
            "URI" => ValueType::Uri,
            "UTC-OFFSET" => ValueType::UtcOffset,
            _ => ValueType::Other(upper),
        })
    }
}

/// Default value type for a property name (upper-case), if RFC 5545 defines one.
///
/// Several properties accept an alternative type through `VALUE` (noted
/// inline); the table only records the default.
pub fn default_value_type(property: &str) -> Option<ValueType> {
    let t = match property {
        PROP_CALENDAR_SCALE | PROP_METHOD | PROP_PRODUCT_ID | PROP_VERSION => ValueType::Text,
        PROP_ATTACH => ValueType::Uri, // or BINARY
        PROP_CATEGORIES | PROP_CLASS | PROP_COMMENT | PROP_DESCRIPTION => ValueType::Text,
        PROP_GEO => ValueType::Float,
        PROP_LOCATION => ValueType::Text,
        PROP_PERCENT_COMPLETE | PROP_PRIORITY => ValueType::Integer,
        PROP_RESOURCES | PROP_STATUS | PROP_SUMMARY => ValueType::Text,
        PROP_COMPLETED => ValueType::DateTime,
        PROP_DATE_TIME_END | PROP_DUE | PROP_DATE_TIME_START => ValueType::DateTime, // or DATE
        PROP_DURATION => ValueType::Duration,
        PROP_FREE_BUSY => ValueType::Period,
        PROP_TRANSPARENCY | PROP_TIMEZONE_ID | PROP_TIMEZONE_NAME => ValueType::Text,
        PROP_TIMEZONE_OFFSET_FROM | PROP_TIMEZONE_OFFSET_TO => ValueType::UtcOffset,
        PROP_TIMEZONE_URL => ValueType::Uri,
        PROP_ATTENDEE | PROP_ORGANIZER => ValueType::CalAddress,
        PROP_CONTACT => ValueType::Text,
        PROP_RECURRENCE_ID => ValueType::DateTime, // or DATE
        PROP_RELATED_TO => ValueType::Text,
        PROP_URL => ValueType::Uri,
        PROP_UID => ValueType::Text,
        PROP_EXCEPTION_DATES => ValueType::DateTime, // or DATE
        PROP_RECURRENCE_DATES => ValueType::DateTime, // or DATE, PERIOD
        PROP_RECURRENCE_RULE => ValueType::Recur,
        PROP_ACTION => ValueType::Text,
        PROP_REPEAT => ValueType::Integer,
        PROP_TRIGGER => ValueType::Duration, // or DATE-TIME
        PROP_CREATED | PROP_DATE_TIME_STAMP | PROP_LAST_MODIFIED => ValueType::DateTime,
        PROP_SEQUENCE => ValueType::Integer,
        PROP_REQUEST_STATUS => ValueType::Text,
        _ => return None,
    };
    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_names_are_case_insensitive() {
        assert_eq!("date-time".parse::<ValueType>().unwrap(), ValueType::DateTime);
        assert_eq!("UTC-OFFSET".parse::<ValueType>().unwrap(), ValueType::UtcOffset);
    }

    #[test]
    fn unknown_value_type_is_kept_verbatim() {
        let t: ValueType = "x-custom".parse().unwrap();
        assert_eq!(t, ValueType::Other("X-CUSTOM".to_string()));
        assert_eq!(t.to_string(), "X-CUSTOM");
    }

    #[test]
    fn default_table_lookups() {
        assert_eq!(default_value_type("DTSTART"), Some(ValueType::DateTime));
        assert_eq!(default_value_type("RRULE"), Some(ValueType::Recur));
        assert_eq!(default_value_type("ATTENDEE"), Some(ValueType::CalAddress));
        assert_eq!(default_value_type("X-WR-CALNAME"), None);
    }
}
