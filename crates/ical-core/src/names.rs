//! Well-known component, property and parameter names from RFC 5545.

/// MIME type for iCalendar data (RFC 5545 §8.1).
pub const MIME_TYPE: &str = "text/calendar";
/// Conventional file extension for iCalendar data.
pub const EXTENSION: &str = "ics";

// Components (§3.6)
pub const COMP_CALENDAR: &str = "VCALENDAR";
pub const COMP_EVENT: &str = "VEVENT";
pub const COMP_TODO: &str = "VTODO";
pub const COMP_JOURNAL: &str = "VJOURNAL";
pub const COMP_FREE_BUSY: &str = "VFREEBUSY";
pub const COMP_TIMEZONE: &str = "VTIMEZONE";
pub const COMP_ALARM: &str = "VALARM";
pub const COMP_TIMEZONE_STANDARD: &str = "STANDARD";
pub const COMP_TIMEZONE_DAYLIGHT: &str = "DAYLIGHT";

// Calendar properties (§3.7)
pub const PROP_CALENDAR_SCALE: &str = "CALSCALE";
pub const PROP_METHOD: &str = "METHOD";
pub const PROP_PRODUCT_ID: &str = "PRODID";
pub const PROP_VERSION: &str = "VERSION";

// Descriptive component properties (§3.8.1)
pub const PROP_ATTACH: &str = "ATTACH";
pub const PROP_CATEGORIES: &str = "CATEGORIES";
pub const PROP_CLASS: &str = "CLASS";
pub const PROP_COMMENT: &str = "COMMENT";
pub const PROP_DESCRIPTION: &str = "DESCRIPTION";
pub const PROP_GEO: &str = "GEO";
pub const PROP_LOCATION: &str = "LOCATION";
pub const PROP_PERCENT_COMPLETE: &str = "PERCENT-COMPLETE";
pub const PROP_PRIORITY: &str = "PRIORITY";
pub const PROP_RESOURCES: &str = "RESOURCES";
pub const PROP_STATUS: &str = "STATUS";
pub const PROP_SUMMARY: &str = "SUMMARY";

// Date and time component properties (§3.8.2)
pub const PROP_COMPLETED: &str = "COMPLETED";
pub const PROP_DATE_TIME_END: &str = "DTEND";
pub const PROP_DUE: &str = "DUE";
pub const PROP_DATE_TIME_START: &str = "DTSTART";
pub const PROP_DURATION: &str = "DURATION";
pub const PROP_FREE_BUSY: &str = "FREEBUSY";
pub const PROP_TRANSPARENCY: &str = "TRANSP";

// Time zone component properties (§3.8.3)
pub const PROP_TIMEZONE_ID: &str = "TZID";
pub const PROP_TIMEZONE_NAME: &str = "TZNAME";
pub const PROP_TIMEZONE_OFFSET_FROM: &str = "TZOFFSETFROM";
pub const PROP_TIMEZONE_OFFSET_TO: &str = "TZOFFSETTO";
pub const PROP_TIMEZONE_URL: &str = "TZURL";

// Relationship component properties (§3.8.4)
pub const PROP_ATTENDEE: &str = "ATTENDEE";
pub const PROP_CONTACT: &str = "CONTACT";
pub const PROP_ORGANIZER: &str = "ORGANIZER";
pub const PROP_RECURRENCE_ID: &str = "RECURRENCE-ID";
pub const PROP_RELATED_TO: &str = "RELATED-TO";
pub const PROP_URL: &str = "URL";
pub const PROP_UID: &str = "UID";

// Recurrence component properties (§3.8.5)
pub const PROP_EXCEPTION_DATES: &str = "EXDATE";
pub const PROP_RECURRENCE_DATES: &str = "RDATE";
pub const PROP_RECURRENCE_RULE: &str = "RRULE";

// Alarm component properties (§3.8.6)
pub const PROP_ACTION: &str = "ACTION";
pub const PROP_REPEAT: &str = "REPEAT";
pub const PROP_TRIGGER: &str = "TRIGGER";

// Change management component properties (§3.8.7)
pub const PROP_CREATED: &str = "CREATED";
pub const PROP_DATE_TIME_STAMP: &str = "DTSTAMP";
pub const PROP_LAST_MODIFIED: &str = "LAST-MODIFIED";
pub const PROP_SEQUENCE: &str = "SEQUENCE";

// Miscellaneous component properties (§3.8.8)
pub const PROP_REQUEST_STATUS: &str = "REQUEST-STATUS";

// Property parameters (§3.2)
pub const PARAM_ALT_REP: &str = "ALTREP";
pub const PARAM_COMMON_NAME: &str = "CN";
pub const PARAM_CALENDAR_USER_TYPE: &str = "CUTYPE";
pub const PARAM_DELEGATED_FROM: &str = "DELEGATED-FROM";
pub const PARAM_DELEGATED_TO: &str = "DELEGATED-TO";
pub const PARAM_DIR: &str = "DIR";
pub const PARAM_ENCODING: &str = "ENCODING";
pub const PARAM_FORMAT_TYPE: &str = "FMTTYPE";
pub const PARAM_FREE_BUSY_TYPE: &str = "FBTYPE";
pub const PARAM_LANGUAGE: &str = "LANGUAGE";
pub const PARAM_MEMBER: &str = "MEMBER";
pub const PARAM_PARTICIPATION_STATUS: &str = "PARTSTAT";
pub const PARAM_RANGE: &str = "RANGE";
pub const PARAM_RELATED: &str = "RELATED";
pub const PARAM_RELATIONSHIP_TYPE: &str = "RELTYPE";
pub const PARAM_ROLE: &str = "ROLE";
pub const PARAM_RSVP: &str = "RSVP";
pub const PARAM_SENT_BY: &str = "SENT-BY";
pub const PARAM_TIMEZONE_ID: &str = "TZID";
pub const PARAM_VALUE: &str = "VALUE";
