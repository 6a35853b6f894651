use chrono::{NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use ical_core::{
    Component, Frequency, IcalError, Property, RecurUntil, RecurrenceDate, RecurrenceRule,
    WeekdayNum,
};

fn rule(raw: &str) -> RecurrenceRule {
    raw.parse().unwrap_or_else(|e| panic!("{raw}: {e}"))
}

fn assert_malformed(raw: &str) {
    assert!(
        matches!(raw.parse::<RecurrenceRule>(), Err(IcalError::MalformedRecurrence(_))),
        "{raw} should be rejected"
    );
}

// ============================================================================
// RRULE descriptor
// ============================================================================

#[test]
fn parse_yearly_by_day_by_month() {
    let r = rule("FREQ=YEARLY;BYDAY=3SU;BYMONTH=3");
    assert_eq!(r.freq, Frequency::Yearly);
    assert_eq!(r.by_day, [WeekdayNum::nth(3, Weekday::Sun)]);
    assert_eq!(r.by_month, [3]);
    assert_eq!(r.to_string(), "FREQ=YEARLY;BYDAY=3SU;BYMONTH=3");
}

#[test]
fn parse_all_rule_parts() {
    let r = rule(
        "freq=monthly;interval=2;count=10;byday=MO,-1FR;bymonthday=1,-1;byhour=9;\
         byminute=0,30;bysecond=0;byyearday=100;byweekno=-1;bysetpos=-1;wkst=SU",
    );
    assert_eq!(r.freq, Frequency::Monthly);
    assert_eq!(r.interval, Some(2));
    assert_eq!(r.count, Some(10));
    assert_eq!(
        r.by_day,
        [WeekdayNum::every(Weekday::Mon), WeekdayNum::nth(-1, Weekday::Fri)]
    );
    assert_eq!(r.by_month_day, [1, -1]);
    assert_eq!(r.by_minute, [0, 30]);
    assert_eq!(r.week_start, Some(Weekday::Sun));
    assert_eq!(
        r.to_string(),
        "FREQ=MONTHLY;INTERVAL=2;COUNT=10;BYSECOND=0;BYMINUTE=0,30;BYHOUR=9;BYDAY=MO,-1FR;\
         BYMONTHDAY=1,-1;BYYEARDAY=100;BYWEEKNO=-1;BYSETPOS=-1;WKST=SU"
    );
}

#[test]
fn parse_until_forms() {
    assert_eq!(
        rule("FREQ=DAILY;UNTIL=19971224").until,
        Some(RecurUntil::Date(NaiveDate::from_ymd_opt(1997, 12, 24).unwrap()))
    );
    assert_eq!(
        rule("FREQ=DAILY;UNTIL=19971224T000000Z").until,
        Some(RecurUntil::Utc(Utc.with_ymd_and_hms(1997, 12, 24, 0, 0, 0).unwrap()))
    );
    assert!(matches!(
        rule("FREQ=DAILY;UNTIL=19971224T000000").until,
        Some(RecurUntil::Floating(_))
    ));
    assert_eq!(
        rule("FREQ=DAILY;UNTIL=19971224T000000Z").to_string(),
        "FREQ=DAILY;UNTIL=19971224T000000Z"
    );
}

#[test]
fn rejects_malformed_rules() {
    for raw in [
        "",
        "INTERVAL=2",
        "FREQ=FORTNIGHTLY",
        "FREQ=DAILY;FREQ=WEEKLY",
        "FREQ=DAILY;COUNT=3;UNTIL=19971224",
        "FREQ=DAILY;INTERVAL=0",
        "FREQ=DAILY;COUNT=-1",
        "FREQ=DAILY;BYMONTH=13",
        "FREQ=DAILY;BYMONTHDAY=0",
        "FREQ=DAILY;BYDAY=XX",
        "FREQ=DAILY;BYDAY=0MO",
        "FREQ=DAILY;BYHOUR=24",
        "FREQ=DAILY;X-NAME=1",
        "FREQ=DAILY;COUNT",
    ] {
        assert_malformed(raw);
    }
}

#[test]
fn rule_property_accessors() {
    let mut event = Component::event();
    assert_eq!(event.properties.recurrence_rule().unwrap(), None);

    let mut r = RecurrenceRule::new(Frequency::Weekly);
    r.count = Some(4);
    event.properties.set_recurrence_rule(Some(&r));
    assert_eq!(event.properties.get("RRULE").unwrap().value, "FREQ=WEEKLY;COUNT=4");
    assert_eq!(event.properties.recurrence_rule().unwrap(), Some(r));

    event.properties.set_recurrence_rule(None);
    assert!(!event.properties.contains("RRULE"));
}

// ============================================================================
// Recurrence-set request
// ============================================================================

#[test]
fn non_recurring_component_has_no_set() {
    let mut event = Component::event();
    event
        .properties
        .add(Property::with_value("DTSTART", "20230101T100000Z"));
    assert_eq!(event.recurrence_set(None).unwrap(), None);
}

#[test]
fn recurrence_set_gathers_all_parts() {
    let mut event = Component::event();
    let mut start = Property::with_value("DTSTART", "20230102T090000");
    start.params.set("TZID", "Europe/Paris");
    event.properties.add(start);
    event
        .properties
        .add(Property::with_value("RRULE", "FREQ=DAILY;COUNT=5"));
    event
        .properties
        .add(Property::with_value("RDATE", "20230110T080000Z"));
    let mut periods = Property::with_value("RDATE", "20230111T080000Z/PT1H");
    periods.params.set("VALUE", "PERIOD");
    event.properties.add(periods);
    event
        .properties
        .add(Property::with_value("EXDATE", "20230103T080000Z,20230104T080000Z"));

    let set = event.recurrence_set(None).unwrap().unwrap();
    assert_eq!(set.start.timezone(), Tz::Europe__Paris);
    assert_eq!(set.start, Utc.with_ymd_and_hms(2023, 1, 2, 8, 0, 0).unwrap());
    assert_eq!(set.rule.as_ref().map(|r| r.count), Some(Some(5)));
    assert_eq!(set.recurrence_dates.len(), 2);
    assert!(matches!(set.recurrence_dates[0], RecurrenceDate::Instant(_)));
    assert!(matches!(set.recurrence_dates[1], RecurrenceDate::Period(_)));
    assert_eq!(
        set.recurrence_dates[1].start(),
        Utc.with_ymd_and_hms(2023, 1, 11, 8, 0, 0).unwrap()
    );
    assert_eq!(set.exception_dates.len(), 2);
}

#[test]
fn rdate_alone_makes_a_set() {
    let mut event = Component::event();
    event
        .properties
        .add(Property::with_value("DTSTART", "20230101T100000Z"));
    event
        .properties
        .add(Property::with_value("RDATE", "20230201T100000Z"));
    let set = event.recurrence_set(None).unwrap().unwrap();
    assert!(set.rule.is_none());
    assert_eq!(set.recurrence_dates.len(), 1);
}

#[test]
fn recurrence_without_start_is_malformed() {
    let mut event = Component::event();
    event
        .properties
        .add(Property::with_value("RRULE", "FREQ=DAILY"));
    assert!(matches!(
        event.recurrence_set(None),
        Err(IcalError::MalformedComponent(_))
    ));
}
