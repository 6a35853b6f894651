use ical_core::{decode, encode, Calendar, Component, EventStatus, Property};

/// Assert that decode → encode → decode yields the same tree, and that
/// encoding that tree again is byte-stable.
fn assert_roundtrip(input: &str) -> Component {
    let tree = decode(input).expect("decode failed");
    let encoded = encode(&tree).expect("encode failed");
    let again = decode(&encoded).expect("re-decode failed");
    assert_eq!(tree, again, "tree changed through encode:\n{encoded}");
    assert_eq!(encode(&again).unwrap(), encoded);
    tree
}

const EXAMPLE: &str = concat!(
    "BEGIN:VCALENDAR\r\n",
    "PRODID:-//xyz Corp//NONSGML PDA Calendar Version 1.0//EN\r\n",
    "VERSION:2.0\r\n",
    "BEGIN:VEVENT\r\n",
    "CATEGORIES:CONFERENCE\r\n",
    "DESCRIPTION;ALTREP=\"cid:part1.0001@example.org\":Networld+Interop Conference\r\n",
    "  and Exhibit\\nAtlanta World Congress Center\\n Atlanta\\, Georgia\r\n",
    "DTEND:19960920T220000Z\r\n",
    "DTSTAMP:19960704T120000Z\r\n",
    "DTSTART:19960918T143000Z\r\n",
    "ORGANIZER:mailto:jsmith@example.com\r\n",
    "RRULE:FREQ=YEARLY;BYDAY=3SU;BYMONTH=3\r\n",
    "STATUS:CONFIRMED\r\n",
    "SUMMARY;FOO=bar,\"b:az\":Networld+Interop Conference\r\n",
    "UID:uid1@example.com\r\n",
    "END:VEVENT\r\n",
    "END:VCALENDAR\r\n",
);

// ============================================================================
// Example calendar
// ============================================================================

#[test]
fn roundtrip_example_calendar() {
    let tree = assert_roundtrip(EXAMPLE);
    let cal = Calendar::new(&tree).unwrap();
    let event = cal.events().next().unwrap();

    assert_eq!(event.uid().unwrap().as_deref(), Some("uid1@example.com"));
    assert_eq!(event.status().unwrap(), Some(EventStatus::Confirmed));
    assert_eq!(
        event.component().properties.get("DESCRIPTION").unwrap().text().unwrap(),
        "Networld+Interop Conference and Exhibit\nAtlanta World Congress Center\n Atlanta, Georgia"
    );
    assert_eq!(
        event.component().properties.get("RRULE").unwrap().value,
        "FREQ=YEARLY;BYDAY=3SU;BYMONTH=3"
    );
}

#[test]
fn example_calendar_reencodes_to_same_text() {
    // Wrap points may differ; compare unfolded text.
    let tree = decode(EXAMPLE).unwrap();
    let encoded = encode(&tree).unwrap();
    let unfolded = |s: &str| s.replace("\r\n ", "");
    assert_eq!(unfolded(&encoded), unfolded(EXAMPLE));
}

// ============================================================================
// Built trees
// ============================================================================

#[test]
fn roundtrip_built_tree() {
    let mut event = Component::event();
    event.properties.set_text("UID", "built-1");
    event.properties.set_text("SUMMARY", "Lunch; bring snacks, drinks\\cups\nand plates");
    event.set_event_status(Some(EventStatus::Tentative));
    let mut attendee = Property::with_value("ATTENDEE", "mailto:a@example.com");
    attendee.params.set("CN", "Doe, Jane");
    attendee.params.extend("MEMBER", ["mailto:team@example.com", "mailto:x@example.com"]);
    event.properties.add(attendee);
    event.properties.add(Property::with_value("X-EMPTY", ""));

    let mut cal = Component::calendar();
    cal.properties.set_text("VERSION", "2.0");
    cal.children.push(event);

    let encoded = encode(&cal).unwrap();
    assert_eq!(decode(&encoded).unwrap(), cal);
}

#[test]
fn roundtrip_unicode_across_folds() {
    let mut cal = Component::calendar();
    cal.properties
        .set_text("X-TEXT", &"Ḽơᶉëᶆ ȋṕšᶙṁ ďõḽơŗ šįţ ąṁęţ ".repeat(8));
    let encoded = encode(&cal).unwrap();
    for line in encoded.split_terminator("\r\n") {
        assert!(line.len() <= 75);
    }
    assert_eq!(decode(&encoded).unwrap(), cal);
}

#[test]
fn roundtrip_lower_case_input_canonicalizes_names() {
    let input = "begin:vcalendar\r\nx-foo;x-param=a:v\r\nend:vcalendar\r\n";
    let tree = assert_roundtrip(input);
    assert_eq!(
        encode(&tree).unwrap(),
        "BEGIN:VCALENDAR\r\nX-FOO;X-PARAM=a:v\r\nEND:VCALENDAR\r\n"
    );
}
