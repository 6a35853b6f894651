/// Property-based tests for the iCalendar codec.
///
/// Uses `proptest` to check the invariants the codec promises for every
/// input, not just hand-picked ones:
///
/// - TEXT escaping is lossless, including `,`, `;`, `\` and newlines
/// - DURATION values survive format then parse when they are whole seconds
/// - Folding never exceeds the line budget, never splits a character, and
///   unfolds back to the original logical line
/// - decode(encode(tree)) == tree for canonical trees
use chrono::Duration;
use ical_core::encoder::fold_line;
use ical_core::value::{escape_text, format_duration, parse_duration, unescape_text_list};
use ical_core::{decode, encode, Component, Property};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Text that exercises every escape, plus multi-byte characters.
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,40}",
        prop::string::string_regex("[a-z,;\\\\\n :\"]{0,30}").unwrap(),
        "\\PC{0,40}",
        Just(String::new()),
        Just("A,B\nC".to_string()),
        Just("trailing\\".to_string()),
    ]
}

/// Upper-case iana/x-name style identifier.
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("SUMMARY".to_string()),
        Just("DESCRIPTION".to_string()),
        Just("ATTENDEE".to_string()),
        "X-[A-Z]{1,10}",
    ]
}

/// A parameter value: anything except `"`, CR and LF.
fn arb_param_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9]{1,12}",
        prop::string::string_regex("[a-z:;, ]{1,12}").unwrap(),
        Just("mailto:a@example.com".to_string()),
    ]
}

fn arb_property() -> impl Strategy<Value = Property> {
    (
        arb_name(),
        prop::collection::vec(("X-[A-Z]{1,6}", prop::collection::vec(arb_param_value(), 1..3)), 0..3),
        arb_text(),
    )
        .prop_map(|(name, params, text)| {
            let mut prop = Property::new(&name);
            prop.set_text(&text);
            for (param, values) in params {
                prop.params.extend(&param, values);
            }
            prop
        })
}

fn arb_leaf(name: &'static str) -> impl Strategy<Value = Component> {
    prop::collection::vec(arb_property(), 0..6).prop_map(move |props| {
        let mut component = Component::new(name);
        for prop in props {
            component.properties.add(prop);
        }
        component
    })
}

fn arb_calendar() -> impl Strategy<Value = Component> {
    (
        arb_leaf("VCALENDAR"),
        prop::collection::vec(
            (arb_leaf("VEVENT"), prop::collection::vec(arb_leaf("VALARM"), 0..2)),
            0..4,
        ),
    )
        .prop_map(|(mut cal, events)| {
            for (mut event, alarms) in events {
                event.children = alarms;
                cal.children.push(event);
            }
            cal
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn text_escape_roundtrip(text in arb_text()) {
        let escaped = escape_text(&text);
        prop_assert!(!escaped.contains('\n'));
        prop_assert_eq!(unescape_text_list(&escaped).unwrap(), vec![text]);
    }

    #[test]
    fn duration_roundtrip(seconds in -10_000_000_000i64..10_000_000_000i64) {
        let duration = Duration::seconds(seconds);
        prop_assert_eq!(parse_duration(&format_duration(duration)).unwrap(), duration);
    }

    #[test]
    fn fold_respects_budget_and_unfolds(line in "\\PC{0,300}", max in 5usize..100) {
        let mut folded = String::new();
        fold_line(&line, max, &mut folded);

        prop_assert!(folded.ends_with("\r\n"));
        let physical: Vec<&str> = folded.split_terminator("\r\n").collect();
        for (i, part) in physical.iter().enumerate() {
            // Slicing on a &str already guarantees character boundaries.
            prop_assert!(part.len() <= max, "line {} is {} octets", i, part.len());
            if i > 0 {
                prop_assert!(part.starts_with(' '));
            }
        }

        let unfolded: String = physical
            .iter()
            .enumerate()
            .map(|(i, part)| if i == 0 { *part } else { &part[1..] })
            .collect();
        prop_assert_eq!(unfolded, line);
    }

    #[test]
    fn fold_is_stable_for_short_lines(line in "[ -~]{0,75}") {
        let mut folded = String::new();
        fold_line(&line, 75, &mut folded);
        prop_assert_eq!(folded, format!("{line}\r\n"));
    }

    #[test]
    fn tree_roundtrip(cal in arb_calendar()) {
        let encoded = encode(&cal).unwrap();
        for line in encoded.split_terminator("\r\n") {
            prop_assert!(line.len() <= 75);
        }
        prop_assert_eq!(decode(&encoded).unwrap(), cal);
    }
}
