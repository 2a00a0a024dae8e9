//! End-to-end parsing tests over the heuristic pipeline.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use tether::{ActionKind, CommandBuilder, ConfidenceLevel, Contact, Intent};

/// 2024-01-10 is a Wednesday.
fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 10)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn builder() -> CommandBuilder {
    CommandBuilder::with_reference(reference())
}

fn catalog() -> Vec<Contact> {
    vec![
        Contact::with_id("c1", "Sarah Johnson").with_company("Acme Corp"),
        Contact::with_id("c2", "Mike Chen").with_company("StartupXYZ"),
        Contact::with_id("c3", "Alex Parker"),
    ]
}

#[test]
fn follow_up_with_sarah_next_tuesday() {
    let command = builder().parse("Follow up with Sarah next Tuesday", &catalog(), Some("work"));

    assert_eq!(command.intent, Intent::Task);
    assert_eq!(command.action, Some(ActionKind::FollowUp));
    assert_eq!(command.contact_ids, vec!["c1".to_string()]);
    assert!(command.contact_names.is_empty());
    assert!(!command.time_specified);

    let start = command.date_start.unwrap();
    assert_eq!(start.date().weekday(), Weekday::Tue);
    assert!(start.date() > reference().date());

    assert_eq!(command.title, "Sarah next Tuesday");
}

#[test]
fn meeting_with_sarah_tomorrow_at_ten() {
    let command = builder().parse("Meeting with Sarah tomorrow at 10am", &catalog(), Some("work"));

    assert_eq!(command.intent, Intent::Event);
    assert!(command.time_specified);
    assert!(!command.all_day);

    let start = command.date_start.unwrap();
    assert_eq!(start.date(), NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
    assert_eq!((start.hour(), start.minute()), (10, 0));
}

#[test]
fn georgetown_trip_range_falls_back() {
    let command = builder().parse("Georgetown trip March 20-22", &catalog(), Some("personal"));

    // The primary grammar yields nothing here; the range fallback owns the
    // "<Month> <day>-<day>" shape.
    assert_eq!(
        command.date_start.unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
    assert_eq!(
        command.date_end.unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 22)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
    );
    assert!(command.all_day);
    assert!(!command.time_specified);

    // "Georgetown" is a candidate no contact matches: surfaced, not dropped.
    assert_eq!(command.contact_names, vec!["Georgetown".to_string()]);
    assert_eq!(command.intent, Intent::Note);
}

#[test]
fn no_date_defaults_to_today_with_warning() {
    let command = builder().parse("Email Mike about partnership", &catalog(), Some("work"));

    assert_eq!(
        command.date_start.unwrap(),
        reference().date().and_hms_opt(0, 0, 0).unwrap()
    );
    assert!(command.all_day);
    assert!(command
        .warnings
        .iter()
        .any(|w| w == "No date specified, defaulting to today"));

    // "Mike" still resolves fuzzily to Mike Chen.
    assert_eq!(command.contact_ids, vec!["c2".to_string()]);
}

#[test]
fn exact_name_never_falls_through_to_fuzzy() {
    let command = builder().parse("coffee with Sarah Johnson at noon", &catalog(), None);

    assert_eq!(command.contact_ids, vec!["c1".to_string()]);
    assert!(command.contact_names.is_empty());
    // noon is an explicit time, so this classifies as an event.
    assert_eq!(command.intent, Intent::Event);
    assert!(command.time_specified);
}

#[test]
fn unresolved_candidate_downgrades_confidence() {
    let command = builder().parse("Call Tim tomorrow at 2pm", &catalog(), Some("work"));

    assert_eq!(command.intent, Intent::Task);
    assert_eq!(command.action, Some(ActionKind::Call));
    assert_eq!(command.contact_names, vec!["Tim".to_string()]);
    assert_eq!(command.confidence, ConfidenceLevel::Medium);
    assert!(command
        .warnings
        .iter()
        .any(|w| w.contains("Unresolved contacts: Tim")));
}

#[test]
fn confidence_is_high_only_with_every_signal() {
    // Action + date + contact, nothing unresolved.
    let high = builder().parse("Follow up with Sarah Johnson tomorrow", &catalog(), None);
    assert_eq!(high.confidence, ConfidenceLevel::High);

    // No action phrase.
    let no_action = builder().parse("Sarah Johnson tomorrow", &catalog(), None);
    assert_ne!(no_action.confidence, ConfidenceLevel::High);

    // No contact.
    let no_contact = builder().parse("follow up tomorrow", &catalog(), None);
    assert_ne!(no_contact.confidence, ConfidenceLevel::High);

    // An unresolved name denies high even with everything else present.
    let unresolved = builder().parse(
        "Follow up with Sarah Johnson and Zebulon tomorrow",
        &catalog(),
        None,
    );
    assert_ne!(unresolved.confidence, ConfidenceLevel::High);
}

#[test]
fn title_falls_back_when_input_is_exactly_the_phrase() {
    let command = builder().parse("follow up", &catalog(), None);
    assert_eq!(command.title, "follow up");
    assert!(!command.title.is_empty());
}

#[test]
fn raw_text_is_preserved_verbatim() {
    let input = "  Meeting with Sarah tomorrow at 10am  ";
    let command = builder().parse(input, &catalog(), None);
    assert_eq!(command.raw_text, input.trim());
}
