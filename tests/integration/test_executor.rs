//! End-to-end submit tests: text in, stored entities out.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use tether::{
    ClassifierChain, CommandInterpreter, Contact, HeuristicClassifier, Intent, MemoryEntityStore,
    Priority, TetherError,
};

/// 2024-01-10 is a Wednesday.
fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 10)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn catalog() -> Vec<Contact> {
    vec![
        Contact::with_id("c1", "Sarah Johnson").with_company("Acme Corp"),
        Contact::with_id("c2", "Mike Chen").with_company("StartupXYZ"),
    ]
}

fn interpreter(store: Arc<MemoryEntityStore>) -> CommandInterpreter {
    let chain =
        ClassifierChain::new().push(Arc::new(HeuristicClassifier::with_reference(reference())));
    CommandInterpreter::with_chain(store, chain)
}

#[tokio::test]
async fn task_submission_creates_a_task() {
    let store = Arc::new(MemoryEntityStore::new());
    let result = interpreter(store.clone())
        .submit("Follow up with Sarah next Tuesday", &catalog(), Some("work"))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.entity_kind, Intent::Task);
    assert!(result.message.contains("Task created: \"Sarah next Tuesday\""));

    let tasks = store.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].scope_id, "work");
    assert_eq!(tasks[0].contact_id.as_deref(), Some("c1"));
    assert_eq!(tasks[0].priority, Priority::Medium);
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].due.unwrap().date().weekday(), Weekday::Tue);
}

#[tokio::test]
async fn event_submission_creates_event_and_links() {
    let store = Arc::new(MemoryEntityStore::new());
    let result = interpreter(store.clone())
        .submit(
            "Meeting with Sarah tomorrow at 10am",
            &catalog(),
            Some("work"),
        )
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.entity_kind, Intent::Event);
    assert!(result.created_id.is_some());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("Linked to 1 contact(s)")));

    let events = store.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start.hour(), 10);
    assert_eq!(events[0].end.unwrap().hour(), 11);
    assert_eq!(
        events[0].start.date(),
        NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()
    );

    let links = store.event_contacts().await;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].event_id, events[0].id);
    assert_eq!(links[0].contact_id, "c1");
    assert_eq!(links[0].role.as_deref(), Some("attendee"));
}

#[tokio::test]
async fn all_day_event_gets_the_nine_oclock_default() {
    let store = Arc::new(MemoryEntityStore::new());
    interpreter(store.clone())
        .submit("schedule review tomorrow", &catalog(), Some("work"))
        .await
        .unwrap();

    let events = store.events().await;
    assert_eq!(events[0].start.hour(), 9);
    assert_eq!(events[0].end.unwrap().hour(), 10);
}

#[tokio::test]
async fn ambiguous_text_lands_as_a_note_with_raw_body() {
    let store = Arc::new(MemoryEntityStore::new());
    let result = interpreter(store.clone())
        .submit("Georgetown trip March 20-22", &catalog(), Some("personal"))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.entity_kind, Intent::Note);

    let notes = store.notes().await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].body.as_deref(), Some("Georgetown trip March 20-22"));
    assert_eq!(
        notes[0].date_ref.unwrap().date(),
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    );
}

#[tokio::test]
async fn missing_scope_refuses_execution() {
    let store = Arc::new(MemoryEntityStore::new());
    let err = interpreter(store.clone())
        .submit("call Sarah tomorrow", &catalog(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, TetherError::NoScope));
    assert!(store.tasks().await.is_empty());
}

#[tokio::test]
async fn duplicate_submissions_create_duplicate_entities() {
    // Executor idempotence is explicitly not guaranteed: two submissions
    // of the same text are two independent writes.
    let store = Arc::new(MemoryEntityStore::new());
    let interpreter = interpreter(store.clone());

    interpreter
        .submit("Follow up with Sarah next Tuesday", &catalog(), Some("work"))
        .await
        .unwrap();
    interpreter
        .submit("Follow up with Sarah next Tuesday", &catalog(), Some("work"))
        .await
        .unwrap();

    assert_eq!(store.tasks().await.len(), 2);
}

#[tokio::test]
async fn parse_warnings_survive_into_the_result() {
    let store = Arc::new(MemoryEntityStore::new());
    let result = interpreter(store)
        .submit("Call Tim about the deal", &catalog(), Some("work"))
        .await
        .unwrap();

    assert!(result
        .warnings
        .iter()
        .any(|w| w == "No date specified, defaulting to today"));
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("Unresolved contacts: Tim")));
}
