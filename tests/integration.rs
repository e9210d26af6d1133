//! Integration tests for the roster.

use parking_lot::Mutex;
use roster::{
    FilterSpec, Gender, Record, RecordDraft, Roster, RosterConfig, RowKey, SortDirection,
    SortField, SubscriptionConfig, ViewChange, ViewEvent,
};
use std::sync::Arc;
use tempfile::TempDir;

fn test_config(dir: &TempDir) -> RosterConfig {
    RosterConfig {
        path: dir.path().join("roster"),
        ..Default::default()
    }
}

fn user(name: &str, gender: Gender, age: u8, phone: &str) -> Record {
    Record::new(
        name,
        format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "Password1",
        gender,
        age,
        vec![phone.to_string()],
    )
}

fn names(roster: &Roster) -> Vec<String> {
    roster
        .view()
        .rows
        .into_iter()
        .map(|r| r.record.name)
        .collect()
}

/// Key for the record currently at store position `index`.
fn key_at(roster: &Roster, index: usize) -> RowKey {
    RowKey {
        id: roster.store().id_at(index).unwrap(),
        original_index: index,
    }
}

// --- Realistic Workflow Tests ---

#[test]
fn test_alice_bob_workflow() {
    let dir = TempDir::new().unwrap();
    let mut roster = Roster::create(test_config(&dir)).unwrap();

    roster
        .create_or_update(user("Alice", Gender::Female, 30, "1234567890"), None)
        .unwrap();
    roster
        .create_or_update(user("bob", Gender::Male, 20, "0987654321"), None)
        .unwrap();

    roster.set_filter(FilterSpec::query("ali"));
    assert_eq!(names(&roster), vec!["Alice"]);

    roster.set_filter(FilterSpec::all());
    roster.set_sort(SortField::Age);
    assert_eq!(names(&roster), vec!["bob", "Alice"]);

    roster.set_sort(SortField::Age);
    assert_eq!(names(&roster), vec!["Alice", "bob"]);
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let mut roster = Roster::create(test_config(&dir)).unwrap();
        roster
            .create_or_update(user("Alice", Gender::Female, 30, "1234567890"), None)
            .unwrap();
        roster
            .create_or_update(user("Bob", Gender::Male, 20, "0987654321"), None)
            .unwrap();
        roster
            .create_or_update(user("Carol", Gender::Other, 40, "5555555555"), None)
            .unwrap();
        let bob = key_at(&roster, 1);
        roster.delete(bob).unwrap();
    }

    let roster = Roster::open(test_config(&dir)).unwrap();
    let records = roster.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Alice");
    assert_eq!(records[1].name, "Carol");
    assert_eq!(records[1].gender, Gender::Other);
}

#[test]
fn test_slot_file_is_plain_json_array() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    {
        let mut roster = Roster::create(config.clone()).unwrap();
        roster
            .create_or_update(user("Alice", Gender::Female, 30, "1234567890"), None)
            .unwrap();
    }

    let bytes = std::fs::read(config.path.join("users.json")).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "name": "Alice",
            "email": "alice@example.com",
            "password": "Password1",
            "gender": "female",
            "age": 30,
            "phones": ["1234567890"]
        }])
    );
}

#[test]
fn test_delete_steps_back_a_page() {
    let mut roster = Roster::in_memory(RosterConfig::default()).unwrap();
    for (i, name) in ["Anna", "Beth", "Cara", "Dina", "Emma"].iter().enumerate() {
        roster
            .create_or_update(user(name, Gender::Female, 20 + i as u8, "1234567890"), None)
            .unwrap();
    }

    roster.go_to_page(2).unwrap();
    let view = roster.view();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.page_count, 2);

    roster.delete(view.rows[0].key()).unwrap();

    let view = roster.view();
    assert_eq!(view.page_count, 1);
    assert_eq!(view.current_page, 1);
    assert_eq!(view.rows.len(), 4);
}

#[test]
fn test_delete_keeps_page_when_it_still_exists() {
    let mut roster = Roster::in_memory(RosterConfig::default()).unwrap();
    for i in 0..9 {
        let name = format!("User {}", (b'a' + i) as char);
        roster
            .create_or_update(user(&name, Gender::Male, 30, "1234567890"), None)
            .unwrap();
    }

    roster.go_to_page(2).unwrap();
    let first = key_at(&roster, 0);
    roster.delete(first).unwrap();
    assert_eq!(roster.current_page(), 2);
    assert_eq!(roster.page_count(), 2);
}

#[test]
fn test_delete_from_filtered_row() {
    let mut roster = Roster::in_memory(RosterConfig::default()).unwrap();
    roster
        .create_or_update(user("Alice", Gender::Female, 30, "1234567890"), None)
        .unwrap();
    roster
        .create_or_update(user("Bob", Gender::Male, 20, "0987654321"), None)
        .unwrap();
    roster
        .create_or_update(user("Carol", Gender::Female, 40, "5555555555"), None)
        .unwrap();

    roster.set_filter(FilterSpec::all().with_gender(Gender::Female));
    let view = roster.view();
    let carol = view
        .rows
        .iter()
        .find(|r| r.record.name == "Carol")
        .unwrap();
    assert_eq!(carol.original_index, 2);

    let removed = roster.delete(carol.key()).unwrap();
    assert_eq!(removed.name, "Carol");
    assert_eq!(names(&roster), vec!["Alice"]);
    assert_eq!(roster.store().len(), 2);
}

#[test]
fn test_edit_survives_unrelated_delete() {
    let mut roster = Roster::in_memory(RosterConfig::default()).unwrap();
    roster
        .create_or_update(user("Alice", Gender::Female, 30, "1234567890"), None)
        .unwrap();
    let bob = roster
        .create_or_update(user("Bob", Gender::Male, 20, "0987654321"), None)
        .unwrap();

    let bob_row = key_at(&roster, 1);
    let draft = RecordDraft::from_record(roster.begin_edit(bob_row).unwrap());
    assert_eq!(roster.editing(), Some(bob));

    // Alice goes away; Bob moves to index 0.
    let alice = key_at(&roster, 0);
    roster.delete(alice).unwrap();

    let edited = RecordDraft {
        name: "Robert".into(),
        ..draft
    }
    .validate()
    .unwrap();
    assert_eq!(roster.submit(edited).unwrap(), bob);
    assert!(roster.editing().is_none());

    let records = roster.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Robert");
}

#[test]
fn test_submit_without_edit_creates() {
    let mut roster = Roster::in_memory(RosterConfig::default()).unwrap();
    roster
        .submit(user("Alice", Gender::Female, 30, "1234567890"))
        .unwrap();
    let alice = key_at(&roster, 0);
    roster.begin_edit(alice).unwrap();
    roster.cancel_edit();
    roster
        .submit(user("Bob", Gender::Male, 20, "0987654321"))
        .unwrap();

    assert_eq!(roster.store().len(), 2);
}

#[test]
fn test_sort_toggles_independently_per_field() {
    let mut roster = Roster::in_memory(RosterConfig::default()).unwrap();
    roster
        .create_or_update(user("Bob", Gender::Male, 20, "0987654321"), None)
        .unwrap();
    roster
        .create_or_update(user("alice", Gender::Female, 30, "1234567890"), None)
        .unwrap();

    assert_eq!(roster.set_sort(SortField::Name), SortDirection::Asc);
    assert_eq!(names(&roster), vec!["alice", "Bob"]);

    assert_eq!(roster.set_sort(SortField::Email), SortDirection::Asc);
    assert_eq!(roster.set_sort(SortField::Name), SortDirection::Desc);
    assert_eq!(names(&roster), vec!["Bob", "alice"]);

    // Filtering resets the order but not the toggles.
    roster.set_filter(FilterSpec::all());
    assert_eq!(names(&roster), vec!["Bob", "alice"]);
    assert_eq!(roster.set_sort(SortField::Name), SortDirection::Asc);
    assert_eq!(roster.set_sort(SortField::Email), SortDirection::Desc);
}

#[test]
fn test_paging_through_results() {
    let mut roster = Roster::in_memory(RosterConfig {
        page_size: 3,
        ..Default::default()
    })
    .unwrap();
    for i in 0..7u8 {
        let name = format!("Person {}", (b'a' + i) as char);
        roster
            .create_or_update(user(&name, Gender::Other, 10 + i, "1234567890"), None)
            .unwrap();
    }

    assert_eq!(roster.page_count(), 3);
    let mut seen = Vec::new();
    for page in 1..=roster.page_count() {
        roster.go_to_page(page).unwrap();
        seen.extend(roster.view().rows.into_iter().map(|r| r.original_index));
    }
    assert_eq!(seen, (0..7).collect::<Vec<_>>());
}

// --- Subscription Tests ---

#[test]
fn test_view_callbacks_fire_on_every_command() {
    let mut roster = Roster::in_memory(RosterConfig::default()).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        roster.on_view_changed(move |change, snapshot| {
            seen.lock()
                .push((change, snapshot.rows.len(), snapshot.page_count, snapshot.current_page));
        });
    }

    roster
        .create_or_update(user("Alice", Gender::Female, 30, "1234567890"), None)
        .unwrap();
    let alice = key_at(&roster, 0);
    roster
        .create_or_update(user("Alicia", Gender::Female, 31, "1234567890"), Some(alice))
        .unwrap();
    roster.set_filter(FilterSpec::query("zzz"));
    roster.set_sort(SortField::Age);
    roster.go_to_page(1).unwrap();
    let alicia = key_at(&roster, 0);
    roster.delete(alicia).unwrap();

    assert_eq!(
        *seen.lock(),
        vec![
            (ViewChange::Created, 1, 1, 1),
            (ViewChange::Updated, 1, 1, 1),
            (ViewChange::Filtered, 0, 0, 1),
            (ViewChange::Sorted, 0, 0, 1),
            (ViewChange::Paged, 0, 0, 1),
            (ViewChange::Deleted, 0, 0, 1),
        ]
    );
}

#[test]
fn test_channel_subscription() {
    let mut roster = Roster::in_memory(RosterConfig::default()).unwrap();
    let handle = roster.subscribe(SubscriptionConfig::changes(vec![ViewChange::Created]));

    roster
        .create_or_update(user("Alice", Gender::Female, 30, "1234567890"), None)
        .unwrap();
    roster.set_filter(FilterSpec::query("ali"));

    let events = handle.drain();
    assert_eq!(events.len(), 1);
    match &events[0] {
        ViewEvent::Changed { change, snapshot } => {
            assert_eq!(*change, ViewChange::Created);
            assert_eq!(snapshot.rows[0].record.name, "Alice");
            assert_eq!(snapshot.total_matches, 1);
        }
        other => panic!("Expected Changed event, got {:?}", other),
    }

    roster.unsubscribe(handle.id);
    roster.set_filter(FilterSpec::all());
    assert!(matches!(handle.try_recv(), Ok(ViewEvent::Dropped { .. })));
}
