mod support;

use taskflow::{
    KvSurface, MemorySurface, Persistence, TodoPatch, TodoRecord, TodoStore, DEFAULT_STORAGE_KEY,
};

const BUY_MILK: &str = r#"[{"id":1,"text":"Buy milk","completed":false}]"#;

#[test]
fn empty_slot_starts_empty_without_error() {
    let state = support::open(&MemorySurface::new());

    assert!(state.todos().is_empty());
    assert_eq!(state.error(), None);
    assert_eq!(state.persistence(), Persistence::Store);
}

#[test]
fn stored_record_is_loaded() {
    let state = support::open(&support::seeded_surface(BUY_MILK));

    assert_eq!(state.todos(), &[TodoRecord::new(1, "Buy milk")]);
    assert_eq!(state.error(), None);
}

#[test]
fn add_reaches_memory_and_storage() {
    let surface = support::seeded_surface(BUY_MILK);
    let mut state = support::open(&surface);

    state.add_todo(TodoRecord::new(2, "Walk dog"));

    assert_eq!(state.todos().len(), 2);
    let persisted = TodoStore::with_default_key(surface.clone()).load_all().unwrap();
    assert_eq!(
        persisted,
        vec![TodoRecord::new(1, "Buy milk"), TodoRecord::new(2, "Walk dog")]
    );

    // A fresh session over the same storage sees both.
    assert_eq!(support::open(&surface).todos(), persisted.as_slice());
}

#[test]
fn failing_storage_keeps_working_in_memory() {
    let surface = MemorySurface::disabled();
    let mut state = support::open(&surface);

    assert!(state.todos().is_empty());
    let message = state.error().expect("error set").to_string();
    assert!(!message.is_empty());

    state.add_todo(TodoRecord::new(2, "Walk dog"));
    assert_eq!(state.todos(), &[TodoRecord::new(2, "Walk dog")]);
    assert_eq!(state.error(), Some(message.as_str()));

    state.clear_error();
    assert_eq!(state.error(), None);
    assert_eq!(state.todos().len(), 1);
}

#[test]
fn storage_failing_after_load_records_error_without_rollback() {
    let surface = support::seeded_surface(BUY_MILK);
    let mut state = support::open(&surface);
    surface.set_disabled(true);

    state.add_todo(TodoRecord::new(2, "Walk dog"));
    state.update_todo(TodoPatch::new(1).completed(true));
    state.remove_todo(2);

    let mut expected = TodoRecord::new(1, "Buy milk");
    expected.completed = true;
    assert_eq!(state.todos(), &[expected]);
    assert!(state.error().is_some());

    // Storage still holds the state from before the outage.
    assert_eq!(surface.peek(DEFAULT_STORAGE_KEY).as_deref(), Some(BUY_MILK));
}

#[test]
fn partial_update_keeps_other_fields() {
    let surface = support::seeded_surface(BUY_MILK);
    let mut state = support::open(&surface);

    state.update_todo(TodoPatch::new(1).completed(true));

    let todo = &state.todos()[0];
    assert_eq!(todo.id, 1);
    assert!(todo.completed);
    assert_eq!(todo.text, "Buy milk");
    assert_eq!(
        surface.get_item(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
        Some(r#"[{"id":1,"text":"Buy milk","completed":true}]"#)
    );
}

#[test]
fn corrupt_slot_reports_error_and_starts_empty() {
    let surface = support::seeded_surface("[{\"id\":1,");
    let state = support::open(&surface);

    assert!(state.todos().is_empty());
    assert!(state.error().unwrap().contains(DEFAULT_STORAGE_KEY));
    assert_eq!(state.persistence(), Persistence::Store);
}
