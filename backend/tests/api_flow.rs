use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use pawfect_backend::config::AppConfig;
use pawfect_backend::domain::FixedClock;
use pawfect_backend::error::PetCareError;
use pawfect_backend::io::PetCareApi;
use pawfect_backend::storage::{KeyValueStore, MemoryStore};
use pawfect_backend::PetCare;
use shared::{CreatePetRequest, ToggleTaskRequest};

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, min, 0).earliest().unwrap()
}

fn pet_request(name: &str, tasks: &[&str]) -> CreatePetRequest {
    CreatePetRequest {
        name: name.to_string(),
        birthday: "2020-03-14".to_string(),
        age: 4.0,
        tasks: tasks.iter().map(|t| t.to_string()).collect(),
    }
}

fn toggle(task_index: usize, completed: bool) -> ToggleTaskRequest {
    ToggleTaskRequest {
        task_index,
        completed,
    }
}

fn open_api(store: &Arc<MemoryStore>, clock: &Arc<FixedClock>) -> PetCareApi<MemoryStore> {
    PetCareApi::open(Arc::clone(store), &AppConfig::default(), clock.clone()).unwrap()
}

#[test]
fn toggling_a_task_records_todays_summary() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(local(2024, 6, 2, 10, 0)));
    let api = open_api(&store, &clock);

    api.add_pet(pet_request("Bella", &["Feed", "Walk"])).unwrap();
    api.add_pet(pet_request("Luna", &["Play"])).unwrap();

    let response = api.toggle_task(toggle(0, true)).unwrap();
    assert!(!response.all_completed);
    assert!(response.pet.unwrap().tasks[0].completed);

    let history = api.get_history();
    assert_eq!(history.entries.len(), 1);
    let entry = &history.entries[0];
    assert_eq!(entry.date, "2024-06-02");
    assert_eq!(entry.pet_name, "Bella");
    assert_eq!((entry.completed, entry.total), (1, 2));
    assert_eq!(entry.completion_percent(), Some(50));

    let checklist = api.get_checklist();
    assert_eq!(checklist.date_display, "Sunday, June 2, 2024");
    assert_eq!((checklist.completed, checklist.total), (1, 2));
    assert!(checklist.show_switcher);
}

#[test]
fn completing_every_task_marks_the_day_complete() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(local(2024, 6, 2, 10, 0)));
    let api = open_api(&store, &clock);
    api.add_pet(pet_request("Bella", &["Feed", "Walk"])).unwrap();

    api.toggle_task(toggle(0, true)).unwrap();
    let response = api.toggle_task(toggle(1, true)).unwrap();
    assert!(response.all_completed);
    assert!(api.is_all_completed());

    // still a single entry for the day, now complete
    let history = api.get_history();
    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.entries[0].completion_percent(), Some(100));

    let reset = api.reset_today().unwrap();
    assert_eq!(reset.cleared, 2);
    assert!(!api.is_all_completed());
    assert_eq!(api.get_history().entries[0].completed, 2);
}

#[test]
fn first_start_resets_and_arms_timer_for_midnight() {
    let store = Arc::new(MemoryStore::with_values([(
        "pawfect_pets",
        r#"[{"id":"pet::1","name":"Bella","birthday":"2020-01-01","age":4,"tasks":[{"name":"Feed","completed":true}]}]"#,
    )]));
    let clock = Arc::new(FixedClock::new(local(2024, 6, 2, 10, 0)));

    let care = PetCare::open(Arc::clone(&store), &AppConfig::default(), clock.clone()).unwrap();
    let outcome = care.last_rollover();
    assert!(outcome.reset_performed);
    assert_eq!(outcome.next_check_in, Duration::from_secs(14 * 60 * 60));
    assert!(!care.pets()[0].tasks[0].completed);

    assert_eq!(
        store.get("pawfect_last-reset-day").unwrap().as_deref(),
        Some("\"2024-06-02\"")
    );
}

#[test]
fn history_older_than_a_month_is_pruned_on_write() {
    let store = Arc::new(MemoryStore::with_values([
        (
            "pawfect_pets",
            r#"[{"id":"pet::1","name":"Bella","birthday":"2020-01-01","age":4,"tasks":[{"name":"Feed"}]}]"#,
        ),
        ("pawfect_active-pet-index", "0"),
        (
            "pawfect_history",
            r#"[{"date":"2024-05-11","pet_id":"pet::1","pet_name":"Bella","completed":1,"total":1},
                {"date":"2024-06-10","pet_id":"pet::1","pet_name":"Bella","completed":0,"total":1}]"#,
        ),
    ]));
    let clock = Arc::new(FixedClock::new(local(2024, 6, 20, 9, 0)));
    let api = open_api(&store, &clock);

    // reads alone never prune
    assert_eq!(api.get_history().entries.len(), 2);

    api.toggle_task(toggle(0, true)).unwrap();
    let dates: Vec<String> = api.get_history().entries.into_iter().map(|e| e.date).collect();
    assert_eq!(dates, vec!["2024-06-10".to_string(), "2024-06-20".to_string()]);
}

#[test]
fn one_unreadable_history_row_keeps_the_rest() {
    let store = Arc::new(MemoryStore::with_values([
        (
            "pawfect_pets",
            r#"[{"id":"pet::1","name":"Bella","birthday":"2020-01-01","age":4,"tasks":[{"name":"Feed"}]}]"#,
        ),
        ("pawfect_active-pet-index", "0"),
        (
            "pawfect_history",
            r#"[{"date":"2024-06-10","pet_id":"pet::1","pet_name":"Bella","completed":1,"total":1},
                {"date":"2024-06-15","pet_id":"pet::1","pet_name":"Bella","completed":0,"total":1},
                {"date":"Invalid Date","catName":"Bella","completed":1,"total":1}]"#,
        ),
    ]));
    let clock = Arc::new(FixedClock::new(local(2024, 6, 20, 9, 0)));
    let api = open_api(&store, &clock);

    api.toggle_task(toggle(0, true)).unwrap();
    let dates: Vec<String> = api.get_history().entries.into_iter().map(|e| e.date).collect();
    assert_eq!(dates, vec!["2024-06-10", "2024-06-15", "2024-06-20"]);

    // the rewrite kept the readable rows on disk too
    let reopened = open_api(&store, &clock);
    assert_eq!(reopened.get_history().entries.len(), 3);
}

#[test]
fn pet_switching_wraps_in_both_directions() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(local(2024, 6, 2, 10, 0)));
    let api = open_api(&store, &clock);
    for name in ["Bella", "Luna", "Max"] {
        api.add_pet(pet_request(name, &["Feed"])).unwrap();
    }

    assert_eq!(api.select_previous().unwrap().active_index, Some(2));
    assert_eq!(api.select_next().unwrap().active_index, Some(0));
    let selected = api.select_next().unwrap();
    assert_eq!(selected.active_index, Some(1));
    assert_eq!(selected.pet.unwrap().name, "Luna");

    // the selection is persisted
    let reopened = open_api(&store, &clock);
    assert_eq!(reopened.get_active_pet().index, Some(1));
    assert_eq!(reopened.get_all_pets().pets.len(), 3);
}

#[test]
fn empty_registry_operations_are_noops() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(local(2024, 6, 2, 10, 0)));
    let api = open_api(&store, &clock);

    let active = api.get_active_pet();
    assert!(active.pet.is_none());
    assert_eq!(active.pet_count, 0);

    assert!(api.toggle_task(toggle(0, true)).unwrap().pet.is_none());
    assert_eq!(api.reset_today().unwrap().cleared, 0);
    assert_eq!(api.select_next().unwrap().active_index, None);
    assert!(!api.is_all_completed());
    assert!(api.get_history().entries.is_empty());
    assert!(!api.get_checklist().show_switcher);
}

#[test]
fn invalid_requests_are_rejected_without_side_effects() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(local(2024, 6, 2, 10, 0)));
    let api = open_api(&store, &clock);

    assert!(matches!(
        api.add_pet(pet_request("  ", &["Feed"])),
        Err(PetCareError::Validation(_))
    ));
    assert!(api.get_all_pets().pets.is_empty());

    api.add_pet(pet_request("Bella", &["Feed"])).unwrap();
    assert!(matches!(
        api.toggle_task(toggle(3, true)),
        Err(PetCareError::TaskNotFound { index: 3, .. })
    ));
    assert!(api.get_history().entries.is_empty());
}

#[test]
fn legacy_records_are_read() {
    let store = Arc::new(MemoryStore::with_values([
        (
            "pawfect_pets",
            r#"[{"name":"Bella","birthday":"2019-08-15","age":null,"tasks":[{"name":"Feed","completed":true}]}]"#,
        ),
        ("pawfect_active-pet-index", "\"not a number\""),
        ("pawfect_last-reset-day", "Sun Jun 02 2024"),
        (
            "pawfect_history",
            r#"[{"date":"Sun Jun 02 2024","catName":"Bella","completed":1,"total":1}]"#,
        ),
    ]));
    let clock = Arc::new(FixedClock::new(local(2024, 6, 2, 18, 0)));
    let api = open_api(&store, &clock);

    let active = api.get_active_pet();
    assert_eq!(active.index, Some(0));
    let bella = active.pet.unwrap();
    assert!(bella.id.starts_with("pet::"));
    assert_eq!(bella.age, 0.0);
    assert_eq!(bella.years_since_birthday, Some(5));
    // same day as the legacy marker, so nothing was reset
    assert!(bella.tasks[0].completed);

    // the untagged legacy entry is adopted by the pet it names
    api.toggle_task(toggle(0, true)).unwrap();
    let history = api.get_history();
    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.entries[0].pet_id.as_deref(), Some(bella.id.as_str()));
}

#[test]
fn malformed_records_load_as_empty() {
    let store = Arc::new(MemoryStore::with_values([
        ("pawfect_pets", "{broken"),
        ("pawfect_history", "[{\"date\":\"someday\"}]"),
    ]));
    let clock = Arc::new(FixedClock::new(local(2024, 6, 2, 10, 0)));
    let api = open_api(&store, &clock);

    assert!(api.get_all_pets().pets.is_empty());
    assert!(api.get_history().entries.is_empty());
}

#[tokio::test(start_paused = true)]
async fn scheduler_pushes_refresh_after_midnight() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(local(2024, 6, 2, 23, 30)));
    let api = open_api(&store, &clock);
    api.add_pet(pet_request("Bella", &["Feed"])).unwrap();
    api.toggle_task(toggle(0, true)).unwrap();

    let mut events = api.subscribe();
    api.start_scheduler();
    tokio::task::yield_now().await;

    clock.set(local(2024, 6, 3, 0, 0));
    let event = events.recv().await.unwrap();
    assert_eq!(event.day, "2024-06-03");
    assert!(event.reset_performed);

    let checklist = api.get_checklist();
    assert_eq!(checklist.completed, 0);
    assert_eq!(checklist.date_display, "Monday, June 3, 2024");
    // yesterday's summary is kept
    assert_eq!(api.get_history().entries[0].completed, 1);

    api.shutdown().await;
}
