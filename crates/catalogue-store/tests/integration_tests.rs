//! Integration tests for catalogue-store
//!
//! These tests verify the full CRUD cycle for model records.

use catalogue_domain::traits::{ModelStore, StoreFailure};
use catalogue_domain::{CreateModel, ModelId, UpdateModel};
use catalogue_store::{SqliteStore, StoreError};
use chrono::NaiveDate;

fn gpt4() -> CreateModel {
    let mut metadata = serde_json::Map::new();
    metadata.insert("context_window".to_string(), serde_json::json!(8192));

    CreateModel {
        name: "gpt-4".to_string(),
        display_name: "gpt-4".to_string(),
        organization: Some("OpenAI".to_string()),
        release_date: NaiveDate::from_ymd_opt(2023, 3, 14),
        description: Some("A large multimodal model".to_string()),
        license: Some("Proprietary".to_string()),
        metadata: Some(metadata),
    }
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_create_and_get() {
    let mut store = SqliteStore::in_memory().unwrap();

    let created = store.create(&gpt4()).unwrap();
    assert!(created.id.value() > 0);
    assert_eq!(created.name, "gpt-4");
    assert_eq!(created.organization.as_deref(), Some("OpenAI"));
    assert_eq!(created.release_date, NaiveDate::from_ymd_opt(2023, 3, 14));
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(
        created.metadata.as_ref().and_then(|m| m.get("context_window")),
        Some(&serde_json::json!(8192))
    );

    let fetched = store.get(created.id).unwrap();
    assert_eq!(fetched, Some(created));
}

#[test]
fn test_find_by_name_is_exact_match() {
    let mut store = SqliteStore::in_memory().unwrap();
    let created = store.create(&gpt4()).unwrap();

    assert_eq!(store.find_by_name("gpt-4").unwrap().map(|r| r.id), Some(created.id));
    assert!(store.find_by_name("GPT-4").unwrap().is_none());
    assert!(store.find_by_name("gpt-4 ").unwrap().is_none());
}

#[test]
fn test_case_variants_are_distinct_records() {
    let mut store = SqliteStore::in_memory().unwrap();
    store.create(&CreateModel::named("gpt-4")).unwrap();

    let variant = store.create(&CreateModel::named("GPT-4"));
    assert!(variant.is_ok(), "Natural key comparison is case-sensitive");
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn test_duplicate_name_is_unique_violation() {
    let mut store = SqliteStore::in_memory().unwrap();
    store.create(&gpt4()).unwrap();

    let result = store.create(&gpt4());
    match result {
        Err(e) => assert!(e.is_unique_violation(), "Expected unique violation, got {:?}", e),
        Ok(_) => panic!("Should reject duplicate name"),
    }
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_failed_create_leaves_no_row() {
    let mut store = SqliteStore::in_memory().unwrap();

    let too_long = CreateModel::named("x".repeat(300));
    let result = store.create(&too_long);

    assert!(matches!(result, Err(StoreError::ConstraintViolation(_))));
    assert!(store.find_by_name(&"x".repeat(300)).unwrap().is_none());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_ids_are_not_reused_after_delete() {
    let mut store = SqliteStore::in_memory().unwrap();

    let first = store.create(&CreateModel::named("a")).unwrap();
    assert!(store.delete(first.id).unwrap());
    let second = store.create(&CreateModel::named("a")).unwrap();

    assert!(second.id > first.id);
}

#[test]
fn test_update_changes_fields_and_timestamp() {
    let mut store = SqliteStore::in_memory().unwrap();
    let created = store.create(&gpt4()).unwrap();

    std::thread::sleep(std::time::Duration::from_millis(5));

    let changes = UpdateModel {
        license: Some("Apache 2.0".to_string()),
        ..UpdateModel::default()
    };
    let updated = store.update(created.id, &changes).unwrap().unwrap();

    assert_eq!(updated.license.as_deref(), Some("Apache 2.0"));
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[test]
fn test_update_missing_record() {
    let mut store = SqliteStore::in_memory().unwrap();
    let changes = UpdateModel {
        description: Some("nothing".to_string()),
        ..UpdateModel::default()
    };

    assert!(store.update(ModelId::from_value(99), &changes).unwrap().is_none());
}

#[test]
fn test_update_to_taken_name_is_unique_violation() {
    let mut store = SqliteStore::in_memory().unwrap();
    store.create(&CreateModel::named("gpt-4")).unwrap();
    let other = store.create(&CreateModel::named("gpt-3.5")).unwrap();

    let changes = UpdateModel {
        name: Some("gpt-4".to_string()),
        ..UpdateModel::default()
    };
    let err = store.update(other.id, &changes).unwrap_err();
    assert!(err.is_unique_violation());
}

#[test]
fn test_delete() {
    let mut store = SqliteStore::in_memory().unwrap();
    let created = store.create(&gpt4()).unwrap();

    assert!(store.delete(created.id).unwrap());
    assert!(!store.delete(created.id).unwrap());
    assert!(store.get(created.id).unwrap().is_none());
}

#[test]
fn test_file_backed_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.db");

    let id = {
        let mut store = SqliteStore::new(&path).unwrap();
        store.create(&gpt4()).unwrap().id
    };

    let store = SqliteStore::new(&path).unwrap();
    let record = store.get(id).unwrap().expect("record should survive reopen");
    assert_eq!(record.name, "gpt-4");
}
