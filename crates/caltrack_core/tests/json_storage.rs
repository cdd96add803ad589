use caltrack_core::{Event, EventStorage, JsonFileStorage, StorageError, DEFAULT_EVENTS_FILE};
use serde_json::Value;
use std::fs;

#[test]
fn save_then_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = JsonFileStorage::new(dir.path().join("events.json"));
    let events = vec![
        Event::with_details("2025-11-17", "Test 1", "Home", "Note 1"),
        Event::with_details("2025-11-18", "Test 2", "Work", "Note 2"),
    ];

    storage.save(&events).unwrap();
    let loaded = storage.load().unwrap();

    assert_eq!(loaded, events);
}

#[test]
fn missing_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("never-written.json"));

    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn corrupt_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    fs::write(&path, "{this is not valid json").unwrap();

    let storage = JsonFileStorage::new(&path);
    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn wrong_shape_and_invalid_utf8_load_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    let storage = JsonFileStorage::new(&path);

    fs::write(&path, r#"{"date": "2025-11-17"}"#).unwrap();
    assert!(storage.load().unwrap().is_empty());

    fs::write(&path, r#"[{"date": "2025-11-17", "title": ["x"]}]"#).unwrap();
    assert!(storage.load().unwrap().is_empty());

    fs::write(&path, [0x5b, 0xff, 0xfe, 0x5d]).unwrap();
    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn load_tolerates_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    fs::write(&path, r#"[{"date": "2025-11-17", "title": "Bare"}]"#).unwrap();

    let loaded = JsonFileStorage::new(&path).load().unwrap();
    assert_eq!(loaded, vec![Event::new("2025-11-17", "Bare")]);
}

#[test]
fn scalar_field_does_not_discard_other_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    fs::write(
        &path,
        r#"[{"date": "2025-11-17", "title": 42}, {"date": "2025-11-18", "title": "Kept"}]"#,
    )
    .unwrap();

    let loaded = JsonFileStorage::new(&path).load().unwrap();
    assert_eq!(
        loaded,
        vec![
            Event::new("2025-11-17", "42"),
            Event::new("2025-11-18", "Kept"),
        ]
    );
}

#[test]
fn default_storage_points_at_events_json() {
    let storage = JsonFileStorage::default();
    assert_eq!(storage.path(), std::path::Path::new(DEFAULT_EVENTS_FILE));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");
    assert_eq!(JsonFileStorage::new(&path).path(), path.as_path());
}

#[test]
fn save_replaces_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = JsonFileStorage::new(dir.path().join("events.json"));

    storage
        .save(&[Event::new("2025-11-17", "A"), Event::new("2025-11-18", "B")])
        .unwrap();
    storage.save(&[Event::new("2025-11-19", "C")]).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded, vec![Event::new("2025-11-19", "C")]);
}

#[test]
fn saved_file_is_pretty_array_with_ordered_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    let mut storage = JsonFileStorage::new(&path);

    storage
        .save(&[Event::with_details("2025-11-17", "Meeting", "Office", "")])
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let date_at = text.find("\"date\"").unwrap();
    let title_at = text.find("\"title\"").unwrap();
    let location_at = text.find("\"location\"").unwrap();
    let note_at = text.find("\"note\"").unwrap();
    assert!(date_at < title_at && title_at < location_at && location_at < note_at);
    assert!(text.contains("\n        \"title\": \"Meeting\""));

    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
}

#[test]
fn empty_collection_saves_as_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    let mut storage = JsonFileStorage::new(&path);

    storage.save(&[]).unwrap();

    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value, Value::Array(Vec::new()));
}

#[test]
fn unwritable_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("events.json");
    let mut storage = JsonFileStorage::new(&path);

    let err = storage.save(&[Event::new("2025-11-17", "A")]).unwrap_err();
    match err {
        StorageError::Io { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreadable_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    // Reading a directory fails with something other than NotFound.
    let storage = JsonFileStorage::new(dir.path());

    let err = storage.load().unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}
