//! JSON file storage backend.
//!
//! # Responsibility
//! - Persist the collection as one pretty-printed JSON array of records.
//! - Recover from missing or unparsable files with an empty collection.
//!
//! # Invariants
//! - Records are written with keys in the order date, title, location, note.
//! - Every save rewrites the whole file.
//! - Corrupt content is reported through `log::warn!` and never fails `load`.

use super::{EventStorage, StorageError, StorageResult};
use crate::model::event::{Event, EventRecord};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default file name used when no path is configured.
pub const DEFAULT_EVENTS_FILE: &str = "events.json";

const JSON_INDENT: &[u8] = b"    ";

/// Storage backend that keeps the collection in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStorage {
    fn default() -> Self {
        Self::new(DEFAULT_EVENTS_FILE)
    }
}

impl EventStorage for JsonFileStorage {
    fn load(&self) -> StorageResult<Vec<Event>> {
        let started_at = Instant::now();

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=storage_load module=storage status=ok mode=missing path={}",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=storage_load module=storage status=error path={} error={}",
                    self.path.display(),
                    err
                );
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        match decode_events(&bytes) {
            Ok(events) => {
                info!(
                    "event=storage_load module=storage status=ok mode=file path={} count={} duration_ms={}",
                    self.path.display(),
                    events.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(events)
            }
            Err(reason) => {
                warn!(
                    "event=storage_load module=storage status=warn reason=corrupt path={} error={}; starting with an empty list",
                    self.path.display(),
                    reason
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, events: &[Event]) -> StorageResult<()> {
        let started_at = Instant::now();
        let bytes = encode_events(events)?;

        if let Err(err) = fs::write(&self.path, bytes) {
            error!(
                "event=storage_save module=storage status=error path={} error={}",
                self.path.display(),
                err
            );
            return Err(StorageError::Io {
                path: self.path.clone(),
                source: err,
            });
        }

        info!(
            "event=storage_save module=storage status=ok path={} count={} duration_ms={}",
            self.path.display(),
            events.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn encode_events(events: &[Event]) -> StorageResult<Vec<u8>> {
    let records: Vec<EventRecord> = events.iter().map(Event::to_record).collect();
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    records.serialize(&mut serializer)?;
    Ok(buffer)
}

fn decode_events(bytes: &[u8]) -> Result<Vec<Event>, String> {
    let value: Value = serde_json::from_slice(bytes).map_err(|err| err.to_string())?;
    let Value::Array(items) = value else {
        return Err("top-level value is not an array".to_string());
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Event::from_value(item).map_err(|err| format!("element {index}: {err}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_events, encode_events};
    use crate::model::event::Event;

    #[test]
    fn encode_uses_four_space_indent_and_field_order() {
        let bytes = encode_events(&[Event::with_details("2025-11-17", "A", "B", "C")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let expected = "[\n    {\n        \"date\": \"2025-11-17\",\n        \"title\": \"A\",\n        \"location\": \"B\",\n        \"note\": \"C\"\n    }\n]";
        assert_eq!(text, expected);
    }

    #[test]
    fn decode_rejects_top_level_object() {
        let err = decode_events(br#"{"date": "2025-11-17"}"#).unwrap_err();
        assert!(err.contains("not an array"));
    }

    #[test]
    fn decode_reports_offending_element() {
        let err = decode_events(br#"[{"title": "ok"}, 42]"#).unwrap_err();
        assert!(err.starts_with("element 1"));
    }
}
