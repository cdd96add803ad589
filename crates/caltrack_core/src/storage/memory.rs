//! In-memory storage backend.
//!
//! Useful for tests and for callers that do not want anything on disk.
//! Counts saves so callers can assert save-through behavior.

use super::{EventStorage, StorageResult};
use crate::model::event::Event;

/// Storage backend that keeps the last saved collection in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    events: Vec<Event>,
    save_count: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose first `load` returns `events`.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events,
            save_count: 0,
        }
    }

    /// Collection as of the last save (or the seed, before any save).
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of `save` calls received.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl EventStorage for MemoryStorage {
    fn load(&self) -> StorageResult<Vec<Event>> {
        Ok(self.events.clone())
    }

    fn save(&mut self, events: &[Event]) -> StorageResult<()> {
        self.save_count += 1;
        self.events = events.to_vec();
        Ok(())
    }
}
