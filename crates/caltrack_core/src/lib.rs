//! Core domain logic for caltrack, a personal calendar event tracker.
//! This crate is the single source of truth for event and date invariants.

pub mod calendar;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use calendar::{days_in_month, is_leap_year, is_valid_date, parse_date};
pub use config::{ConfigError, TrackerConfig};
pub use logging::{init_logging, init_stderr_logging, logging_status, LogTarget};
pub use model::event::{Event, EventRecord, RecordError};
pub use service::event_tracker::{
    parse_index, EventEdit, EventId, EventTracker, NewEvent, Rejection, TrackedEvent,
    TrackerError, TrackerResult,
};
pub use storage::json_file::{JsonFileStorage, DEFAULT_EVENTS_FILE};
pub use storage::memory::MemoryStorage;
pub use storage::{EventStorage, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
