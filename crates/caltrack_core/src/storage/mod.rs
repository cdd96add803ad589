//! Storage port for the event collection and its backends.
//!
//! # Responsibility
//! - Define the bulk `load`/`save` contract the tracker persists through.
//! - Keep backend details (file paths, encoding) out of the tracker.
//!
//! # Invariants
//! - `load` treats a missing or corrupt resource as an empty collection.
//! - `save` replaces the entire stored collection; it never merges.
//! - Write failures are returned to the caller, never swallowed.

pub mod json_file;
pub mod memory;

use crate::model::event::Event;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend failure that the caller has to handle.
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The collection could not be encoded for writing.
    Encode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "event storage I/O failed at `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode events: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Bulk persistence contract for the event collection.
pub trait EventStorage {
    /// Loads the stored collection in stored order.
    ///
    /// Missing and corrupt content both yield `Ok(vec![])`.
    fn load(&self) -> StorageResult<Vec<Event>>;

    /// Replaces the stored collection with exactly `events`.
    fn save(&mut self, events: &[Event]) -> StorageResult<()>;
}
