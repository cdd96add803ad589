//! Event record and its field-mapping form.
//!
//! # Responsibility
//! - Hold the four user-facing fields of a calendar entry.
//! - Convert to and from the ordered `{date, title, location, note}` mapping
//!   used by storage backends.
//!
//! # Invariants
//! - `to_record` always emits keys in the order date, title, location, note.
//! - `from_record` never fails on a missing key; absent fields become `""`.
//! - Number and bool fields are kept as their JSON text, so one hand-edited
//!   record cannot make the whole stored collection unreadable.
//! - `Event` itself does not validate; the tracker validates on add.

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ordered field mapping produced by [`Event::to_record`].
pub type EventRecord = Map<String, Value>;

const FIELD_DATE: &str = "date";
const FIELD_TITLE: &str = "title";
const FIELD_LOCATION: &str = "location";
const FIELD_NOTE: &str = "note";

/// Failure to turn a mapping into an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Collection element is not a JSON object.
    NotAnObject,
    /// A known field holds an array or object.
    InvalidField(&'static str),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "event record must be an object"),
            Self::InvalidField(field) => {
                write!(f, "event record field `{field}` must be a string or scalar")
            }
        }
    }
}

impl Error for RecordError {}

/// A calendar entry.
///
/// `date` is `YYYY-MM-DD` text for anything that entered through
/// [`crate::EventTracker::add`]; loaded events are taken as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub date: String,
    pub title: String,
    pub location: String,
    pub note: String,
}

impl Event {
    /// Creates an event with empty location and note.
    pub fn new(date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Creates an event with every field supplied.
    pub fn with_details(
        date: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            location: location.into(),
            note: note.into(),
        }
    }

    /// Converts this event into its ordered field mapping.
    pub fn to_record(&self) -> EventRecord {
        let mut record = EventRecord::new();
        record.insert(FIELD_DATE.to_string(), Value::String(self.date.clone()));
        record.insert(FIELD_TITLE.to_string(), Value::String(self.title.clone()));
        record.insert(
            FIELD_LOCATION.to_string(),
            Value::String(self.location.clone()),
        );
        record.insert(FIELD_NOTE.to_string(), Value::String(self.note.clone()));
        record
    }

    /// Builds an event from a field mapping.
    ///
    /// Missing keys and `null` values default to `""`. Numbers and bools
    /// become their JSON text. Unknown keys are ignored.
    ///
    /// # Errors
    /// - Returns [`RecordError::InvalidField`] when a known field is an array
    ///   or object.
    pub fn from_record(record: &EventRecord) -> Result<Self, RecordError> {
        Ok(Self {
            date: read_field(record, FIELD_DATE)?,
            title: read_field(record, FIELD_TITLE)?,
            location: read_field(record, FIELD_LOCATION)?,
            note: read_field(record, FIELD_NOTE)?,
        })
    }

    /// Builds an event from one element of a stored collection.
    ///
    /// # Errors
    /// - Returns [`RecordError::NotAnObject`] for non-object elements.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(record) => Self::from_record(record),
            _ => Err(RecordError::NotAnObject),
        }
    }
}

fn read_field(record: &EventRecord, field: &'static str) -> Result<String, RecordError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(scalar.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => Err(RecordError::InvalidField(field)),
    }
}
