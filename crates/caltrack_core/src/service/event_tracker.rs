//! Event tracker: the in-memory event collection and its save-through policy.
//!
//! # Responsibility
//! - Own the current event collection, loaded once from an [`EventStorage`].
//! - Validate additions and resolve sorted-view indices to event handles.
//! - Persist the full collection after every mutation that succeeds.
//!
//! # Invariants
//! - Every mutating operation runs through `save_through`; a rejected
//!   operation leaves the collection untouched and issues no save.
//! - Queries never read from or write to storage.
//! - Every event in the collection has a unique [`EventId`] for the lifetime
//!   of the tracker. Ids are not persisted.
//! - Sorted views order by `date` ascending and keep insertion order for
//!   equal dates.

use crate::calendar::is_valid_date;
use crate::model::event::Event;
use crate::storage::{EventStorage, StorageError, StorageResult};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Handle for one event instance inside a tracker.
pub type EventId = Uuid;

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Soft failure of a mutating operation. Nothing was changed or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Date text is not a valid `YYYY-MM-DD` calendar date.
    InvalidDate(String),
    /// Title is blank after trimming.
    EmptyTitle,
    /// Sorted-view index does not select an event.
    IndexOutOfRange { index: usize, len: usize },
    /// Index text is not a non-negative decimal number.
    NotANumber(String),
}

impl Rejection {
    /// Stable machine-readable reason, safe to log.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDate(_) => "invalid_date",
            Self::EmptyTitle => "empty_title",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::NotANumber(_) => "not_a_number",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; use YYYY-MM-DD format")
            }
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for {len} event(s)")
            }
            Self::NotANumber(value) => write!(f, "invalid index `{value}`: must be a number"),
        }
    }
}

impl Error for Rejection {}

/// Error returned by mutating tracker operations.
#[derive(Debug)]
pub enum TrackerError {
    /// Input was rejected; the collection is unchanged and nothing was saved.
    Rejected(Rejection),
    /// The mutation was applied in memory but persisting it failed.
    Storage(StorageError),
}

impl TrackerError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Storage(_) => None,
        }
    }
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "{rejection}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<Rejection> for TrackerError {
    fn from(value: Rejection) -> Self {
        Self::Rejected(value)
    }
}

impl From<StorageError> for TrackerError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// An event together with its tracker-assigned handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEvent {
    pub id: EventId,
    pub event: Event,
}

impl TrackedEvent {
    fn assign(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
        }
    }
}

/// Request model for adding an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvent {
    pub date: String,
    pub title: String,
    pub location: String,
    pub note: String,
}

impl NewEvent {
    pub fn new(date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Field changes for [`EventTracker::edit`].
///
/// A field that is blank after trimming keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventEdit {
    pub title: String,
    pub location: String,
    pub note: String,
}

/// Parses user-entered index text for [`EventTracker::delete`] and
/// [`EventTracker::edit`].
///
/// Surrounding whitespace is ignored. Numbers too large for `usize` are
/// clamped so that they are later rejected as out of range.
pub fn parse_index(text: &str) -> Result<usize, Rejection> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Rejection::NotANumber(text.to_string()));
    }
    Ok(trimmed.parse().unwrap_or(usize::MAX))
}

/// Event store with save-through persistence.
pub struct EventTracker<S: EventStorage> {
    storage: S,
    events: Vec<TrackedEvent>,
}

impl<S: EventStorage> EventTracker<S> {
    /// Loads the collection from `storage` and takes ownership of it.
    ///
    /// Loaded events are not re-validated.
    ///
    /// # Errors
    /// - Returns a storage error only for unreadable content; missing or
    ///   corrupt content yields an empty tracker.
    pub fn open(storage: S) -> StorageResult<Self> {
        let events: Vec<TrackedEvent> = storage
            .load()?
            .into_iter()
            .map(TrackedEvent::assign)
            .collect();
        info!(
            "event=tracker_open module=service status=ok count={}",
            events.len()
        );
        Ok(Self { storage, events })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&TrackedEvent> {
        self.events.iter().find(|tracked| tracked.id == id)
    }

    /// Adds a validated event and saves.
    ///
    /// Title, location and note are stored trimmed. Location and note are
    /// never validated.
    ///
    /// # Errors
    /// - [`Rejection::InvalidDate`] when `request.date` is not a valid date.
    /// - [`Rejection::EmptyTitle`] when the trimmed title is empty.
    pub fn add(&mut self, request: NewEvent) -> TrackerResult<EventId> {
        self.save_through("event_add", move |events| {
            if !is_valid_date(&request.date) {
                return Err(Rejection::InvalidDate(request.date));
            }
            let title = request.title.trim();
            if title.is_empty() {
                return Err(Rejection::EmptyTitle);
            }

            let tracked = TrackedEvent::assign(Event::with_details(
                request.date.as_str(),
                title,
                request.location.trim(),
                request.note.trim(),
            ));
            let id = tracked.id;
            events.push(tracked);
            Ok(id)
        })
    }

    /// Removes the event at `index` in the sorted view and saves.
    ///
    /// Returns the removed event.
    pub fn delete(&mut self, index: usize) -> TrackerResult<Event> {
        self.save_through("event_delete", |events| {
            let position = resolve_index(events, index)?;
            Ok(events.remove(position).event)
        })
    }

    /// Applies `changes` in place to the event at `index` in the sorted view
    /// and saves.
    ///
    /// An edit whose fields are all blank still counts as applied.
    pub fn edit(&mut self, index: usize, changes: EventEdit) -> TrackerResult<EventId> {
        self.save_through("event_edit", |events| {
            let position = resolve_index(events, index)?;
            let target = &mut events[position];
            overwrite_unless_blank(&mut target.event.title, &changes.title);
            overwrite_unless_blank(&mut target.event.location, &changes.location);
            overwrite_unless_blank(&mut target.event.note, &changes.note);
            Ok(target.id)
        })
    }

    /// All events, sorted by date.
    pub fn list_all(&self) -> Vec<&TrackedEvent> {
        sorted_view(self.events.iter())
    }

    /// Events on exactly `date`. Empty when `date` is not a valid date.
    pub fn list_on_date(&self, date: &str) -> Vec<&TrackedEvent> {
        if !is_valid_date(date) {
            return Vec::new();
        }
        sorted_view(self.events.iter().filter(|tracked| tracked.event.date == date))
    }

    /// Events with `start <= date <= end`, sorted by date.
    ///
    /// Empty when either bound is invalid or `start > end`.
    pub fn list_in_range(&self, start: &str, end: &str) -> Vec<&TrackedEvent> {
        if !is_valid_date(start) || !is_valid_date(end) || start > end {
            return Vec::new();
        }
        sorted_view(self.events.iter().filter(|tracked| {
            let date = tracked.event.date.as_str();
            start <= date && date <= end
        }))
    }

    /// Case-insensitive substring search over title and note.
    ///
    /// A blank keyword matches nothing.
    pub fn search(&self, keyword: &str) -> Vec<&TrackedEvent> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        sorted_view(self.events.iter().filter(|tracked| {
            tracked.event.title.to_lowercase().contains(&needle)
                || tracked.event.note.to_lowercase().contains(&needle)
        }))
    }

    fn save_through<T>(
        &mut self,
        operation: &'static str,
        body: impl FnOnce(&mut Vec<TrackedEvent>) -> Result<T, Rejection>,
    ) -> TrackerResult<T> {
        let value = match body(&mut self.events) {
            Ok(value) => value,
            Err(rejection) => {
                debug!(
                    "event={operation} module=service status=rejected reason={}",
                    rejection.code()
                );
                return Err(rejection.into());
            }
        };

        let snapshot: Vec<Event> = self
            .events
            .iter()
            .map(|tracked| tracked.event.clone())
            .collect();
        if let Err(err) = self.storage.save(&snapshot) {
            error!(
                "event={operation} module=service status=error error_code=save_failed error={}",
                err
            );
            return Err(err.into());
        }

        info!(
            "event={operation} module=service status=ok count={}",
            self.events.len()
        );
        Ok(value)
    }
}

fn sorted_view<'a>(events: impl Iterator<Item = &'a TrackedEvent>) -> Vec<&'a TrackedEvent> {
    let mut view: Vec<&TrackedEvent> = events.collect();
    view.sort_by(|left, right| left.event.date.cmp(&right.event.date));
    view
}

/// Maps a sorted-view index to the position of that instance in `events`.
fn resolve_index(events: &[TrackedEvent], index: usize) -> Result<usize, Rejection> {
    let out_of_range = Rejection::IndexOutOfRange {
        index,
        len: events.len(),
    };
    let view = sorted_view(events.iter());
    let target = view.get(index).map(|tracked| tracked.id);
    let Some(target) = target else {
        return Err(out_of_range);
    };
    events
        .iter()
        .position(|tracked| tracked.id == target)
        .ok_or(out_of_range)
}

fn overwrite_unless_blank(field: &mut String, value: &str) {
    let trimmed = value.trim();
    if !trimmed.is_empty() {
        *field = trimmed.to_string();
    }
}
