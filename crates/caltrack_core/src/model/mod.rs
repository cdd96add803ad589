//! Domain records held by the event tracker.
//!
//! # Responsibility
//! - Define the plain event record and its mapping representation.
//!
//! # Invariants
//! - Records carry no identity; identity is assigned by the tracker.
//!
//! # See also
//! - `service::event_tracker` for handle assignment.

pub mod event;
