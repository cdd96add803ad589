//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and persistence into use-case level APIs.
//! - Keep callers decoupled from storage details.

pub mod event_tracker;
