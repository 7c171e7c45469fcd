#![forbid(unsafe_code)]

//! Core domain model and business logic for the Get Set Fit workout tracker.
//!
//! This crate provides:
//! - Domain types (plans, exercises, logs, settings)
//! - The guided workout session runner
//! - Key-value persistence and backup import/export
//! - Exercise suggestions (remote service with offline fallback)
//! - History statistics

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod session;
pub mod store;
pub mod backup;
pub mod suggest;
pub mod stats;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, SuggestionsConfig};
pub use session::{Clock, Phase, SessionRunner, SystemClock};
pub use store::{FileStore, KeyValueStore, MemoryStore, WorkoutStore};
pub use backup::{export_data, import_data, BackupDocument, ImportSummary};
pub use suggest::{
    fallback_suggestions, suggest_exercises, ExerciseSuggestion, RemoteSuggestionClient,
};
pub use stats::{compute_stats, WorkoutStats};
