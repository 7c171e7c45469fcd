//! Core domain types for Get Set Fit.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workout plans and their exercises
//! - Completed workout logs (with per-set detail)
//! - Application settings
//!
//! Persisted types serialize with camelCase field names because the backup
//! document shape is an externally visible contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Plan Types
// ============================================================================

/// Difficulty rating of a workout plan
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// A single exercise within a workout plan
///
/// `sets` is the target set count; `reps` is a free-form descriptor
/// (e.g. "8-12") rather than a number.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub sets: u32,
    pub reps: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Per-exercise rest override in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Muscle group, e.g. "chest", "back", "legs"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Exercise {
    /// Create an exercise with just the required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, sets: u32, reps: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sets,
            reps: reps.into(),
            weight: None,
            rest_time: None,
            notes: None,
            category: None,
        }
    }
}

/// A named, ordered collection of exercises
///
/// Plans are immutable input for the session runner; they are never
/// mutated while a session is in flight.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub exercises: Vec<Exercise>,
    /// Estimated total duration in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkoutPlan {
    /// Create a plan with the given name and exercises, timestamped now
    pub fn new(name: impl Into<String>, exercises: Vec<Exercise>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            exercises,
            estimated_duration: None,
            difficulty: Difficulty::default(),
            category: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// Completion record for a single set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetLog {
    pub set_number: u32,
    pub completed: bool,
}

/// Per-exercise completion detail within a workout log
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: Vec<SetLog>,
}

/// A finalized record of one completed workout session
///
/// Produced exactly once per session, at the moment the last exercise is
/// passed; immutable thereafter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: Uuid,
    pub plan_id: String,
    pub plan_name: String,
    /// Completion timestamp
    pub date: DateTime<Utc>,
    /// Elapsed duration in whole seconds
    pub duration: u64,
    #[serde(default)]
    pub exercises: Vec<ExerciseLog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// 1-5 stars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

// ============================================================================
// Settings
// ============================================================================

/// Display theme preference
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Measurement unit preference
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

/// User-facing application settings, persisted in the store
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub units: Units,
    pub notifications: bool,
    pub auto_start_timer: bool,
    /// Rest countdown between exercises, in seconds
    pub default_rest_time: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            units: Units::Metric,
            notifications: true,
            auto_start_timer: false,
            default_rest_time: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_serializes_camel_case() {
        let plan = WorkoutPlan::new("Push Day", vec![Exercise::new("ex1", "Bench Press", 3, "8-12")]);
        let json = serde_json::to_value(&plan).unwrap();

        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["exercises"][0]["name"], "Bench Press");
        assert_eq!(json["exercises"][0]["sets"], 3);
        // Optional fields are omitted entirely
        assert!(json["exercises"][0].get("weight").is_none());
    }

    #[test]
    fn test_log_tolerates_missing_exercises_field() {
        // Logs written by older versions carry no per-set detail
        let json = r#"{
            "id": "6f2c2f9e-94a1-4802-8e11-62bb26db2a45",
            "planId": "p1",
            "planName": "Push Day",
            "date": "2024-05-01T10:00:00Z",
            "duration": 1800
        }"#;

        let log: WorkoutLog = serde_json::from_str(json).unwrap();
        assert!(log.exercises.is_empty());
        assert_eq!(log.duration, 1800);
    }

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.units, Units::Metric);
        assert_eq!(settings.default_rest_time, 60);
    }

    #[test]
    fn test_difficulty_wire_format() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
    }
}
