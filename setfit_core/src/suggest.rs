//! Exercise suggestions for a muscle group.
//!
//! When a generative API key is configured, suggestions come from the
//! remote text-generation service; otherwise, or on any failure, a
//! deterministic built-in table answers offline. Callers therefore always
//! get a usable list.

use crate::{Error, Result, SuggestionsConfig};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A suggested exercise for a muscle group
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseSuggestion {
    pub name: String,
    pub description: String,
}

impl ExerciseSuggestion {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Built-in suggestion table, keyed by lowercase muscle group
static FALLBACK_TABLE: Lazy<HashMap<&'static str, Vec<ExerciseSuggestion>>> = Lazy::new(|| {
    let mut table = HashMap::new();

    table.insert(
        "chest",
        vec![
            ExerciseSuggestion::new(
                "Push-ups",
                "Classic bodyweight exercise for chest, shoulders, and triceps",
            ),
            ExerciseSuggestion::new("Bench Press", "Barbell or dumbbell press lying on a bench"),
            ExerciseSuggestion::new("Incline Press", "Press at an incline to target upper chest"),
            ExerciseSuggestion::new("Dumbbell Flyes", "Isolation exercise for chest muscles"),
            ExerciseSuggestion::new("Dips", "Bodyweight exercise targeting chest and triceps"),
        ],
    );

    table.insert(
        "back",
        vec![
            ExerciseSuggestion::new("Pull-ups", "Bodyweight exercise for upper back and lats"),
            ExerciseSuggestion::new(
                "Bent-over Rows",
                "Barbell or dumbbell rows for back muscles",
            ),
            ExerciseSuggestion::new(
                "Lat Pulldowns",
                "Machine exercise targeting latissimus dorsi",
            ),
            ExerciseSuggestion::new("Deadlifts", "Compound exercise for entire posterior chain"),
            ExerciseSuggestion::new(
                "Face Pulls",
                "Cable exercise for rear delts and upper back",
            ),
        ],
    );

    table.insert(
        "legs",
        vec![
            ExerciseSuggestion::new(
                "Squats",
                "Fundamental compound movement for legs and glutes",
            ),
            ExerciseSuggestion::new("Lunges", "Single-leg exercise for balance and strength"),
            ExerciseSuggestion::new(
                "Deadlifts",
                "Hip hinge movement for hamstrings and glutes",
            ),
            ExerciseSuggestion::new("Leg Press", "Machine exercise for quadriceps"),
            ExerciseSuggestion::new("Calf Raises", "Isolation exercise for calf muscles"),
        ],
    );

    table.insert(
        "arms",
        vec![
            ExerciseSuggestion::new("Bicep Curls", "Isolation exercise for biceps"),
            ExerciseSuggestion::new("Tricep Dips", "Bodyweight exercise for triceps"),
            ExerciseSuggestion::new(
                "Hammer Curls",
                "Variation of bicep curls with neutral grip",
            ),
            ExerciseSuggestion::new(
                "Overhead Tricep Extension",
                "Isolation exercise for triceps",
            ),
            ExerciseSuggestion::new(
                "Chin-ups",
                "Compound exercise targeting biceps and back",
            ),
        ],
    );

    table.insert(
        "shoulders",
        vec![
            ExerciseSuggestion::new(
                "Overhead Press",
                "Compound movement for shoulder development",
            ),
            ExerciseSuggestion::new("Lateral Raises", "Isolation exercise for side delts"),
            ExerciseSuggestion::new("Front Raises", "Isolation exercise for front delts"),
            ExerciseSuggestion::new("Rear Delt Flyes", "Isolation exercise for rear delts"),
            ExerciseSuggestion::new("Pike Push-ups", "Bodyweight exercise for shoulders"),
        ],
    );

    table.insert(
        "core",
        vec![
            ExerciseSuggestion::new("Plank", "Isometric exercise for core stability"),
            ExerciseSuggestion::new("Crunches", "Classic abdominal exercise"),
            ExerciseSuggestion::new("Russian Twists", "Rotational core exercise"),
            ExerciseSuggestion::new(
                "Mountain Climbers",
                "Dynamic core and cardio exercise",
            ),
            ExerciseSuggestion::new("Dead Bug", "Core stability exercise"),
        ],
    );

    table
});

/// Suggestions from the built-in table
///
/// Unknown muscle groups fall back to the core list, so this never
/// returns an empty or missing answer.
pub fn fallback_suggestions(muscle_group: &str) -> Vec<ExerciseSuggestion> {
    let key = muscle_group.trim().to_lowercase();
    FALLBACK_TABLE
        .get(key.as_str())
        .or_else(|| FALLBACK_TABLE.get("core"))
        .cloned()
        .unwrap_or_default()
}

/// Muscle groups the built-in table covers
pub fn known_muscle_groups() -> Vec<&'static str> {
    let mut groups: Vec<_> = FALLBACK_TABLE.keys().copied().collect();
    groups.sort_unstable();
    groups
}

// Gemini generateContent wire types, limited to the fields we read/write.

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// Client for the remote text-generation suggestion service
pub struct RemoteSuggestionClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteSuggestionClient {
    const DEFAULT_BASE_URL: &'static str =
        "https://generativelanguage.googleapis.com/v1beta/models";

    /// Build a client from config; `None` when no API key is available
    pub fn from_config(config: &SuggestionsConfig) -> Option<Self> {
        let api_key = config.resolved_api_key()?;
        Some(Self::new(api_key, config.model.clone()))
    }

    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: Self::DEFAULT_BASE_URL.into(),
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
        }
    }

    /// Override the service endpoint (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Ask the remote service for five exercises for a muscle group
    pub fn suggest(&self, muscle_group: &str) -> Result<Vec<ExerciseSuggestion>> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: format!(
                        "Generate a list of 5 effective exercises for the following muscle \
                         group: {muscle_group}. Respond with a JSON array of objects with \
                         \"name\" and \"description\" string fields."
                    ),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| Error::Suggestion(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Suggestion(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| Error::Suggestion(format!("invalid response body: {e}")))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Suggestion("empty response from service".into()))?;

        let suggestions: Vec<ExerciseSuggestion> = serde_json::from_str(text)
            .map_err(|e| Error::Suggestion(format!("unparseable suggestion list: {e}")))?;

        if suggestions.is_empty() {
            return Err(Error::Suggestion("service returned no suggestions".into()));
        }
        Ok(suggestions)
    }
}

/// Suggest exercises, preferring the remote service when configured
///
/// Any remote failure logs a warning and falls back to the built-in
/// table, so the result is always non-empty.
pub fn suggest_exercises(
    remote: Option<&RemoteSuggestionClient>,
    muscle_group: &str,
) -> Vec<ExerciseSuggestion> {
    if let Some(client) = remote {
        match client.suggest(muscle_group) {
            Ok(suggestions) => return suggestions,
            Err(e) => {
                tracing::warn!("Remote suggestions unavailable ({e}), using built-in table");
            }
        }
    }
    fallback_suggestions(muscle_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_known_group() {
        let suggestions = fallback_suggestions("chest");
        assert_eq!(suggestions.len(), 5);
        assert_eq!(suggestions[0].name, "Push-ups");
    }

    #[test]
    fn test_fallback_is_case_insensitive() {
        assert_eq!(fallback_suggestions("Back"), fallback_suggestions("back"));
        assert_eq!(fallback_suggestions(" LEGS "), fallback_suggestions("legs"));
    }

    #[test]
    fn test_unknown_group_falls_back_to_core() {
        let suggestions = fallback_suggestions("forearms");
        assert_eq!(suggestions, fallback_suggestions("core"));
        assert_eq!(suggestions[0].name, "Plank");
    }

    #[test]
    fn test_every_group_has_five_entries() {
        for group in known_muscle_groups() {
            assert_eq!(fallback_suggestions(group).len(), 5, "group {group}");
        }
    }

    #[test]
    fn test_no_remote_uses_fallback() {
        let suggestions = suggest_exercises(None, "shoulders");
        assert_eq!(suggestions[0].name, "Overhead Press");
    }

    #[test]
    fn test_unreachable_remote_falls_back() {
        // Port 1 refuses connections; the call must degrade gracefully
        let client = RemoteSuggestionClient::new("test-key".into(), "test-model".into())
            .with_base_url("http://127.0.0.1:1");
        let suggestions = suggest_exercises(Some(&client), "arms");
        assert_eq!(suggestions, fallback_suggestions("arms"));
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = SuggestionsConfig {
            api_key: None,
            model: "gemini-2.5-flash".into(),
        };
        // No key in config; only present if the env var is set
        if std::env::var("SETFIT_API_KEY").is_err() {
            assert!(RemoteSuggestionClient::from_config(&config).is_none());
        }
    }
}
