//! Backup export and import.
//!
//! The backup document is a single JSON object with `plans`, `logs`,
//! `settings`, and `exportDate`. On import, each of the three data
//! sections is independently optional, but the validation is
//! all-or-nothing at the top level: if any present section fails to
//! deserialize, the whole import is rejected and the store is left
//! untouched. Every section is validated before anything is written.

use crate::{AppSettings, Error, KeyValueStore, Result, WorkoutLog, WorkoutPlan, WorkoutStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Full backup document shape
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub plans: Vec<WorkoutPlan>,
    pub logs: Vec<WorkoutLog>,
    pub settings: AppSettings,
    pub export_date: DateTime<Utc>,
}

/// What an import actually replaced
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub plans: Option<usize>,
    pub logs: Option<usize>,
    pub settings: bool,
}

/// Serialize the store's current contents as a pretty-printed backup
pub fn export_data<S: KeyValueStore>(store: &WorkoutStore<S>) -> Result<String> {
    let doc = BackupDocument {
        plans: store.plans()?,
        logs: store.logs()?,
        settings: store.settings()?,
        export_date: Utc::now(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Import a backup payload, replacing whichever sections it carries
///
/// Fails with [`Error::MalformedBackup`] without touching the store when
/// the payload is not a JSON object or any present section has the wrong
/// shape.
pub fn import_data<S: KeyValueStore>(
    store: &mut WorkoutStore<S>,
    json: &str,
) -> Result<ImportSummary> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::MalformedBackup(format!("not valid JSON: {e}")))?;

    let Value::Object(map) = value else {
        return Err(Error::MalformedBackup(
            "top-level payload must be a JSON object".into(),
        ));
    };

    // Validate every present section before writing anything
    let plans: Option<Vec<WorkoutPlan>> = map
        .get("plans")
        .map(|v| {
            serde_json::from_value(v.clone())
                .map_err(|e| Error::MalformedBackup(format!("invalid plans section: {e}")))
        })
        .transpose()?;

    let logs: Option<Vec<WorkoutLog>> = map
        .get("logs")
        .map(|v| {
            serde_json::from_value(v.clone())
                .map_err(|e| Error::MalformedBackup(format!("invalid logs section: {e}")))
        })
        .transpose()?;

    let settings: Option<AppSettings> = map
        .get("settings")
        .map(|v| {
            serde_json::from_value(v.clone())
                .map_err(|e| Error::MalformedBackup(format!("invalid settings section: {e}")))
        })
        .transpose()?;

    let mut summary = ImportSummary::default();

    if let Some(plans) = plans {
        summary.plans = Some(plans.len());
        store.save_plans(&plans)?;
    }
    if let Some(logs) = logs {
        summary.logs = Some(logs.len());
        store.save_logs(&logs)?;
    }
    if let Some(settings) = settings {
        summary.settings = true;
        store.save_settings(&settings)?;
    }

    tracing::info!(
        plans = ?summary.plans,
        logs = ?summary.logs,
        settings = summary.settings,
        "Backup imported"
    );
    Ok(summary)
}
