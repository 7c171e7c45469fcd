//! Flat key-value persistence for plans, logs, and settings.
//!
//! The storage backend is an injected [`KeyValueStore`] whose operations
//! return success or failure rather than throwing. [`FileStore`] is the
//! on-disk implementation: one JSON file per key, read under a shared
//! lock, written atomically (temp file, sync, rename) under an exclusive
//! lock. [`WorkoutStore`] is the typed facade the rest of the system uses.
//!
//! A missing or unparseable value reads back as the default for its type,
//! with a warning; existing data is only ever replaced by a successful
//! write.

use crate::{AppSettings, Error, Result, WorkoutLog, WorkoutPlan};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Store key for the workout plan collection
pub const PLANS_KEY: &str = "workout_plans";
/// Store key for the workout log collection
pub const LOGS_KEY: &str = "workout_logs";
/// Store key for application settings
pub const SETTINGS_KEY: &str = "settings";

/// Minimal key-value storage contract
///
/// `get` returns `Ok(None)` for an absent key; any backend fault is an
/// explicit `Err`, never a panic.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// On-disk key-value store: one JSON file per key under `<dir>/store/`
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: data_dir.into().join("store"),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)
            .map_err(|e| Error::Persistence(format!("open {}: {e}", path.display())))?;

        // Shared lock for reading; writers hold exclusive locks
        file.lock_shared()
            .map_err(|e| Error::Persistence(format!("lock {}: {e}", path.display())))?;

        let mut contents = String::new();
        let read_result = std::io::BufReader::new(&file).read_to_string(&mut contents);
        let _ = file.unlock();
        read_result.map_err(|e| Error::Persistence(format!("read {}: {e}", path.display())))?;

        Ok(Some(contents))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::Persistence(format!("create {}: {e}", self.dir.display())))?;

        // Write to a temp file in the same directory so the final rename
        // is atomic on the same filesystem.
        let temp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| Error::Persistence(format!("temp file: {e}")))?;

        temp.as_file()
            .lock_exclusive()
            .map_err(|e| Error::Persistence(format!("lock temp file: {e}")))?;

        let write_result = (|| -> std::io::Result<()> {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
            temp.as_file().sync_all()
        })();
        let _ = temp.as_file().unlock();
        write_result.map_err(|e| Error::Persistence(format!("write {key}: {e}")))?;

        let path = self.key_path(key);
        temp.persist(&path)
            .map_err(|e| Error::Persistence(format!("persist {}: {}", path.display(), e.error)))?;

        tracing::debug!(key, "Stored value at {:?}", path);
        Ok(())
    }
}

/// In-memory key-value store for tests and ephemeral use
#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.into(), value.into());
        Ok(())
    }
}

/// Typed storage facade over a key-value backend
pub struct WorkoutStore<S: KeyValueStore> {
    kv: S,
}

impl WorkoutStore<FileStore> {
    /// Open the on-disk store under the given data directory
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(FileStore::new(data_dir))
    }
}

impl<S: KeyValueStore> WorkoutStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// All stored workout plans
    pub fn plans(&self) -> Result<Vec<WorkoutPlan>> {
        self.read_or_default(PLANS_KEY)
    }

    /// Replace the stored plan collection
    pub fn save_plans(&mut self, plans: &[WorkoutPlan]) -> Result<()> {
        self.write(PLANS_KEY, &plans)
    }

    /// Insert a plan, or replace the stored plan with the same id
    ///
    /// Refreshes the plan's `updated_at` timestamp.
    pub fn upsert_plan(&mut self, mut plan: WorkoutPlan) -> Result<()> {
        plan.updated_at = chrono::Utc::now();
        let mut plans = self.plans()?;
        match plans.iter_mut().find(|p| p.id == plan.id) {
            Some(existing) => *existing = plan,
            None => plans.push(plan),
        }
        self.save_plans(&plans)
    }

    /// Remove a plan by id; returns whether anything was removed
    pub fn delete_plan(&mut self, id: &str) -> Result<bool> {
        let mut plans = self.plans()?;
        let before = plans.len();
        plans.retain(|p| p.id != id);
        let removed = plans.len() < before;
        if removed {
            self.save_plans(&plans)?;
        }
        Ok(removed)
    }

    /// Look up a plan by id, or by case-insensitive name
    pub fn find_plan(&self, id_or_name: &str) -> Result<Option<WorkoutPlan>> {
        let plans = self.plans()?;
        let by_id = plans.iter().find(|p| p.id == id_or_name);
        let found = by_id.or_else(|| {
            plans
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(id_or_name))
        });
        Ok(found.cloned())
    }

    /// All stored workout logs
    pub fn logs(&self) -> Result<Vec<WorkoutLog>> {
        self.read_or_default(LOGS_KEY)
    }

    /// Replace the stored log collection
    pub fn save_logs(&mut self, logs: &[WorkoutLog]) -> Result<()> {
        self.write(LOGS_KEY, &logs)
    }

    /// Append one finalized log to the collection
    ///
    /// On failure the caller still holds the log and may retry or discard
    /// it; nothing stored is modified.
    pub fn append_log(&mut self, log: &WorkoutLog) -> Result<()> {
        let mut logs = self.logs()?;
        logs.push(log.clone());
        self.save_logs(&logs)
    }

    /// Delete all workout history
    pub fn clear_logs(&mut self) -> Result<()> {
        self.save_logs(&[])
    }

    /// Stored settings, or defaults when absent
    pub fn settings(&self) -> Result<AppSettings> {
        self.read_or_default(SETTINGS_KEY)
    }

    pub fn save_settings(&mut self, settings: &AppSettings) -> Result<()> {
        self.write(SETTINGS_KEY, settings)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.kv.get(key)? {
            None => Ok(T::default()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(value),
                Err(e) => {
                    tracing::warn!(key, "Failed to parse stored value: {e}. Using default.");
                    Ok(T::default())
                }
            },
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw)
    }
}
