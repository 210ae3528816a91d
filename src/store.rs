use crate::error::{Result, WatchError};
use crate::schedule::{PersistedSchedule, ProcessedSchedule};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// JSON files holding the latest extracted schedule and the last notified one
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    schedule_path: PathBuf,
    snapshot_path: PathBuf,
}

impl ScheduleStore {
    pub fn new(schedule_path: impl Into<PathBuf>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self { schedule_path: schedule_path.into(), snapshot_path: snapshot_path.into() }
    }

    pub fn schedule_path(&self) -> &Path {
        &self.schedule_path
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Overwrite the schedule record with the latest extraction
    pub fn save_schedule(&self, record: &PersistedSchedule) -> Result<()> {
        write_json(&self.schedule_path, record)
    }

    pub fn load_schedule(&self) -> Result<Option<PersistedSchedule>> {
        read_json(&self.schedule_path)
    }

    /// Remember the schedule the user was last told about
    pub fn save_snapshot(&self, schedule: &ProcessedSchedule) -> Result<()> {
        write_json(&self.snapshot_path, schedule)
    }

    pub fn load_snapshot(&self) -> Result<Option<ProcessedSchedule>> {
        read_json(&self.snapshot_path)
    }
}

fn storage_error(path: &Path, source: std::io::Error) -> WatchError {
    WatchError::Storage { path: path.display().to_string(), source }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
    }

    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json).map_err(|e| storage_error(path, e))?;

    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Missing file → `None`; malformed content is logged and also treated as `None`
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(storage_error(path, e)),
    };

    match serde_json::from_str(&content) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", path.display(), e);
            Ok(None)
        }
    }
}
