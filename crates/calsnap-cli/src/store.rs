//! Stored-event persistence between commands.
//!
//! Each extraction replaces the stored list wholesale; `list`, `export`,
//! and `clear` operate on whatever the last extraction produced. The
//! store is a single pretty-printed JSON file so users can hand-edit
//! events (fix a misread time, drop a row) before exporting.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use calsnap_core::CalendarEvent;

use crate::error::CliResult;

/// A JSON-file store for the most recent extraction.
#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the stored events.
    pub fn save(&self, events: &[CalendarEvent]) -> CliResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(events)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), count = events.len(), "saved events");
        Ok(())
    }

    /// Loads the stored events. A missing file is an empty list.
    pub fn load(&self) -> CliResult<Vec<CalendarEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Discards the stored events. A missing file is not an error.
    pub fn clear(&self) -> CliResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn store_in(dir: &tempfile::TempDir) -> EventStore {
        EventStore::new(dir.path().join("events.json"))
    }

    fn event(activity: &str) -> CalendarEvent {
        CalendarEvent::new(activity, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let events = vec![event("A"), event("B")];
        store.save(&events).unwrap();

        assert_eq!(store.load().unwrap(), events);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::new(dir.path().join("nested/deeper/events.json"));

        store.save(&[event("A")]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().unwrap().is_empty());
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&[event("old"), event("older")]).unwrap();
        store.save(&[event("new")]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].activity, "new");
    }

    #[test]
    fn clear_removes_the_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&[event("A")]).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());

        // Clearing an already-empty store is fine.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json").unwrap();

        assert!(store.load().is_err());
    }
}
