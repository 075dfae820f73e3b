//! The persisted aggregate snapshot and the store seam.
//!
//! `AggregateState` is the full document written to whatever backs
//! persistence -- a local SQLite kv store here, a remote document store
//! in a hosted setup. The core only sees the [`StateStore`] trait and
//! never assumes a save succeeded.

use std::cell::RefCell;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::goal::Goal;
use crate::habit::Habit;
use crate::note::Note;
use crate::session::SessionLog;
use crate::storage::Settings;
use crate::task::Task;

/// Everything the app persists, as one document:
/// `{tasks, notes, sessions, habits, goals, settings, lastUpdated}`.
///
/// Subjects are not part of the snapshot; their totals are derived from
/// the session log on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub sessions: SessionLog,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub settings: Settings,
    pub last_updated: DateTime<Utc>,
}

impl AggregateState {
    pub fn new(settings: Settings, now: DateTime<Utc>) -> Self {
        Self {
            tasks: Vec::new(),
            notes: Vec::new(),
            sessions: SessionLog::new(),
            habits: Vec::new(),
            goals: Vec::new(),
            settings,
            last_updated: now,
        }
    }
}

impl Default for AggregateState {
    fn default() -> Self {
        Self::new(Settings::default(), Utc::now())
    }
}

/// Load/save seam consumed by the core.
///
/// `load` distinguishes "nothing stored yet" (`Ok(None)`) from a real
/// failure. Save failures are non-fatal to callers: the controller logs
/// them and keeps operating on in-memory state.
pub trait StateStore {
    fn load(&self) -> Result<Option<AggregateState>, StorageError>;
    fn save(&self, state: &AggregateState) -> Result<(), StorageError>;
}

/// In-memory store for tests and ephemeral runs. Round-trips through
/// JSON so it exercises the same serialization as the real store.
#[derive(Default)]
pub struct MemoryStore {
    doc: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<AggregateState>, StorageError> {
        match self.doc.borrow().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &AggregateState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        *self.doc.borrow_mut() = Some(json);
        Ok(())
    }
}
