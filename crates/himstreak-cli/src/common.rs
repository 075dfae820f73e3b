//! Shared helpers for command modules.

use chrono::{NaiveDate, Utc};
use himstreak_core::{Settings, SqliteStore, StudyTracker};
use uuid::Uuid;

/// Open the tracker against the default store, overlaying the settings
/// from config.toml (the file is authoritative at process start).
pub fn open_tracker() -> Result<StudyTracker, Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let mut tracker = StudyTracker::new(Box::new(store))?;
    let settings = Settings::load_or_default();
    if settings != *tracker.settings() {
        tracker.update_settings(settings, Utc::now())?;
    }
    Ok(tracker)
}

pub fn parse_id(input: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    Ok(Uuid::parse_str(input)?)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::parse_from_str(input, "%Y-%m-%d")?)
}

/// Print the standard no-op response for an unknown id.
pub fn print_not_found(id: Uuid) {
    println!("{{\"type\": \"not_found\", \"id\": \"{id}\"}}");
}
