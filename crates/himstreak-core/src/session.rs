//! Completed study sessions and the append-only session log.
//!
//! A [`Session`] is immutable once recorded. The log is an ordered
//! sequence that only ever grows through normal operation; derived
//! figures (subject totals, day sums) are recomputed from it on demand.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of work interval a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Pomodoro,
    Deep,
    Custom,
}

/// A persisted record of one completed work interval.
///
/// Serialized as `{id, subject, duration, startTime, endTime, type}` with
/// RFC 3339 timestamps. `duration` is in whole minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    /// Subject name. A weak reference -- resolved by name at aggregation
    /// time, so a removed subject never breaks the log.
    pub subject: String,
    /// Duration in minutes.
    pub duration: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: SessionKind,
}

/// Append-only log of completed sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    sessions: Vec<Session>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed session. Sessions are never edited or removed.
    pub fn record(&mut self, session: Session) {
        self.sessions.push(session);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The `n` most recent sessions, newest first.
    pub fn recent(&self, n: usize) -> Vec<&Session> {
        self.sessions.iter().rev().take(n).collect()
    }

    /// Sum of durations per subject name appearing in the log.
    pub fn totals_by_subject(&self) -> BTreeMap<String, u32> {
        let mut totals = BTreeMap::new();
        for session in &self.sessions {
            *totals.entry(session.subject.clone()).or_insert(0) += session.duration;
        }
        totals
    }

    /// Total minutes for one subject name.
    pub fn minutes_for_subject(&self, name: &str) -> u32 {
        self.sessions
            .iter()
            .filter(|s| s.subject == name)
            .map(|s| s.duration)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(subject: &str, duration: u32) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            duration,
            start_time: now,
            end_time: now,
            kind: SessionKind::Pomodoro,
        }
    }

    #[test]
    fn record_preserves_order() {
        let mut log = SessionLog::new();
        log.record(session("Accountancy", 25));
        log.record(session("Business Law", 30));
        log.record(session("Accountancy", 45));
        let subjects: Vec<&str> = log.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(subjects, ["Accountancy", "Business Law", "Accountancy"]);
    }

    #[test]
    fn totals_by_subject_sums_durations() {
        let mut log = SessionLog::new();
        log.record(session("Accountancy", 25));
        log.record(session("Business Law", 30));
        log.record(session("Accountancy", 45));
        let totals = log.totals_by_subject();
        assert_eq!(totals.get("Accountancy"), Some(&70));
        assert_eq!(totals.get("Business Law"), Some(&30));
    }

    #[test]
    fn totals_by_subject_is_idempotent() {
        let mut log = SessionLog::new();
        log.record(session("Accountancy", 25));
        log.record(session("Quantitative Aptitude", 50));
        assert_eq!(log.totals_by_subject(), log.totals_by_subject());
    }

    #[test]
    fn minutes_for_subject_ignores_other_subjects() {
        let mut log = SessionLog::new();
        log.record(session("Accountancy", 25));
        log.record(session("Business Law", 30));
        log.record(session("Accountancy", 45));
        assert_eq!(log.minutes_for_subject("Accountancy"), 70);
        assert_eq!(log.minutes_for_subject("Business Economics"), 0);
    }

    #[test]
    fn recent_returns_newest_first() {
        let mut log = SessionLog::new();
        log.record(session("a", 1));
        log.record(session("b", 2));
        log.record(session("c", 3));
        let recent: Vec<&str> = log.recent(2).iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(recent, ["c", "b"]);
    }

    #[test]
    fn session_wire_shape() {
        let s = session("Accountancy", 25);
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("startTime").is_some());
        assert!(json.get("endTime").is_some());
        assert_eq!(json["type"], "pomodoro");
        assert_eq!(json["duration"], 25);
    }
}
