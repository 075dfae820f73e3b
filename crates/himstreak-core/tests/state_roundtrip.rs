//! Persistence round-trips through the SQLite-backed store.

use chrono::{Duration, TimeZone, Utc};
use himstreak_core::{
    AggregateState, Session, SessionKind, Settings, SqliteStore, StateStore, Theme,
};
use uuid::Uuid;

fn sample_state() -> AggregateState {
    let base = Utc.with_ymd_and_hms(2025, 8, 4, 9, 0, 0).unwrap();
    let mut state = AggregateState::default();
    for (i, (subject, duration, kind)) in [
        ("Accountancy", 25, SessionKind::Pomodoro),
        ("Business Law", 50, SessionKind::Deep),
        ("Accountancy", 15, SessionKind::Custom),
    ]
    .into_iter()
    .enumerate()
    {
        let start = base + Duration::hours(i as i64);
        state.sessions.record(Session {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            duration,
            start_time: start,
            end_time: start + Duration::minutes(duration as i64),
            kind,
        });
    }
    state.settings = Settings {
        pomodoro_work: 30,
        pomodoro_break: 10,
        pomodoro_long_break: 20,
        daily_goal: 6.0,
        theme: Theme::Dark,
        profile_name: "Him".to_string(),
    };
    state
}

#[test]
fn sqlite_store_roundtrips_sessions_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_at(&dir.path().join("himstreak.db")).unwrap();

    let state = sample_state();
    store.save(&state).unwrap();
    let loaded = store.load().unwrap().unwrap();

    let original: Vec<_> = state.sessions.iter().collect();
    let reloaded: Vec<_> = loaded.sessions.iter().collect();
    assert_eq!(original, reloaded);
    assert_eq!(loaded.settings, state.settings);
}

#[test]
fn sqlite_store_is_empty_before_first_save() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_at(&dir.path().join("himstreak.db")).unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn save_overwrites_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_at(&dir.path().join("himstreak.db")).unwrap();

    let mut state = sample_state();
    store.save(&state).unwrap();

    let now = Utc::now();
    state.sessions.record(Session {
        id: Uuid::new_v4(),
        subject: "Business Economics".to_string(),
        duration: 40,
        start_time: now,
        end_time: now,
        kind: SessionKind::Pomodoro,
    });
    store.save(&state).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.sessions.len(), 4);
}

#[test]
fn reopened_store_sees_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("himstreak.db");
    {
        let store = SqliteStore::open_at(&path).unwrap();
        store.save(&sample_state()).unwrap();
    }
    let store = SqliteStore::open_at(&path).unwrap();
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.sessions.len(), 3);
    assert_eq!(loaded.settings.profile_name, "Him");
}
