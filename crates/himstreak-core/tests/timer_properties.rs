//! Property tests for the timer state machine.

use chrono::{DateTime, Duration, TimeZone, Utc};
use himstreak_core::{Event, SessionKind, StartRequest, TimerConfig, TimerEngine, TimerState};
use proptest::prelude::*;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 4, 9, 0, 0).unwrap()
}

fn start_request(subject: &str) -> StartRequest {
    StartRequest {
        kind: Some(SessionKind::Pomodoro),
        custom_minutes: None,
        subject: Some(subject.to_string()),
    }
}

proptest! {
    /// However the countdown is interleaved with pauses and resumes,
    /// the recorded session keeps the original start timestamp.
    #[test]
    fn started_at_survives_pause_resume(
        segments in prop::collection::vec(1u32..40, 1..8),
        pause_gap_secs in 1i64..3600,
    ) {
        let mut engine = TimerEngine::new(TimerConfig {
            work_min: 1,
            break_min: 5,
            long_break_min: 15,
        });
        engine.start(start_request("Accountancy"), t0()).unwrap();

        let mut now = t0();
        let mut completed = None;
        'outer: for ticks in &segments {
            for _ in 0..*ticks {
                now += Duration::seconds(1);
                if let Some(Event::SessionCompleted { session }) = engine.tick(now) {
                    completed = Some(session);
                    break 'outer;
                }
            }
            engine.pause(now);
            now += Duration::seconds(pause_gap_secs);
            engine.start(StartRequest::default(), now).unwrap();
        }
        // Drive to completion regardless of how the segments landed.
        while completed.is_none() {
            now += Duration::seconds(1);
            if let Some(Event::SessionCompleted { session }) = engine.tick(now) {
                completed = Some(session);
            }
        }

        let session = completed.unwrap();
        prop_assert_eq!(session.start_time, t0());
        prop_assert_eq!(session.duration, 1);
    }

    /// A work interval with a subject emits exactly one session, and its
    /// duration is the rounded nominal length however many extra ticks
    /// the driver sends afterwards.
    #[test]
    fn one_session_per_completed_interval(minutes in 1u32..120) {
        let mut engine = TimerEngine::new(TimerConfig {
            work_min: minutes,
            break_min: 5,
            long_break_min: 15,
        });
        engine.start(start_request("Business Law"), t0()).unwrap();

        let mut sessions = 0u32;
        for _ in 0..(minutes * 60 + 30) {
            if let Some(Event::SessionCompleted { session }) = engine.tick(t0()) {
                sessions += 1;
                prop_assert_eq!(session.duration, minutes);
            }
        }
        prop_assert_eq!(sessions, 1);
        // Extra ticks run the break down, never a second session.
        prop_assert!(matches!(
            engine.state(),
            TimerState::BreakRunning | TimerState::Idle
        ));
    }
}
