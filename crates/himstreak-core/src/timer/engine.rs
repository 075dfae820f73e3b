//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It owns no clock and
//! no thread - the caller feeds it one `tick()` per elapsed second and
//! passes the current time into the calls that stamp timestamps, so
//! tests can drive it with synthetic ticks.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> BreakRunning -> Idle
//!                                 BreakRunning -> BreakPaused -> BreakRunning
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(config);
//! engine.start(request, Utc::now())?;
//! // Once per second:
//! engine.tick(Utc::now()); // Returns Some(Event) on pause-worthy changes
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::interval::{Interval, StartRequest, TimerConfig};
use crate::error::ValidationError;
use crate::events::Event;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    BreakRunning,
    BreakPaused,
}

/// Presentation-ready view of the countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerDisplay {
    pub state: TimerState,
    /// `mm:ss` of the remaining time.
    pub clock: String,
    /// 0.0 .. 1.0 of the active interval.
    pub progress: f64,
    pub subject: Option<String>,
    pub on_break: bool,
}

/// Core timer engine.
///
/// One countdown at a time; starting requires `Idle` (or resumes from
/// `Paused`). Serializable so a host can persist it between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    config: TimerConfig,
    state: TimerState,
    /// The active work interval. `Some` while `Running` or `Paused`.
    #[serde(default)]
    interval: Option<Interval>,
    /// Break countdown, valid in `BreakRunning`/`BreakPaused`.
    break_total_secs: u32,
    break_remaining_secs: u32,
}

impl TimerEngine {
    /// Create a new engine in `Idle` with the configured work duration
    /// loaded for display.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            state: TimerState::Idle,
            interval: None,
            break_total_secs: 0,
            break_remaining_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn interval(&self) -> Option<&Interval> {
        self.interval.as_ref()
    }

    pub fn remaining_secs(&self) -> u32 {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.interval.as_ref().map(|i| i.remaining_secs).unwrap_or(0)
            }
            TimerState::BreakRunning | TimerState::BreakPaused => self.break_remaining_secs,
            TimerState::Idle => self.config.work_min.saturating_mul(60),
        }
    }

    pub fn total_secs(&self) -> u32 {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.interval.as_ref().map(|i| i.total_secs).unwrap_or(0)
            }
            TimerState::BreakRunning | TimerState::BreakPaused => self.break_total_secs,
            TimerState::Idle => self.config.work_min.saturating_mul(60),
        }
    }

    /// 0.0 .. 1.0 progress within the active countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs() as f64 / total as f64)
    }

    /// `mm:ss` of the remaining time.
    pub fn clock(&self) -> String {
        let remaining = self.remaining_secs();
        format!("{:02}:{:02}", remaining / 60, remaining % 60)
    }

    pub fn display(&self) -> TimerDisplay {
        TimerDisplay {
            state: self.state,
            clock: self.clock(),
            progress: self.progress(),
            subject: self.interval.as_ref().and_then(|i| i.subject.clone()),
            on_break: matches!(
                self.state,
                TimerState::BreakRunning | TimerState::BreakPaused
            ),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            state: self.state,
            kind: self.interval.as_ref().map(|i| i.kind),
            subject: self.interval.as_ref().and_then(|i| i.subject.clone()),
            remaining_secs: self.remaining_secs(),
            total_secs: self.total_secs(),
            progress: self.progress(),
            clock: self.clock(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a new interval from `Idle`, or resume a paused countdown.
    ///
    /// Resuming keeps the stored remaining/total and does not move the
    /// interval's `started_at`. Returns `None` when already running.
    pub fn start(
        &mut self,
        request: StartRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, ValidationError> {
        match self.state {
            TimerState::Idle => {
                let minutes = request.minutes(&self.config)?;
                let total_secs = minutes.saturating_mul(60);
                let interval = Interval {
                    kind: request.kind.unwrap_or(crate::session::SessionKind::Pomodoro),
                    subject: request.subject(),
                    total_secs,
                    remaining_secs: total_secs,
                    started_at: now,
                };
                let event = Event::TimerStarted {
                    kind: interval.kind,
                    subject: interval.subject.clone(),
                    duration_secs: total_secs,
                    at: now,
                };
                self.interval = Some(interval);
                self.state = TimerState::Running;
                Ok(Some(event))
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                Ok(Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs(),
                    at: now,
                }))
            }
            TimerState::BreakPaused => {
                self.state = TimerState::BreakRunning;
                Ok(Some(Event::TimerResumed {
                    remaining_secs: self.break_remaining_secs,
                    at: now,
                }))
            }
            TimerState::Running | TimerState::BreakRunning => Ok(None), // Already running.
        }
    }

    /// Freeze the countdown. No-op unless running.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs(),
                    at: now,
                })
            }
            TimerState::BreakRunning => {
                self.state = TimerState::BreakPaused;
                Some(Event::TimerPaused {
                    remaining_secs: self.break_remaining_secs,
                    at: now,
                })
            }
            _ => None,
        }
    }

    /// Discard all runtime state and reload the configured work duration.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.state = TimerState::Idle;
        self.interval = None;
        self.break_total_secs = 0;
        self.break_remaining_secs = 0;
        Some(Event::TimerReset { at: now })
    }

    /// Replace the duration configuration. Takes effect on the next
    /// interval; the active countdown is left alone.
    pub fn set_config(&mut self, config: TimerConfig) {
        self.config = config;
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the completion event when the countdown reaches zero:
    /// `SessionCompleted` for a work interval with a subject,
    /// `BreakStarted` for one without, `BreakEnded` when a break runs out.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                let interval = self.interval.as_mut()?;
                interval.remaining_secs = interval.remaining_secs.saturating_sub(1);
                if interval.remaining_secs == 0 {
                    return Some(self.complete_work(now));
                }
                None
            }
            TimerState::BreakRunning => {
                self.break_remaining_secs = self.break_remaining_secs.saturating_sub(1);
                if self.break_remaining_secs == 0 {
                    self.state = TimerState::Idle;
                    self.break_total_secs = 0;
                    return Some(Event::BreakEnded { at: now });
                }
                None
            }
            _ => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Finish the running work interval and enter the break countdown.
    ///
    /// Duration is rounded from the nominal total, never from elapsed
    /// time, so a full interval always counts as its nominal length.
    fn complete_work(&mut self, now: DateTime<Utc>) -> Event {
        let interval = self.interval.take();
        let break_secs = self.config.break_min.saturating_mul(60);
        self.break_total_secs = break_secs;
        self.break_remaining_secs = break_secs;
        self.state = TimerState::BreakRunning;

        match interval {
            Some(interval) => match &interval.subject {
                Some(subject) => Event::SessionCompleted {
                    session: Session {
                        id: Uuid::new_v4(),
                        subject: subject.clone(),
                        duration: interval.duration_min(),
                        start_time: interval.started_at,
                        end_time: now,
                        kind: interval.kind,
                    },
                },
                // No subject selected: the interval is discarded, the
                // break still starts.
                None => Event::BreakStarted {
                    duration_secs: break_secs,
                    at: now,
                },
            },
            None => Event::BreakStarted {
                duration_secs: break_secs,
                at: now,
            },
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKind;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 4, 9, 0, 0).unwrap()
    }

    fn work_request(subject: &str) -> StartRequest {
        StartRequest {
            kind: Some(SessionKind::Pomodoro),
            custom_minutes: None,
            subject: Some(subject.to_string()),
        }
    }

    fn run_to_completion(engine: &mut TimerEngine, now: DateTime<Utc>) -> Event {
        loop {
            if let Some(event) = engine.tick(now) {
                return event;
            }
        }
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = TimerEngine::default();
        assert_eq!(engine.state(), TimerState::Idle);

        assert!(engine.start(work_request("Accountancy"), t0()).unwrap().is_some());
        assert_eq!(engine.state(), TimerState::Running);

        assert!(engine.pause(t0()).is_some());
        assert_eq!(engine.state(), TimerState::Paused);

        assert!(engine.start(StartRequest::default(), t0()).unwrap().is_some());
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn resume_does_not_reset_started_at() {
        let mut engine = TimerEngine::default();
        engine.start(work_request("Accountancy"), t0()).unwrap();
        engine.tick(t0());
        engine.pause(t0());

        let later = t0() + chrono::Duration::minutes(10);
        engine.start(StartRequest::default(), later).unwrap();
        assert_eq!(engine.interval().unwrap().started_at, t0());
    }

    #[test]
    fn resume_keeps_remaining() {
        let mut engine = TimerEngine::default();
        engine.start(work_request("Accountancy"), t0()).unwrap();
        for _ in 0..60 {
            engine.tick(t0());
        }
        engine.pause(t0());
        assert_eq!(engine.remaining_secs(), 25 * 60 - 60);

        engine.start(StartRequest::default(), t0()).unwrap();
        assert_eq!(engine.remaining_secs(), 25 * 60 - 60);
    }

    #[test]
    fn completion_with_subject_emits_session() {
        let mut engine = TimerEngine::new(TimerConfig {
            work_min: 1,
            break_min: 5,
            long_break_min: 15,
        });
        engine.start(work_request("Business Law"), t0()).unwrap();

        let end = t0() + chrono::Duration::seconds(60);
        let event = run_to_completion(&mut engine, end);
        match event {
            Event::SessionCompleted { session } => {
                assert_eq!(session.subject, "Business Law");
                assert_eq!(session.duration, 1);
                assert_eq!(session.start_time, t0());
                assert_eq!(session.end_time, end);
                assert_eq!(session.kind, SessionKind::Pomodoro);
            }
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
        assert_eq!(engine.state(), TimerState::BreakRunning);
        assert_eq!(engine.remaining_secs(), 5 * 60);
    }

    #[test]
    fn completion_without_subject_discards_interval() {
        let mut engine = TimerEngine::new(TimerConfig {
            work_min: 1,
            break_min: 5,
            long_break_min: 15,
        });
        engine
            .start(
                StartRequest {
                    kind: Some(SessionKind::Pomodoro),
                    custom_minutes: None,
                    subject: None,
                },
                t0(),
            )
            .unwrap();

        let event = run_to_completion(&mut engine, t0());
        assert!(matches!(event, Event::BreakStarted { .. }));
        assert_eq!(engine.state(), TimerState::BreakRunning);
    }

    #[test]
    fn break_completion_returns_to_idle_with_work_duration() {
        let mut engine = TimerEngine::new(TimerConfig {
            work_min: 25,
            break_min: 1,
            long_break_min: 15,
        });
        engine.start(work_request("Accountancy"), t0()).unwrap();
        for _ in 0..25 * 60 {
            engine.tick(t0());
        }
        assert_eq!(engine.state(), TimerState::BreakRunning);

        let event = run_to_completion(&mut engine, t0());
        assert!(matches!(event, Event::BreakEnded { .. }));
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 25 * 60);
    }

    #[test]
    fn break_can_pause_and_resume() {
        let mut engine = TimerEngine::new(TimerConfig {
            work_min: 1,
            break_min: 5,
            long_break_min: 15,
        });
        engine.start(work_request("Accountancy"), t0()).unwrap();
        run_to_completion(&mut engine, t0());

        engine.tick(t0());
        assert!(engine.pause(t0()).is_some());
        assert_eq!(engine.state(), TimerState::BreakPaused);
        let remaining = engine.remaining_secs();

        assert!(engine.start(StartRequest::default(), t0()).unwrap().is_some());
        assert_eq!(engine.state(), TimerState::BreakRunning);
        assert_eq!(engine.remaining_secs(), remaining);
    }

    #[test]
    fn reset_discards_runtime_state() {
        let mut engine = TimerEngine::default();
        engine.start(work_request("Accountancy"), t0()).unwrap();
        engine.tick(t0());
        engine.reset(t0());
        assert_eq!(engine.state(), TimerState::Idle);
        assert!(engine.interval().is_none());
        assert_eq!(engine.remaining_secs(), 25 * 60);
    }

    #[test]
    fn tick_is_noop_when_idle_or_paused() {
        let mut engine = TimerEngine::default();
        assert!(engine.tick(t0()).is_none());
        engine.start(work_request("Accountancy"), t0()).unwrap();
        engine.pause(t0());
        let before = engine.remaining_secs();
        assert!(engine.tick(t0()).is_none());
        assert_eq!(engine.remaining_secs(), before);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut engine = TimerEngine::default();
        engine.start(work_request("Accountancy"), t0()).unwrap();
        engine.tick(t0());
        let remaining = engine.remaining_secs();
        assert!(engine.start(work_request("Business Law"), t0()).unwrap().is_none());
        assert_eq!(engine.remaining_secs(), remaining);
        assert_eq!(engine.interval().unwrap().subject.as_deref(), Some("Accountancy"));
    }

    #[test]
    fn custom_interval_duration_rounds_nominal_total() {
        let mut engine = TimerEngine::default();
        engine
            .start(
                StartRequest {
                    kind: Some(SessionKind::Custom),
                    custom_minutes: Some(2),
                    subject: Some("Accountancy".to_string()),
                },
                t0(),
            )
            .unwrap();
        // Completion fires on the 120th tick however late the driver is.
        let event = run_to_completion(&mut engine, t0() + chrono::Duration::seconds(300));
        match event {
            Event::SessionCompleted { session } => assert_eq!(session.duration, 2),
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
    }

    #[test]
    fn clock_formats_mm_ss() {
        let mut engine = TimerEngine::default();
        assert_eq!(engine.clock(), "25:00");
        engine.start(work_request("Accountancy"), t0()).unwrap();
        engine.tick(t0());
        assert_eq!(engine.clock(), "24:59");
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut engine = TimerEngine::default();
        engine.start(work_request("Accountancy"), t0()).unwrap();
        for _ in 0..(25 * 60 / 2) {
            engine.tick(t0());
        }
        match engine.snapshot(t0()) {
            Event::StateSnapshot { progress, .. } => {
                assert!((progress - 0.5).abs() < 0.01);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn engine_roundtrips_through_serde() {
        let mut engine = TimerEngine::default();
        engine.start(work_request("Accountancy"), t0()).unwrap();
        engine.tick(t0());
        let json = serde_json::to_string(&engine).unwrap();
        let restored: TimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), TimerState::Running);
        assert_eq!(restored.remaining_secs(), engine.remaining_secs());
        assert_eq!(restored.interval().unwrap().started_at, t0());
    }
}
