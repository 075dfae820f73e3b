//! Application controller.
//!
//! `StudyTracker` owns the aggregate state, the subject list, the timer
//! engine, and the persistence gateway. All mutation goes through its
//! command methods on a single thread; each command returns the event
//! the presentation layer renders.
//!
//! Save failures never interrupt a command: they are logged and the
//! in-memory state stays authoritative until the next successful save.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::error::{ConfigError, CoreError, StorageError, ValidationError};
use crate::events::Event;
use crate::goal::{Goal, GoalDraft};
use crate::habit::{Habit, HabitDraft, HabitSummary};
use crate::note::{self, Note, NoteDraft, NoteFilter};
use crate::session::SessionLog;
use crate::state::{AggregateState, StateStore};
use crate::stats::{DashboardStats, SessionSummary};
use crate::storage::Settings;
use crate::subject::{recompute_totals, Subject};
use crate::task::{self, Task, TaskDraft, TaskFilter};
use crate::timer::{StartRequest, TimerDisplay, TimerEngine};

pub struct StudyTracker {
    state: AggregateState,
    subjects: Vec<Subject>,
    engine: TimerEngine,
    store: Box<dyn StateStore>,
    /// Outcome of the most recent save attempt, for the presentation
    /// layer to surface as a non-blocking notification.
    last_save: Option<Event>,
}

impl StudyTracker {
    /// Load persisted state from the store, or start fresh when nothing
    /// is stored yet.
    ///
    /// # Errors
    /// Returns an error when the store fails to load -- a corrupt or
    /// unreachable document, as opposed to a missing one.
    pub fn new(store: Box<dyn StateStore>) -> Result<Self, CoreError> {
        let state = store.load()?.unwrap_or_default();
        Ok(Self::with_state(state, store))
    }

    /// Build a tracker around already-loaded state.
    pub fn with_state(state: AggregateState, store: Box<dyn StateStore>) -> Self {
        let mut subjects = Subject::default_set();
        recompute_totals(&mut subjects, &state.sessions);
        let engine = TimerEngine::new(state.settings.timer_config());
        Self {
            state,
            subjects,
            engine,
            store,
            last_save: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &AggregateState {
        &self.state
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.state.sessions
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    /// Replace the engine with one restored by the host (the CLI keeps
    /// it in the kv store between invocations). Current settings take
    /// over for the next interval; an active countdown is untouched.
    pub fn restore_engine(&mut self, mut engine: TimerEngine) {
        engine.set_config(self.state.settings.timer_config());
        self.engine = engine;
    }

    pub fn timer_display(&self) -> TimerDisplay {
        self.engine.display()
    }

    pub fn dashboard(&self, today: NaiveDate) -> DashboardStats {
        DashboardStats::compute(&self.state, today)
    }

    pub fn session_summary(&self, today: NaiveDate) -> SessionSummary {
        SessionSummary::compute(&self.state.sessions, today)
    }

    pub fn tasks(&self, filter: &TaskFilter) -> Vec<&Task> {
        task::filtered(&self.state.tasks, filter)
    }

    pub fn notes(&self, filter: &NoteFilter) -> Vec<&Note> {
        note::filtered(&self.state.notes, filter)
    }

    pub fn habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn habit_summary(&self) -> HabitSummary {
        HabitSummary::compute(&self.state.habits)
    }

    pub fn goals(&self) -> &[Goal] {
        &self.state.goals
    }

    // ── Timer commands ───────────────────────────────────────────────

    /// Start a new interval or resume a paused one.
    pub fn start_timer(
        &mut self,
        request: StartRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, ValidationError> {
        self.engine.start(request, now)
    }

    pub fn pause_timer(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.engine.pause(now)
    }

    pub fn reset_timer(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.engine.reset(now)
    }

    /// Advance the countdown by one second and apply whatever completed.
    ///
    /// A completed work interval with a subject appends exactly one
    /// session to the log, refreshes subject totals, and persists.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let event = self.engine.tick(now)?;
        if let Event::SessionCompleted { session } = &event {
            self.state.sessions.record(session.clone());
            recompute_totals(&mut self.subjects, &self.state.sessions);
            self.persist(now);
        }
        Some(event)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(
        &mut self,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let task = draft.into_task(now)?;
        let event = Event::TaskAdded {
            id: task.id,
            title: task.title.clone(),
            at: now,
        };
        self.state.tasks.push(task);
        self.persist(now);
        Ok(event)
    }

    /// Flip completion. Returns `None` (and changes nothing) when the
    /// id is unknown.
    pub fn toggle_task(&mut self, id: Uuid, now: DateTime<Utc>) -> Option<Event> {
        let task = self.state.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
        let completed = task.completed;
        self.persist(now);
        Some(Event::TaskToggled {
            id,
            completed,
            at: now,
        })
    }

    pub fn delete_task(&mut self, id: Uuid, now: DateTime<Utc>) -> Option<Event> {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.id != id);
        if self.state.tasks.len() == before {
            return None;
        }
        self.persist(now);
        Some(Event::TaskDeleted { id, at: now })
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn add_note(
        &mut self,
        draft: NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let note = draft.into_note(now)?;
        let event = Event::NoteSaved {
            id: note.id,
            title: note.title.clone(),
            at: now,
        };
        self.state.notes.push(note);
        self.persist(now);
        Ok(event)
    }

    /// Apply edits to an existing note. `Ok(None)` when the id is
    /// unknown; the note's creation time is kept.
    pub fn update_note(
        &mut self,
        id: Uuid,
        draft: NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, ValidationError> {
        draft.validate()?;
        let Some(note) = self.state.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        note.title = draft.title.trim().to_string();
        note.subject = draft.subject;
        note.content = draft.content;
        note.tags = draft.tags;
        note.updated_at = now;
        let title = note.title.clone();
        self.persist(now);
        Ok(Some(Event::NoteSaved { id, title, at: now }))
    }

    pub fn delete_note(&mut self, id: Uuid, now: DateTime<Utc>) -> Option<Event> {
        let before = self.state.notes.len();
        self.state.notes.retain(|n| n.id != id);
        if self.state.notes.len() == before {
            return None;
        }
        self.persist(now);
        Some(Event::NoteDeleted { id, at: now })
    }

    // ── Habits ───────────────────────────────────────────────────────

    pub fn add_habit(
        &mut self,
        draft: HabitDraft,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let habit = draft.into_habit(now)?;
        let event = Event::HabitAdded {
            id: habit.id,
            name: habit.name.clone(),
            at: now,
        };
        self.state.habits.push(habit);
        self.persist(now);
        Ok(event)
    }

    pub fn toggle_habit(&mut self, id: Uuid, now: DateTime<Utc>) -> Option<Event> {
        let habit = self.state.habits.iter_mut().find(|h| h.id == id)?;
        let completed = habit.toggle();
        let streak = habit.streak;
        self.persist(now);
        Some(Event::HabitToggled {
            id,
            completed,
            streak,
            at: now,
        })
    }

    // ── Goals ────────────────────────────────────────────────────────

    pub fn add_goal(
        &mut self,
        draft: GoalDraft,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let goal = draft.into_goal(now)?;
        let event = Event::GoalAdded {
            id: goal.id,
            title: goal.title.clone(),
            at: now,
        };
        self.state.goals.push(goal);
        self.persist(now);
        Ok(event)
    }

    /// Set a goal's progress (clamped to its target). `None` when the
    /// id is unknown.
    pub fn progress_goal(&mut self, id: Uuid, progress: u32, now: DateTime<Utc>) -> Option<Event> {
        let goal = self.state.goals.iter_mut().find(|g| g.id == id)?;
        goal.set_progress(progress);
        let (progress, target) = (goal.progress, goal.target);
        self.persist(now);
        Some(Event::GoalProgressed {
            id,
            progress,
            target,
            at: now,
        })
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Replace the settings after validating them. The timer engine
    /// picks the new durations up for its next interval.
    pub fn update_settings(
        &mut self,
        settings: Settings,
        now: DateTime<Utc>,
    ) -> Result<(), ConfigError> {
        settings.validate()?;
        self.engine.set_config(settings.timer_config());
        self.state.settings = settings;
        self.persist(now);
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Save and report the outcome, for callers that want to surface it.
    pub fn save(&mut self, now: DateTime<Utc>) -> Result<(), StorageError> {
        self.state.last_updated = now;
        self.store.save(&self.state)
    }

    /// Outcome of the most recent save attempt (`StateSaved` or
    /// `SaveFailed`), if any save has happened.
    pub fn last_save_outcome(&self) -> Option<&Event> {
        self.last_save.as_ref()
    }

    /// Fire-and-forget save used on the command path. Failures are
    /// logged; in-memory state remains authoritative.
    fn persist(&mut self, now: DateTime<Utc>) {
        self.state.last_updated = now;
        self.last_save = Some(match self.store.save(&self.state) {
            Ok(()) => Event::StateSaved { at: now },
            Err(e) => {
                warn!(error = %e, "state save failed, keeping in-memory state");
                Event::SaveFailed {
                    reason: e.to_string(),
                    at: now,
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKind;
    use crate::state::MemoryStore;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 4, 9, 0, 0).unwrap()
    }

    fn tracker() -> StudyTracker {
        StudyTracker::new(Box::new(MemoryStore::new())).unwrap()
    }

    /// Store that always fails to save.
    struct FailingStore;

    impl StateStore for FailingStore {
        fn load(&self) -> Result<Option<AggregateState>, StorageError> {
            Ok(None)
        }
        fn save(&self, _state: &AggregateState) -> Result<(), StorageError> {
            Err(StorageError::QueryFailed("disk full".to_string()))
        }
    }

    #[test]
    fn completed_interval_lands_in_log_and_subject_totals() {
        let mut tracker = tracker();
        let mut settings = tracker.settings().clone();
        settings.pomodoro_work = 1;
        tracker.update_settings(settings, t0()).unwrap();

        tracker
            .start_timer(
                StartRequest {
                    kind: Some(SessionKind::Pomodoro),
                    custom_minutes: None,
                    subject: Some("Accountancy".to_string()),
                },
                t0(),
            )
            .unwrap();

        let mut completed = None;
        for _ in 0..60 {
            if let Some(Event::SessionCompleted { session }) = tracker.tick(t0()) {
                completed = Some(session);
            }
        }
        let session = completed.expect("work interval should complete");
        assert_eq!(session.duration, 1);
        assert_eq!(tracker.sessions().len(), 1);
        let subject = tracker
            .subjects()
            .iter()
            .find(|s| s.name == "Accountancy")
            .unwrap();
        assert_eq!(subject.total_min, 1);
    }

    #[test]
    fn toggle_task_on_missing_id_is_noop() {
        let mut tracker = tracker();
        assert!(tracker.toggle_task(Uuid::new_v4(), t0()).is_none());
        assert!(tracker.state().tasks.is_empty());
    }

    #[test]
    fn add_task_validates_before_mutating() {
        let mut tracker = tracker();
        let result = tracker.add_task(TaskDraft::default(), t0());
        assert!(result.is_err());
        assert!(tracker.state().tasks.is_empty());
    }

    #[test]
    fn toggle_task_sets_completed_at() {
        let mut tracker = tracker();
        let event = tracker
            .add_task(
                TaskDraft {
                    title: "Chapter 5".to_string(),
                    ..Default::default()
                },
                t0(),
            )
            .unwrap();
        let Event::TaskAdded { id, .. } = event else {
            panic!("expected TaskAdded");
        };

        tracker.toggle_task(id, t0()).unwrap();
        let task = &tracker.state().tasks[0];
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(t0()));

        tracker.toggle_task(id, t0()).unwrap();
        assert!(!tracker.state().tasks[0].completed);
        assert_eq!(tracker.state().tasks[0].completed_at, None);
    }

    #[test]
    fn update_note_replaces_fields_and_keeps_created_at() {
        let mut tracker = tracker();
        let event = tracker
            .add_note(
                NoteDraft {
                    title: "Draft".to_string(),
                    subject: "Business Law".to_string(),
                    content: "offer".to_string(),
                    tags: vec![],
                },
                t0(),
            )
            .unwrap();
        let Event::NoteSaved { id, .. } = event else {
            panic!("expected NoteSaved");
        };

        let later = t0() + chrono::Duration::hours(1);
        tracker
            .update_note(
                id,
                NoteDraft {
                    title: "Contract Act".to_string(),
                    subject: "Business Law".to_string(),
                    content: "offer and acceptance".to_string(),
                    tags: vec!["contracts".to_string()],
                },
                later,
            )
            .unwrap()
            .expect("note exists");

        let note = &tracker.state().notes[0];
        assert_eq!(note.title, "Contract Act");
        assert_eq!(note.tags, ["contracts"]);
        assert_eq!(note.created_at, t0());
        assert_eq!(note.updated_at, later);
    }

    #[test]
    fn update_note_on_missing_id_is_noop() {
        let mut tracker = tracker();
        let result = tracker
            .update_note(
                Uuid::new_v4(),
                NoteDraft {
                    title: "anything".to_string(),
                    ..Default::default()
                },
                t0(),
            )
            .unwrap();
        assert!(result.is_none());
        assert!(tracker.state().notes.is_empty());
    }

    #[test]
    fn save_failure_keeps_memory_state() {
        let mut tracker = StudyTracker::new(Box::new(FailingStore)).unwrap();
        tracker
            .add_task(
                TaskDraft {
                    title: "still here".to_string(),
                    ..Default::default()
                },
                t0(),
            )
            .unwrap();
        assert_eq!(tracker.state().tasks.len(), 1);
        assert!(matches!(
            tracker.last_save_outcome(),
            Some(Event::SaveFailed { .. })
        ));
        assert!(tracker.save(t0()).is_err());
        assert_eq!(tracker.state().tasks.len(), 1);
    }

    #[test]
    fn state_roundtrips_through_store() {
        let store = Box::new(MemoryStore::new());
        let mut tracker = StudyTracker::new(store).unwrap();
        tracker
            .add_note(
                NoteDraft {
                    title: "Offer and acceptance".to_string(),
                    subject: "Business Law".to_string(),
                    content: "essentials of a contract".to_string(),
                    tags: vec!["contracts".to_string()],
                },
                t0(),
            )
            .unwrap();
        let snapshot = tracker.state().clone();

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: AggregateState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.notes, snapshot.notes);
        assert_eq!(restored.settings, snapshot.settings);
    }

    #[test]
    fn update_settings_feeds_the_engine() {
        let mut tracker = tracker();
        let mut settings = tracker.settings().clone();
        settings.pomodoro_work = 30;
        tracker.update_settings(settings, t0()).unwrap();
        tracker
            .start_timer(StartRequest::default(), t0())
            .unwrap();
        assert_eq!(tracker.engine().remaining_secs(), 30 * 60);
    }

    #[test]
    fn update_settings_rejects_invalid() {
        let mut tracker = tracker();
        let mut settings = tracker.settings().clone();
        settings.pomodoro_break = 0;
        assert!(tracker.update_settings(settings, t0()).is_err());
        assert_eq!(tracker.settings().pomodoro_break, 5);
    }
}
