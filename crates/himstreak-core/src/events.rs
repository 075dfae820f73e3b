use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Session, SessionKind};
use crate::timer::TimerState;

/// Every state change in the core produces an Event.
/// The presentation layer renders them; it never reaches into the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        kind: SessionKind,
        subject: Option<String>,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A work interval finished with a subject selected; exactly one
    /// session was recorded.
    SessionCompleted {
        session: Session,
    },
    /// A break countdown began (after every completed work interval,
    /// with or without a recorded session).
    BreakStarted {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// A break countdown finished; the timer is idle again.
    BreakEnded {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        kind: Option<SessionKind>,
        subject: Option<String>,
        remaining_secs: u32,
        total_secs: u32,
        progress: f64,
        clock: String,
        at: DateTime<Utc>,
    },
    TaskAdded {
        id: Uuid,
        title: String,
        at: DateTime<Utc>,
    },
    TaskToggled {
        id: Uuid,
        completed: bool,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        id: Uuid,
        at: DateTime<Utc>,
    },
    NoteSaved {
        id: Uuid,
        title: String,
        at: DateTime<Utc>,
    },
    NoteDeleted {
        id: Uuid,
        at: DateTime<Utc>,
    },
    HabitAdded {
        id: Uuid,
        name: String,
        at: DateTime<Utc>,
    },
    HabitToggled {
        id: Uuid,
        completed: bool,
        streak: u32,
        at: DateTime<Utc>,
    },
    GoalAdded {
        id: Uuid,
        title: String,
        at: DateTime<Utc>,
    },
    GoalProgressed {
        id: Uuid,
        progress: u32,
        target: u32,
        at: DateTime<Utc>,
    },
    StateSaved {
        at: DateTime<Utc>,
    },
    /// A save failed. In-memory state stays authoritative; the next
    /// successful save catches the store up.
    SaveFailed {
        reason: String,
        at: DateTime<Utc>,
    },
}
