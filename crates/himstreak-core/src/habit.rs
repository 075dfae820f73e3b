//! Daily habits with per-habit streak counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub target: String,
    /// Consecutive completions. Bumped on mark-done, dropped on undo.
    pub streak: u32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Flip completion. Marking done grows the streak; undoing shrinks
    /// it, never below zero. Returns the new completed flag.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        if self.completed {
            self.streak += 1;
        } else {
            self.streak = self.streak.saturating_sub(1);
        }
        self.completed
    }
}

/// Form input for creating a habit.
#[derive(Debug, Clone, Default)]
pub struct HabitDraft {
    pub name: String,
    pub icon: Option<String>,
    pub target: String,
}

impl HabitDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(())
    }

    pub fn into_habit(self, now: DateTime<Utc>) -> Result<Habit, ValidationError> {
        self.validate()?;
        Ok(Habit {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            icon: self.icon.unwrap_or_else(|| "\u{1F4DA}".to_string()),
            target: self.target,
            streak: 0,
            completed: false,
            created_at: now,
        })
    }
}

/// Aggregate numbers for the habit view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HabitSummary {
    pub active: usize,
    pub best_streak: u32,
    /// Share of habits marked done, as a percentage.
    pub done_today_pct: u32,
}

impl HabitSummary {
    pub fn compute(habits: &[Habit]) -> Self {
        let active = habits.len();
        let best_streak = habits.iter().map(|h| h.streak).max().unwrap_or(0);
        let done = habits.iter().filter(|h| h.completed).count();
        let done_today_pct = if active > 0 {
            ((done as f64 / active as f64) * 100.0).round() as u32
        } else {
            0
        };
        Self {
            active,
            best_streak,
            done_today_pct,
        }
    }
}
