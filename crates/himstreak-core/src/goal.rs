//! Long-running goals with a numeric target and progress.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub target: u32,
    /// Unit label for display ("hours", "chapters", ...).
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub progress: u32,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn completion_pct(&self) -> u32 {
        if self.target == 0 {
            return 0;
        }
        ((self.progress as f64 / self.target as f64) * 100.0).round() as u32
    }

    /// Days until the deadline; negative when overdue, `None` without
    /// a deadline.
    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        self.deadline
            .map(|deadline| (deadline - today).num_days())
    }

    /// Set progress, clamped to the target.
    pub fn set_progress(&mut self, progress: u32) {
        self.progress = progress.min(self.target);
    }
}

/// Form input for creating a goal.
#[derive(Debug, Clone, Default)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub target: u32,
    pub unit: String,
    pub deadline: Option<NaiveDate>,
}

impl GoalDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.target == 0 {
            return Err(ValidationError::InvalidValue {
                field: "target",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn into_goal(self, now: DateTime<Utc>) -> Result<Goal, ValidationError> {
        self.validate()?;
        Ok(Goal {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            description: self.description,
            target: self.target,
            unit: if self.unit.is_empty() {
                "hours".to_string()
            } else {
                self.unit
            },
            deadline: self.deadline,
            progress: 0,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: u32) -> Goal {
        GoalDraft {
            title: "Finish syllabus".to_string(),
            target,
            ..Default::default()
        }
        .into_goal(Utc::now())
        .unwrap()
    }

    #[test]
    fn progress_is_clamped_to_target() {
        let mut g = goal(10);
        g.set_progress(15);
        assert_eq!(g.progress, 10);
        assert_eq!(g.completion_pct(), 100);
    }

    #[test]
    fn completion_pct_rounds() {
        let mut g = goal(3);
        g.set_progress(1);
        assert_eq!(g.completion_pct(), 33);
    }

    #[test]
    fn days_left_counts_from_today() {
        let mut g = goal(10);
        g.deadline = NaiveDate::from_ymd_opt(2025, 8, 10);
        let today = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();
        assert_eq!(g.days_left(today), Some(6));
        g.deadline = NaiveDate::from_ymd_opt(2025, 8, 1);
        assert_eq!(g.days_left(today), Some(-3));
    }

    #[test]
    fn draft_rejects_zero_target() {
        let draft = GoalDraft {
            title: "x".to_string(),
            target: 0,
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }
}
