//! Task records: priority, due date, completion.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Task priority, used for ordering task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl TaskPriority {
    /// Higher rank sorts first.
    fn rank(self) -> u8 {
        match self {
            TaskPriority::High => 3,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Form input for creating or editing a task. Validated before it
/// touches any state.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        Ok(())
    }

    pub fn into_task(self, now: DateTime<Utc>) -> Result<Task, ValidationError> {
        self.validate()?;
        Ok(Task {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            description: self.description,
            subject: self.subject,
            priority: self.priority,
            due_date: self.due_date,
            completed: false,
            created_at: now,
            completed_at: None,
        })
    }
}

/// Completion filter for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub priority: Option<TaskPriority>,
    pub subject: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Filtered view, ordered the way the task list renders: incomplete
/// first, then by priority, then newest.
pub fn filtered<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks
        .iter()
        .filter(|t| filter.priority.map(|p| t.priority == p).unwrap_or(true))
        .filter(|t| {
            filter
                .subject
                .as_deref()
                .map(|s| t.subject == s)
                .unwrap_or(true)
        })
        .filter(|t| match filter.status {
            Some(TaskStatus::Completed) => t.completed,
            Some(TaskStatus::Pending) => !t.completed,
            None => true,
        })
        .collect();
    out.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then(b.priority.rank().cmp(&a.priority.rank()))
            .then(b.created_at.cmp(&a.created_at))
    });
    out
}
