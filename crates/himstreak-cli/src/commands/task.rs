use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use himstreak_core::{TaskDraft, TaskFilter, TaskPriority, TaskStatus};

use crate::common;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl From<Priority> for TaskPriority {
    fn from(p: Priority) -> Self {
        match p {
            Priority::High => TaskPriority::High,
            Priority::Medium => TaskPriority::Medium,
            Priority::Low => TaskPriority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Status {
    Pending,
    Completed,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task
    Add {
        /// Task title
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, value_enum, default_value = "medium")]
        priority: Priority,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks (incomplete first, then priority, then newest)
    List {
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
    },
    /// Toggle completion
    Toggle {
        /// Task id
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task id
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = common::open_tracker()?;
    let now = Utc::now();

    match action {
        TaskAction::Add {
            title,
            description,
            subject,
            priority,
            due,
        } => {
            let due_date = due.as_deref().map(common::parse_date).transpose()?;
            let event = tracker.add_task(
                TaskDraft {
                    title,
                    description,
                    subject,
                    priority: priority.into(),
                    due_date,
                },
                now,
            )?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TaskAction::List {
            priority,
            subject,
            status,
        } => {
            let filter = TaskFilter {
                priority: priority.map(Into::into),
                subject,
                status: status.map(|s| match s {
                    Status::Pending => TaskStatus::Pending,
                    Status::Completed => TaskStatus::Completed,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&tracker.tasks(&filter))?);
        }
        TaskAction::Toggle { id } => {
            let id = common::parse_id(&id)?;
            match tracker.toggle_task(id, now) {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => common::print_not_found(id),
            }
        }
        TaskAction::Delete { id } => {
            let id = common::parse_id(&id)?;
            match tracker.delete_task(id, now) {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => common::print_not_found(id),
            }
        }
    }
    Ok(())
}
