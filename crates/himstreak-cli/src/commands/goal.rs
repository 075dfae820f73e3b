use chrono::{Local, Utc};
use clap::Subcommand;
use himstreak_core::GoalDraft;

use crate::common;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a goal
    Add {
        /// Goal title
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Target amount
        #[arg(long)]
        target: u32,
        /// Unit label
        #[arg(long, default_value = "hours")]
        unit: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List goals with completion and days left
    List,
    /// Set a goal's progress (clamped to its target)
    Progress {
        /// Goal id
        id: String,
        /// New progress value
        value: u32,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = common::open_tracker()?;
    let now = Utc::now();

    match action {
        GoalAction::Add {
            title,
            description,
            target,
            unit,
            deadline,
        } => {
            let deadline = deadline.as_deref().map(common::parse_date).transpose()?;
            let event = tracker.add_goal(
                GoalDraft {
                    title,
                    description,
                    target,
                    unit,
                    deadline,
                },
                now,
            )?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        GoalAction::List => {
            let today = Local::now().date_naive();
            let rows: Vec<serde_json::Value> = tracker
                .goals()
                .iter()
                .map(|g| {
                    serde_json::json!({
                        "goal": g,
                        "completionPct": g.completion_pct(),
                        "daysLeft": g.days_left(today),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        GoalAction::Progress { id, value } => {
            let id = common::parse_id(&id)?;
            match tracker.progress_goal(id, value, now) {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => common::print_not_found(id),
            }
        }
    }
    Ok(())
}
