use chrono::Utc;
use clap::Subcommand;
use himstreak_core::HabitDraft;

use crate::common;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a habit
    Add {
        /// Habit name
        name: String,
        #[arg(long)]
        icon: Option<String>,
        /// Target description ("30 min daily", ...)
        #[arg(long, default_value = "")]
        target: String,
    },
    /// List habits with summary numbers
    List,
    /// Toggle today's completion (grows or shrinks the streak)
    Toggle {
        /// Habit id
        id: String,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = common::open_tracker()?;
    let now = Utc::now();

    match action {
        HabitAction::Add { name, icon, target } => {
            let event = tracker.add_habit(HabitDraft { name, icon, target }, now)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        HabitAction::List => {
            let out = serde_json::json!({
                "habits": tracker.habits(),
                "summary": tracker.habit_summary(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        HabitAction::Toggle { id } => {
            let id = common::parse_id(&id)?;
            match tracker.toggle_habit(id, now) {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => common::print_not_found(id),
            }
        }
    }
    Ok(())
}
