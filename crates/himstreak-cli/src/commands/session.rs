use chrono::Local;
use clap::Subcommand;
use himstreak_core::Session;

use crate::common;

#[derive(Subcommand)]
pub enum SessionAction {
    /// List recorded sessions, newest first
    List {
        /// Show at most this many
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Per-subject minute totals
    Totals {
        /// Report a single subject instead of all of them
        #[arg(long)]
        subject: Option<String>,
    },
    /// Count/average summary for the history view
    Summary,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = common::open_tracker()?;

    match action {
        SessionAction::List { limit } => {
            let sessions: Vec<&Session> = tracker.sessions().recent(limit);
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        SessionAction::Totals { subject } => match subject {
            Some(name) => {
                let minutes = tracker.sessions().minutes_for_subject(&name);
                println!(
                    "{}",
                    serde_json::json!({ "subject": name, "minutes": minutes })
                );
            }
            None => {
                let totals = tracker.sessions().totals_by_subject();
                println!("{}", serde_json::to_string_pretty(&totals)?);
            }
        },
        SessionAction::Summary => {
            let summary = tracker.session_summary(Local::now().date_naive());
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
