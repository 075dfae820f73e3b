use chrono::Local;
use clap::Subcommand;
use himstreak_core::stats;

use crate::common;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Minutes studied today
    Today,
    /// Minutes studied this week (Sunday start)
    Week,
    /// Current consecutive-study-day streak
    Streak,
    /// Last-7-days chart series
    Daily,
    /// Last-4-weeks chart series
    Weekly,
    /// Headline dashboard numbers
    Dashboard,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = common::open_tracker()?;
    let today = Local::now().date_naive();
    let log = tracker.sessions();

    match action {
        StatsAction::Today => {
            let minutes = stats::minutes_on_day(log, today);
            println!(
                "{}",
                serde_json::json!({ "date": today, "minutes": minutes })
            );
        }
        StatsAction::Week => {
            let week_start = stats::week_start_of(today);
            let minutes = stats::minutes_in_week(log, week_start);
            println!(
                "{}",
                serde_json::json!({ "weekStart": week_start, "minutes": minutes })
            );
        }
        StatsAction::Streak => {
            let streak = stats::current_streak(log, today);
            println!("{}", serde_json::json!({ "streakDays": streak }));
        }
        StatsAction::Daily => {
            let series = stats::daily_series(log, today);
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        StatsAction::Weekly => {
            let series = stats::weekly_series(log, today);
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        StatsAction::Dashboard => {
            let dashboard = tracker.dashboard(today);
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        }
    }
    Ok(())
}
