//! Aggregation over the session log.
//!
//! Day/week rollups, the consecutive-study-day streak, and the chart
//! series the dashboard renders. Everything here is a pure derived view:
//! functions take the log plus explicit dates, hold no state, and
//! recompute on every call.
//!
//! Sessions are bucketed by the local calendar day of their start
//! timestamp. Weeks start on Sunday.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionLog;
use crate::state::AggregateState;

/// Local calendar day a session started on.
fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Sum of durations of sessions starting within the given local day.
pub fn minutes_on_day(log: &SessionLog, day: NaiveDate) -> u32 {
    log.iter()
        .filter(|s| local_day(s.start_time) == day)
        .map(|s| s.duration)
        .sum()
}

/// The Sunday on or before `day`.
pub fn week_start_of(day: NaiveDate) -> NaiveDate {
    let back = day.weekday().num_days_from_sunday() as u64;
    day.checked_sub_days(Days::new(back)).unwrap_or(day)
}

/// Sum of durations over the 7-day window beginning at `week_start`.
pub fn minutes_in_week(log: &SessionLog, week_start: NaiveDate) -> u32 {
    let week_end = week_start.checked_add_days(Days::new(7));
    log.iter()
        .filter(|s| {
            let day = local_day(s.start_time);
            day >= week_start && week_end.map(|end| day < end).unwrap_or(true)
        })
        .map(|s| s.duration)
        .sum()
}

/// Count of consecutive days with at least one session, ending at
/// `as_of` and walking backward. Stops at the first empty day -- a day
/// without sessions breaks the streak, including `as_of` itself.
pub fn current_streak(log: &SessionLog, as_of: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = as_of;
    loop {
        if log.iter().all(|s| local_day(s.start_time) != day) {
            return streak;
        }
        streak += 1;
        day = match day.checked_sub_days(Days::new(1)) {
            Some(prev) => prev,
            None => return streak,
        };
    }
}

/// One point of the daily chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMinutes {
    pub date: NaiveDate,
    pub minutes: u32,
}

/// One point of the weekly chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekMinutes {
    pub week_start: NaiveDate,
    pub minutes: u32,
}

/// The last 7 days ending at `as_of`, oldest first.
pub fn daily_series(log: &SessionLog, as_of: NaiveDate) -> Vec<DayMinutes> {
    (0..7)
        .rev()
        .filter_map(|back| as_of.checked_sub_days(Days::new(back)))
        .map(|date| DayMinutes {
            date,
            minutes: minutes_on_day(log, date),
        })
        .collect()
}

/// The last 4 weeks, oldest first. The final entry is the week
/// containing `as_of`.
pub fn weekly_series(log: &SessionLog, as_of: NaiveDate) -> Vec<WeekMinutes> {
    let current = week_start_of(as_of);
    (0..4)
        .rev()
        .filter_map(|back| current.checked_sub_days(Days::new(back * 7)))
        .map(|week_start| WeekMinutes {
            week_start,
            minutes: minutes_in_week(log, week_start),
        })
        .collect()
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardStats {
    pub today_min: u32,
    pub week_min: u32,
    pub streak_days: u32,
    /// Completed tasks as a percentage of all tasks; 0 with no tasks.
    pub goal_progress_pct: u32,
}

impl DashboardStats {
    pub fn compute(state: &AggregateState, today: NaiveDate) -> Self {
        let completed = state.tasks.iter().filter(|t| t.completed).count();
        let total = state.tasks.len();
        let goal_progress_pct = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        Self {
            today_min: minutes_on_day(&state.sessions, today),
            week_min: minutes_in_week(&state.sessions, week_start_of(today)),
            streak_days: current_streak(&state.sessions, today),
            goal_progress_pct,
        }
    }
}

/// Figures for the session history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionSummary {
    pub total_sessions: usize,
    pub avg_duration_min: u32,
    pub sessions_this_week: usize,
}

impl SessionSummary {
    pub fn compute(log: &SessionLog, today: NaiveDate) -> Self {
        let total_sessions = log.len();
        let avg_duration_min = if total_sessions > 0 {
            let sum: u32 = log.iter().map(|s| s.duration).sum();
            ((sum as f64 / total_sessions as f64).round()) as u32
        } else {
            0
        };
        let week_start = week_start_of(today);
        let week_end = week_start.checked_add_days(Days::new(7));
        let sessions_this_week = log
            .iter()
            .filter(|s| {
                let day = local_day(s.start_time);
                day >= week_start && week_end.map(|end| day < end).unwrap_or(true)
            })
            .count();
        Self {
            total_sessions,
            avg_duration_min,
            sessions_this_week,
        }
    }
}
