use chrono::{Duration, Utc};
use clap::{Subcommand, ValueEnum};
use himstreak_core::{Database, Event, SessionKind, StartRequest, TimerEngine, TimerState};

use crate::common;

const ENGINE_KEY: &str = "timer_engine";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    Pomodoro,
    Deep,
    Custom,
}

impl From<Mode> for SessionKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Pomodoro => SessionKind::Pomodoro,
            Mode::Deep => SessionKind::Deep,
            Mode::Custom => SessionKind::Custom,
        }
    }
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a work interval, or resume a paused one
    Start {
        /// Subject to attribute the session to
        #[arg(long)]
        subject: Option<String>,
        /// Interval mode
        #[arg(long, value_enum, default_value = "pomodoro")]
        mode: Mode,
        /// Minutes for custom mode
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Freeze the countdown
    Pause,
    /// Discard runtime state and return to idle
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Advance the countdown by synthetic seconds
    Tick {
        #[arg(long, default_value = "1")]
        seconds: u32,
    },
    /// Tick in real time until the interval and its break finish
    Run,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut tracker = common::open_tracker()?;
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
            tracker.restore_engine(engine);
        }
    }
    let now = Utc::now();

    match action {
        TimerAction::Start {
            subject,
            mode,
            minutes,
        } => {
            let request = StartRequest {
                kind: Some(mode.into()),
                custom_minutes: minutes,
                subject,
            };
            match tracker.start_timer(request, now)? {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!(
                    "{}",
                    serde_json::to_string_pretty(&tracker.engine().snapshot(now))?
                ),
            }
        }
        TimerAction::Pause => match tracker.pause_timer(now) {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!(
                "{}",
                serde_json::to_string_pretty(&tracker.engine().snapshot(now))?
            ),
        },
        TimerAction::Reset => {
            if let Some(event) = tracker.reset_timer(now) {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Status => {
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.engine().snapshot(now))?
            );
        }
        TimerAction::Tick { seconds } => {
            let mut at = now;
            for _ in 0..seconds {
                at += Duration::seconds(1);
                if let Some(event) = tracker.tick(at) {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&tracker.engine().snapshot(at))?
            );
        }
        TimerAction::Run => {
            while matches!(
                tracker.engine().state(),
                TimerState::Running | TimerState::BreakRunning
            ) {
                std::thread::sleep(std::time::Duration::from_secs(1));
                if let Some(event) = tracker.tick(Utc::now()) {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                    if matches!(event, Event::BreakEnded { .. }) {
                        break;
                    }
                }
            }
        }
    }

    db.kv_set(ENGINE_KEY, &serde_json::to_string(tracker.engine())?)?;
    Ok(())
}
