use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::session::SessionKind;

/// Deep-work intervals run a fixed 50 minutes.
pub const DEEP_WORK_MIN: u32 = 50;

/// Work/break durations in minutes, supplied by settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub work_min: u32,
    pub break_min: u32,
    pub long_break_min: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_min: 25,
            break_min: 5,
            long_break_min: 15,
        }
    }
}

/// What the user asked to run: interval kind, optional explicit length,
/// optional subject.
#[derive(Debug, Clone, Default)]
pub struct StartRequest {
    pub kind: Option<SessionKind>,
    pub custom_minutes: Option<u32>,
    pub subject: Option<String>,
}

impl StartRequest {
    /// Resolve the requested interval length in minutes.
    ///
    /// Custom intervals require an explicit positive minute count;
    /// everything else falls back to the configured work duration.
    pub fn minutes(&self, config: &TimerConfig) -> Result<u32, ValidationError> {
        match self.kind.unwrap_or(SessionKind::Pomodoro) {
            SessionKind::Pomodoro => Ok(config.work_min),
            SessionKind::Deep => Ok(DEEP_WORK_MIN),
            SessionKind::Custom => match self.custom_minutes {
                Some(min) if min >= 1 => Ok(min),
                Some(_) => Err(ValidationError::InvalidValue {
                    field: "custom_minutes",
                    message: "must be at least 1".to_string(),
                }),
                None => Err(ValidationError::MissingField("custom_minutes")),
            },
        }
    }

    /// Subject with empty input normalized away.
    pub fn subject(&self) -> Option<String> {
        self.subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// One continuous countdown period of work. Present while the timer is
/// `Running` or `Paused`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval {
    pub kind: SessionKind,
    /// Subject the interval is attributed to, if any.
    pub subject: Option<String>,
    pub total_secs: u32,
    pub remaining_secs: u32,
    /// When the interval was first started. Pausing and resuming never
    /// moves this.
    pub started_at: DateTime<Utc>,
}

impl Interval {
    /// Nominal duration in whole minutes, rounded from total seconds.
    /// A full interval counts as its nominal length even when completion
    /// fires late.
    pub fn duration_min(&self) -> u32 {
        (self.total_secs + 30) / 60
    }
}
