//! TOML-based user settings.
//!
//! Stored at `~/.config/himstreak/config.toml`. The same struct is
//! embedded in the persisted aggregate snapshot, so field names follow
//! the document shape (`pomodoroWork`, `dailyGoal`, ...).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::timer::TimerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Work interval length in minutes.
    #[serde(default = "default_work")]
    pub pomodoro_work: u32,
    /// Break length in minutes.
    #[serde(default = "default_break")]
    pub pomodoro_break: u32,
    /// Long break length in minutes. Carried for the document shape;
    /// the timer currently always takes the short break.
    #[serde(default = "default_long_break")]
    pub pomodoro_long_break: u32,
    /// Target study hours per day.
    #[serde(default = "default_daily_goal")]
    pub daily_goal: f64,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub profile_name: String,
}

fn default_work() -> u32 {
    25
}
fn default_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_daily_goal() -> f64 {
    4.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_work: default_work(),
            pomodoro_break: default_break(),
            pomodoro_long_break: default_long_break(),
            daily_goal: default_daily_goal(),
            theme: Theme::default(),
            profile_name: String::new(),
        }
    }
}

impl Settings {
    /// Durations the timer engine runs with.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            work_min: self.pomodoro_work,
            break_min: self.pomodoro_break,
            long_break_min: self.pomodoro_long_break,
        }
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(super::data_dir()
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?
            .join("config.toml"))
    }

    /// Load from disk, writing defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if
    /// the default settings cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let settings = Self::default();
                settings.save()?;
                Ok(settings)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Durations must be at least a minute and the daily goal positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("pomodoroWork", self.pomodoro_work),
            ("pomodoroBreak", self.pomodoro_break),
            ("pomodoroLongBreak", self.pomodoro_long_break),
        ] {
            if value < 1 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be at least 1 minute".to_string(),
                });
            }
        }
        if self.daily_goal <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "dailyGoal".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Get a settings value as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by key from string input, validate, and
    /// persist. Unknown keys and unparseable values are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| {
            ConfigError::ParseFailed(e.to_string())
        })?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::ParseFailed("settings is not an object".to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: format!("cannot parse '{value}' as number"),
                        })?
                } else {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("cannot parse '{value}' as number"),
                    });
                }
            }
            _ => serde_json::Value::String(value.to_string()),
        };

        obj.insert(key.to_string(), new_value);
        let updated: Settings =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        self.save()
    }
}
