mod database;
mod settings;

pub use database::{Database, SqliteStore};
pub use settings::{Settings, Theme};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/himstreak[-dev]/` based on HIMSTREAK_ENV.
///
/// Set HIMSTREAK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HIMSTREAK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("himstreak-dev")
    } else {
        base_dir.join("himstreak")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
