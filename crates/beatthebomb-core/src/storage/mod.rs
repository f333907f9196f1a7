mod config;
pub mod history;
pub mod score_log;

pub use config::{Config, GameConfig};
pub use history::ScoreHistory;
pub use score_log::{ScoreEntry, ScoreLog};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/beatthebomb[-dev]/` based on BEATTHEBOMB_ENV.
///
/// Set BEATTHEBOMB_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BEATTHEBOMB_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("beatthebomb-dev")
    } else {
        base_dir.join("beatthebomb")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
