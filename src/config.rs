use std::path::PathBuf;

use serde::Deserialize;

use crate::services::DEFAULT_STORAGE_KEY;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub log_filter: String,
}

impl Config {
    /// Reads `NOTE_BOARD_DATA_DIR`, `NOTE_BOARD_KEY` and `RUST_LOG`, then validates.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = Self::from_env_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Env values over defaults, without validation, so callers can apply
    /// further overrides before calling [`validate`](Self::validate).
    pub fn from_env_unchecked() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("NOTE_BOARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            storage_key: std::env::var("NOTE_BOARD_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.storage_key),
            log_filter: std::env::var("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        validate_storage_key(&self.storage_key)
    }
}

/// The key becomes a file name inside the data directory, so it must stay a
/// single path component.
pub fn validate_storage_key(key: &str) -> Result<(), anyhow::Error> {
    if key.trim().is_empty() {
        anyhow::bail!("storage key must not be empty");
    }
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        anyhow::bail!("storage key must be a plain file name: {}", key);
    }
    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".note-board"),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            log_filter: "info,note_board=debug".into(),
        }
    }
}
