/// Runtime configuration
///
/// Everything comes from the environment, optionally seeded from a `.env`
/// file by the binary before it starts.

use crate::error::Result;
use std::path::PathBuf;

/// Path to the notes store file
pub const DB_PATH_VAR: &str = "NOTES_DB_PATH";

/// Log level used when `RUST_LOG` is not set
pub const LOG_LEVEL_VAR: &str = "NOTES_LOG";

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` means persistence is never initialized
    pub db_path: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    /// Read configuration from process environment
    ///
    /// A relative store path is resolved against the current directory.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());

        if let Some(path) = config.db_path.take() {
            config.db_path = Some(if path.is_absolute() {
                path
            } else {
                std::env::current_dir()?.join(path)
            });
        }

        Ok(config)
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup(DB_PATH_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let log_level = lookup(LOG_LEVEL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Self { db_path, log_level }
    }
}
