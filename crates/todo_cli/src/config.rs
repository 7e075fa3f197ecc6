//! Environment-driven configuration for the todo binaries.
//!
//! # Invariants
//! - Blank values behave as if the variable were unset.
//! - Logging stays disabled unless `TODO_LOG_DIR` is set.

use std::path::PathBuf;
use todo_core::default_log_level;

pub const DB_PATH_ENV: &str = "TODO_DB_PATH";
pub const LOG_DIR_ENV: &str = "TODO_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "TODO_LOG_LEVEL";
pub const DEFAULT_DB_FILE_NAME: &str = "todo.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_dir: Option<String>,
    pub log_level: String,
}

impl CliConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME)),
            log_dir: non_blank(LOG_DIR_ENV),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
        }
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns the init error message, if any; callers treat it as a warning.
    pub fn init_logging(&self) -> Option<String> {
        let log_dir = self.log_dir.as_deref()?;
        todo_core::init_logging(&self.log_level, log_dir).err()
    }
}
