//! Core runtime configuration.
//!
//! # Responsibility
//! - Parse the TOML configuration supplied by the host application.
//! - Resolve database and log locations from one data directory.
//!
//! # Invariants
//! - `data_dir` and an explicit `log_dir` must be absolute.
//! - `log_level`, when set, must be one of `trace|debug|info|warn|error`.

use crate::db::{open_db, DbResult};
use crate::logging::{default_log_level, init_logging, normalize_level};
use rusqlite::Connection;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "growth_journal.sqlite3";
const DEFAULT_LOG_SUBDIR: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "failed to parse core config: {err}"),
            Self::Invalid(message) => write!(f, "invalid core config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Host-supplied configuration for the journal core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    /// Absolute directory holding the journal database.
    pub data_dir: PathBuf,
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
    /// Defaults to `default_log_level()` when unset.
    #[serde(default)]
    pub log_level: Option<String>,
    /// Defaults to `<data_dir>/logs` when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_db_file_name() -> String {
    DEFAULT_DB_FILE_NAME.to_string()
}

impl CoreConfig {
    /// Builds a config with defaults for everything but `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config = Self {
            data_dir: data_dir.into(),
            db_file_name: default_db_file_name(),
            log_level: None,
            log_dir: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_absolute("data_dir", &self.data_dir)?;
        if let Some(log_dir) = &self.log_dir {
            require_absolute("log_dir", log_dir)?;
        }

        let name = self.db_file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "db_file_name must be a plain file name, got `{}`",
                self.db_file_name
            )));
        }

        if let Some(level) = &self.log_level {
            normalize_level(level).map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(self.db_file_name.trim())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_LOG_SUBDIR))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or_else(|| default_log_level())
    }

    /// Starts file logging at the configured level and directory.
    pub fn init_logging(&self) -> Result<(), String> {
        let log_dir = self.log_dir();
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: `{}`", log_dir.display()))?;
        init_logging(self.log_level(), log_dir)
    }

    /// Opens the configured database, creating `data_dir` if needed.
    pub fn open_db(&self) -> DbResult<Connection> {
        open_db(self.db_path())
    }
}

fn require_absolute(field: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} cannot be empty")));
    }
    if !path.is_absolute() {
        return Err(ConfigError::Invalid(format!(
            "{field} must be an absolute path, got `{}`",
            path.display()
        )));
    }
    Ok(())
}
