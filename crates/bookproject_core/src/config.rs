//! Runtime configuration for embedding the core.
//!
//! # Responsibility
//! - Collect database and logging settings from the environment.
//! - Bring up logging and storage in the right order.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Logging is only initialized when a log directory is configured.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::{default_log_level, init_logging, LogLevel, LoggingError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "BOOKPROJECT_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "BOOKPROJECT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BOOKPROJECT_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file; `None` means an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Rolling log directory; `None` leaves logging untouched.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Logging(LoggingError),
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "logging setup failed: {err}"),
            Self::Db(err) => write!(f, "database setup failed: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl CoreConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Reads settings from `(name, value)` pairs; unknown names are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (name, value) in vars {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match name.as_ref() {
                ENV_DB_PATH => config.db_path = Some(PathBuf::from(value)),
                ENV_LOG_LEVEL => config.log_level = LogLevel::parse(value)?,
                ENV_LOG_DIR => config.log_dir = Some(PathBuf::from(value)),
                _ => {}
            }
        }
        Ok(config)
    }
}

/// Initializes logging (when configured) and opens the migrated database.
pub fn bootstrap(config: &CoreConfig) -> Result<Connection, ConfigError> {
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(config.log_level.as_str(), log_dir)?;
    }
    let conn = match config.db_path.as_ref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    Ok(conn)
}
