//! Runtime configuration for meep core.
//!
//! # Responsibility
//! - Load database and logging settings from TOML, with `${VAR}`
//!   substitution and `MEEP_*` environment overrides.
//! - Turn a loaded config into an open database and active logging.
//!
//! # Invariants
//! - A missing `database.path` means an in-memory database.
//! - A missing `logging.dir` means logging is not started.
//! - `logging.level` is normalized to `trace|debug|info|warn|error`.
//!
//! Example:
//! ```toml
//! [database]
//! path = "${MEEP_HOME}/meep.sqlite3"
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/meep"
//! ```

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, parse_level, LoggingError};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DATABASE_PATH: &str = "MEEP_DATABASE_PATH";
pub const ENV_LOG_LEVEL: &str = "MEEP_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MEEP_LOG_DIR";

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config TOML: {err}"),
            Self::InvalidValue { field, message } => write!(f, "invalid `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite file path. `None` opens an in-memory database.
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Opens the configured database with migrations applied.
    pub fn open(&self) -> DbResult<Connection> {
        match self.path.as_ref() {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level_string(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    /// Starts file logging when a directory is configured.
    ///
    /// Returns `Ok(false)` when no directory is set.
    pub fn init(&self) -> Result<bool, LoggingError> {
        match self.dir.as_ref() {
            Some(dir) => init_logging(&self.level, dir).map(|()| true),
            None => Ok(false),
        }
    }
}

/// Top-level config document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CoreConfig {
    /// In-memory database with verbose logging, for tests and smoke runs.
    pub fn testing() -> Self {
        Self {
            database: DatabaseConfig { path: None },
            logging: LoggingConfig {
                level: "debug".to_string(),
                dir: None,
            },
        }
    }

    /// Loads config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses config from TOML text after `${VAR}` substitution.
    ///
    /// Unset variables are left verbatim.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let expanded = substitute_env_vars(content, |name| std::env::var(name).ok());
        let mut config: Self = toml::from_str(&expanded)?;
        config.normalize()?;
        Ok(config)
    }

    /// Applies `MEEP_*` environment overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            self.database.path = non_blank(&path).map(PathBuf::from);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.logging.dir = non_blank(&dir).map(PathBuf::from);
        }
        self.normalize()
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        self.logging.level = parse_level(&self.logging.level)
            .map_err(|err| ConfigError::InvalidValue {
                field: "logging.level",
                message: err.to_string(),
            })?
            .to_string();

        if let Some(dir) = self.logging.dir.as_ref() {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    field: "logging.dir",
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }
        Ok(())
    }
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn substitute_env_vars(content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    ENV_VAR_RE
        .replace_all(content, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
