//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Describe where books are stored and how logging is set up.
//! - Load that description from a JSON settings file.
//!
//! # Invariants
//! - A validated config only holds absolute paths.

use crate::logging::{LogLevel, LogSettings, LoggingError};
use crate::storage::JsonBookStore;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_DIR_NAME: &str = "logs";

/// Host-supplied settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Directory holding `addressbook.json` and `propertybook.json`.
    pub data_dir: PathBuf,
    /// Omitted in the file: `<data_dir>/logs` at the build's default level.
    #[serde(default)]
    pub logging: Option<LogSettings>,
}

/// Configuration loading or validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    RelativeDataDir(PathBuf),
    Logging(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::RelativeDataDir(dir) => write!(
                f,
                "data_dir must be an absolute path, got `{}`",
                dir.display()
            ),
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::RelativeDataDir(_) => None,
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl CoreConfig {
    /// Config with default logging under `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            logging: None,
        }
    }

    /// Reads and validates a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str::<Self>(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(self.data_dir.clone()));
        }
        self.log_settings().validate()?;
        Ok(())
    }

    /// Explicit logging settings, or the defaults derived from `data_dir`.
    pub fn log_settings(&self) -> LogSettings {
        self.logging.clone().unwrap_or_else(|| {
            LogSettings::new(LogLevel::build_default(), self.data_dir.join(LOG_DIR_NAME))
        })
    }

    /// Store reading and writing books under `data_dir`.
    pub fn store(&self) -> JsonBookStore {
        JsonBookStore::new(&self.data_dir)
    }
}
