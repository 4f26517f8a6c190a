//! Core logging bootstrap.
//!
//! # Responsibility
//! - Start the rolling file logger once per process from [`LogSettings`].
//! - Capture panics into the log with a sanitized, length-capped payload.
//!
//! # Invariants
//! - Initializing again with identical settings is a no-op.
//! - Initializing again with different settings is rejected.
//! - Initialization never panics.
//! - Core log lines are `key=value` metadata; entity field contents
//!   (names, phones, addresses) are never logged.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "estatebook";
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;
const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

static ACTIVE_SETTINGS: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Verbosity accepted by [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `debug` for debug builds, `info` for release builds.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(LoggingError::UnknownLevel(other.to_string())),
        }
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: LogLevel,
    /// Absolute directory for rolling log files.
    pub dir: PathBuf,
    /// Size at which the active file is rotated.
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    /// Rotated files kept on disk.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl LogSettings {
    pub fn new(level: LogLevel, dir: impl Into<PathBuf>) -> Self {
        Self {
            level,
            dir: dir.into(),
            max_file_size_mb: default_max_file_size_mb(),
            max_files: default_max_files(),
        }
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        if self.dir.as_os_str().is_empty() || !self.dir.is_absolute() {
            return Err(LoggingError::RelativeDirectory(self.dir.clone()));
        }
        if self.max_file_size_mb == 0 || self.max_files == 0 {
            return Err(LoggingError::InvalidRotation);
        }
        Ok(())
    }
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_max_files() -> usize {
    5
}

/// Logging bootstrap failure.
#[derive(Debug)]
pub enum LoggingError {
    UnknownLevel(String),
    RelativeDirectory(PathBuf),
    InvalidRotation,
    /// Logger already runs with other settings.
    AlreadyInitialized { active: Box<LogSettings> },
    CreateDirectory {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(flexi_logger::FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeDirectory(dir) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                dir.display()
            ),
            Self::InvalidRotation => {
                write!(f, "log rotation needs a positive file size and file count")
            }
            Self::AlreadyInitialized { active } => write!(
                f,
                "logging already initialized at `{}` with level `{}`; refusing to reconfigure",
                active.dir.display(),
                active.level
            ),
            Self::CreateDirectory { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Starts file logging for the process.
///
/// # Errors
/// - Settings fail [`LogSettings::validate`].
/// - Logging already runs with different settings.
/// - The directory cannot be created or the backend fails to start.
pub fn init_logging(settings: &LogSettings) -> Result<(), LoggingError> {
    settings.validate()?;

    let active = ACTIVE_SETTINGS.get_or_try_init(|| start_logger(settings))?;
    if active.settings != *settings {
        return Err(LoggingError::AlreadyInitialized {
            active: Box::new(active.settings.clone()),
        });
    }
    Ok(())
}

/// Settings of the running logger, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE_SETTINGS.get().map(|active| active.settings.clone())
}

fn start_logger(settings: &LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|source| LoggingError::CreateDirectory {
        dir: settings.dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(settings.level.as_str())
        .map_err(LoggingError::Backend)?
        .log_to_file(
            FileSpec::default()
                .directory(settings.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(settings.max_file_size_mb.saturating_mul(BYTES_PER_MEGABYTE)),
            Naming::Numbers,
            Cleanup::KeepLogFiles(settings.max_files),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_hook_once();

    info!(
        "event=core_init module=logging status=ok platform={} version={} level={} log_dir={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        settings.level,
        settings.dir.display()
    );

    Ok(ActiveLogger {
        settings: settings.clone(),
        _handle: handle,
    })
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=logging status=error location={} payload={}",
            location,
            single_line(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

/// Flattens newlines and caps the length of free text headed for a log line.
fn single_line(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let mut truncated = flattened.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::{SystemTime, UNIX_EPOCH};

    // Not a TempDir: the logger keeps writing here after the test returns.
    fn temp_log_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "estatebook-logging-{tag}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn level_parsing_accepts_aliases() {
        assert_eq!(" WARNING ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert!(matches!(
            "verbose".parse::<LogLevel>(),
            Err(LoggingError::UnknownLevel(_))
        ));
    }

    #[test]
    fn relative_directory_is_rejected() {
        let err = LogSettings::new(LogLevel::Info, "logs/dev")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn zero_rotation_is_rejected() {
        let mut settings = LogSettings::new(LogLevel::Info, "/var/log/estatebook");
        settings.max_files = 0;
        assert!(matches!(
            settings.validate(),
            Err(LoggingError::InvalidRotation)
        ));
    }

    #[test]
    fn single_line_flattens_and_truncates() {
        let flattened = single_line("line1\nline2\rline3", 8);
        assert!(!flattened.contains('\n'));
        assert!(!flattened.contains('\r'));
        assert!(flattened.ends_with("..."));
        assert_eq!(single_line("short", 8), "short");
    }

    #[test]
    fn init_is_idempotent_and_rejects_reconfiguration() {
        let first_dir = temp_log_dir("first");
        let second_dir = temp_log_dir("second");
        let settings = LogSettings::new(LogLevel::Info, &first_dir);

        init_logging(&settings).expect("first init should succeed");
        init_logging(&settings).expect("same settings should be idempotent");

        let louder = LogSettings::new(LogLevel::Debug, &first_dir);
        assert!(matches!(
            init_logging(&louder),
            Err(LoggingError::AlreadyInitialized { .. })
        ));

        let elsewhere = LogSettings::new(LogLevel::Info, &second_dir);
        assert!(matches!(
            init_logging(&elsewhere),
            Err(LoggingError::AlreadyInitialized { .. })
        ));

        assert_eq!(logging_status(), Some(settings));
    }
}
