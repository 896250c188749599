//! Subscriber setup for binaries and experiments.
//!
//! The library only emits `tracing` events. [`init`] installs a global
//! subscriber with an optional console layer and an optional plain-text
//! file layer at `{file_dir}/log_{file_path}.txt`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding [`LogConfig::file_dir`].
pub const FILE_DIR_ENV: &str = "LOG_FILE_DIR";

/// Environment variable overriding [`LogConfig::file_path`].
pub const FILE_PATH_ENV: &str = "LOG_FILE_PATH";

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log directory or file could not be opened.
    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),

    /// The filter directive did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("subscriber already installed: {0}")]
    Init(String),
}

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogConfig {
    /// Write formatted events to stdout.
    pub console_enabled: bool,
    /// Directory of the log file. `None` disables the file sink.
    pub file_dir: Option<PathBuf>,
    /// Stem of the log file name.
    pub file_path: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            file_dir: Some(PathBuf::from("logs")),
            file_path: "log".into(),
            filter: "info".into(),
        }
    }
}

impl LogConfig {
    /// Defaults overridden by `LOG_FILE_DIR` and `LOG_FILE_PATH`.
    ///
    /// Opt-in convenience for binaries. [`init`] never reads these
    /// variables itself; it only sees the config it is given.
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(FILE_DIR_ENV).ok(),
            std::env::var(FILE_PATH_ENV).ok(),
        )
    }

    /// Replaces the directory and file stem where a value is given.
    pub fn with_overrides(mut self, file_dir: Option<String>, file_path: Option<String>) -> Self {
        if let Some(dir) = file_dir {
            self.file_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = file_path {
            self.file_path = path;
        }
        self
    }

    /// Enables or disables console output.
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console_enabled = enabled;
        self
    }

    /// Sets the log directory.
    pub fn with_file_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file_dir = Some(dir.into());
        self
    }

    /// Disables the file sink.
    pub fn without_file(mut self) -> Self {
        self.file_dir = None;
        self
    }

    /// Sets the log file stem.
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = path.into();
        self
    }

    /// Sets the fallback filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Full path of the log file, if the file sink is enabled.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.file_dir
            .as_ref()
            .map(|dir| dir.join(format!("log_{}.txt", self.file_path)))
    }
}

/// Installs the global subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over [`LogConfig::filter`]. The file is
/// opened in append mode and written without ANSI colors.
///
/// # Errors
/// [`LoggingError`] when the filter is invalid, the file cannot be
/// opened, or a subscriber is already set.
pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| LoggingError::Filter(e.to_string()))?,
    };

    let console = config
        .console_enabled
        .then(|| fmt::layer().with_target(false));

    let file = match config.log_file() {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_file() {
        let config = LogConfig::default();
        assert_eq!(config.log_file(), Some(PathBuf::from("logs/log_log.txt")));
        assert!(config.console_enabled);
    }

    #[test]
    fn test_custom_log_file() {
        let config = LogConfig::default()
            .with_file_dir("out")
            .with_file_path("karate");
        assert_eq!(config.log_file(), Some(PathBuf::from("out/log_karate.txt")));
    }

    #[test]
    fn test_without_file() {
        assert!(LogConfig::default().without_file().log_file().is_none());
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let config = LogConfig::default().with_overrides(None, Some("run1".into()));
        assert_eq!(config.log_file(), Some(PathBuf::from("logs/log_run1.txt")));

        let config = LogConfig::default().with_overrides(Some("out".into()), None);
        assert_eq!(config.log_file(), Some(PathBuf::from("out/log_log.txt")));
    }

    #[test]
    fn test_from_env_reads_both_variables() {
        std::env::set_var(FILE_DIR_ENV, "env_logs");
        std::env::set_var(FILE_PATH_ENV, "env_run");
        let config = LogConfig::from_env();
        std::env::remove_var(FILE_DIR_ENV);
        std::env::remove_var(FILE_PATH_ENV);

        assert_eq!(config.log_file(), Some(PathBuf::from("env_logs/log_env_run.txt")));
        assert!(config.console_enabled);
    }

    #[test]
    fn test_second_init_fails() {
        // no sinks, so nothing is written
        let config = LogConfig::default()
            .without_file()
            .with_console(false)
            .with_filter("warn");
        let first = init(&config);
        let second = init(&config);
        assert!(matches!(second, Err(LoggingError::Init(_))) || first.is_err());
    }
}
