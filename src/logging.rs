//! Logging setup for diagnostics.
//!
//! This module configures the tracing subscriber:
//! - Headless commands log to stderr
//! - The interactive deck owns the terminal, so it logs to a file or not at all
//! - `RUST_LOG` overrides the configured level

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::Result;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level - most verbose (includes every drag sample)
    Trace,
    /// Debug level (gesture transitions)
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warning level
    Warn,
    /// Error level - least verbose
    Error,
    /// Disable logging entirely
    Off,
}

impl LogLevel {
    fn directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl From<u8> for LogLevel {
    /// Convert verbosity count to log level.
    /// 0 = Info, 1 = Debug, 2+ = Trace
    fn from(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error
    #[default]
    Stderr,
    /// Append to a file
    File(PathBuf),
    /// Nowhere
    Disabled,
}

/// Configuration for the subscriber.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use
    pub level: LogLevel,
    /// Destination of log lines
    pub target: LogTarget,
    /// Whether to include timestamps
    pub with_timestamps: bool,
    /// Whether to include the target (module path)
    pub with_target: bool,
    /// Whether stderr output may use ANSI colors
    pub colors: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            target: LogTarget::Stderr,
            with_timestamps: true,
            with_target: true,
            colors: true,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the destination.
    pub fn with_log_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Set whether to include timestamps.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.with_timestamps = enabled;
        self
    }

    /// Set whether stderr output may be colored.
    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    /// Whether the subscriber writes ANSI escapes. Files never get them.
    pub fn use_ansi(&self) -> bool {
        self.colors && matches!(self.target, LogTarget::Stderr)
    }

    /// Set whether to include the module path.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Create a configuration from verbosity level (0 = info, 1 = debug, 2+ = trace).
    pub fn from_verbosity(verbosity: u8) -> Self {
        Self::default().with_level(LogLevel::from(verbosity))
    }

    /// Configuration for the interactive deck: a log file if given,
    /// otherwise nothing.
    pub fn for_terminal_ui(verbosity: u8, log_file: Option<PathBuf>) -> Self {
        let target = match log_file {
            Some(path) => LogTarget::File(path),
            None => LogTarget::Disabled,
        };
        Self::from_verbosity(verbosity).with_log_target(target)
    }
}

/// Install the global subscriber. Calling it a second time is a no-op.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let writer = match &config.target {
        LogTarget::Disabled => return Ok(()),
        LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };
    let ansi = config.use_ansi();

    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(config.level.directive())
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(config.with_target);

    // A subscriber may already be installed (tests, embedding hosts).
    let _ = if config.with_timestamps {
        subscriber.try_init()
    } else {
        subscriber.without_time().try_init()
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(LogLevel::from(0), LogLevel::Info);
        assert_eq!(LogLevel::from(1), LogLevel::Debug);
        assert_eq!(LogLevel::from(2), LogLevel::Trace);
        assert_eq!(LogLevel::from(10), LogLevel::Trace);
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::new()
            .with_level(LogLevel::Debug)
            .with_timestamps(false)
            .with_target(false);

        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.with_timestamps);
        assert!(!config.with_target);
        assert_eq!(config.target, LogTarget::Stderr);
    }

    #[test]
    fn test_terminal_ui_logging_target() {
        let quiet = LoggingConfig::for_terminal_ui(1, None);
        assert_eq!(quiet.target, LogTarget::Disabled);
        assert_eq!(quiet.level, LogLevel::Debug);

        let file = LoggingConfig::for_terminal_ui(0, Some(PathBuf::from("deck.log")));
        assert_eq!(file.target, LogTarget::File(PathBuf::from("deck.log")));
    }

    #[test]
    fn test_ansi_follows_colors_and_target() {
        assert!(LoggingConfig::new().use_ansi());
        assert!(!LoggingConfig::new().with_colors(false).use_ansi());
        let file = LoggingConfig::new().with_log_target(LogTarget::File(PathBuf::from("deck.log")));
        assert!(!file.use_ansi());
    }

    #[test]
    fn test_disabled_logging_is_ok() {
        assert!(init_logging(LoggingConfig::new().with_log_target(LogTarget::Disabled)).is_ok());
    }
}
