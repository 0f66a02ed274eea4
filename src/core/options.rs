//! Logger configuration assembled from option values
//!
//! [`Options`] starts from fixed defaults and is mutated by a sequence of
//! [`LogOption`]s, applied in order. Options never fail: a level that is not
//! one of the seven canonical names is ignored, and any other bad value is
//! resolved to a default when the logger is built. [`Options::validate`] is
//! the explicit check for configuration coming from outside the program.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;

/// Accepted values for the `format` setting.
pub const FORMATS: [&str; 2] = ["json", "console"];

/// Configuration consumed by [`Logger::build`](crate::core::Logger::build)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Minimum level name, one of `debug`, `info`, `warn`, `error`, `dpanic`, `panic`, `fatal`
    pub level: String,
    /// `json` or `console`
    pub format: String,
    /// `stdout` and/or `stderr`, matched case-insensitively
    pub output_paths: Vec<String>,
    /// Destinations for the logger's own errors
    pub error_output_paths: Vec<String>,
    pub disable_caller: bool,
    pub disable_stacktrace: bool,
    /// Rotating log file, disabled when empty
    pub filename: String,
    /// Megabytes before rotation
    pub max_size: i64,
    /// Days to keep rotated files
    pub max_age: i64,
    /// Rotated files to keep
    pub max_backups: i64,
    pub compress: bool,
    pub development: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level: LogLevel::Info.as_str().to_string(),
            format: "console".to_string(),
            output_paths: vec!["stdout".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            disable_caller: false,
            disable_stacktrace: false,
            filename: String::new(),
            max_size: 0,
            max_age: 0,
            max_backups: 0,
            compress: false,
            development: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `options` in order; later options win.
    pub fn apply<I>(&mut self, options: I)
    where
        I: IntoIterator<Item = LogOption>,
    {
        for option in options {
            option.apply_to(self);
        }
    }

    /// Builder-style variant of [`apply`](Self::apply) for a single option.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with(mut self, option: LogOption) -> Self {
        option.apply_to(&mut self);
        self
    }

    /// Check every field against its accepted values.
    ///
    /// Empty `level` and `format` count as unset and pass.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] naming the first
    /// offending field.
    pub fn validate(&self) -> Result<()> {
        validate_fields(
            &self.level,
            &self.format,
            self.max_size,
            self.max_age,
            self.max_backups,
        )
    }
}

pub(crate) fn validate_fields(
    level: &str,
    format: &str,
    max_size: i64,
    max_age: i64,
    max_backups: i64,
) -> Result<()> {
    if !level.is_empty() && !LogLevel::is_canonical_name(level) {
        let names: Vec<&str> = LogLevel::ALL.iter().map(LogLevel::as_str).collect();
        return Err(LoggerError::config(
            "log.level",
            format!("must be one of: {}, got {}", names.join(", "), level),
        ));
    }

    if !format.is_empty() && !FORMATS.contains(&format) {
        return Err(LoggerError::config(
            "log.format",
            format!("must be one of: {}, got {}", FORMATS.join(", "), format),
        ));
    }

    for (component, value) in [
        ("log.max_size", max_size),
        ("log.max_age", max_age),
        ("log.max_backups", max_backups),
    ] {
        if value < 0 {
            return Err(LoggerError::config(
                component,
                format!("must be non-negative, got {}", value),
            ));
        }
    }

    Ok(())
}

/// A single mutation of [`Options`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOption {
    Level(String),
    Format(String),
    OutputPaths(Vec<String>),
    ErrorOutputPaths(Vec<String>),
    DisableCaller(bool),
    DisableStacktrace(bool),
    Filename(String),
    MaxSize(i64),
    MaxAge(i64),
    MaxBackups(i64),
    Compress(bool),
    Development(bool),
}

impl LogOption {
    pub fn apply_to(self, options: &mut Options) {
        match self {
            LogOption::Level(level) => {
                if LogLevel::is_canonical_name(&level) {
                    options.level = level;
                }
            }
            LogOption::Format(format) => options.format = format,
            LogOption::OutputPaths(paths) => options.output_paths = paths,
            LogOption::ErrorOutputPaths(paths) => options.error_output_paths = paths,
            LogOption::DisableCaller(disable) => options.disable_caller = disable,
            LogOption::DisableStacktrace(disable) => options.disable_stacktrace = disable,
            LogOption::Filename(filename) => options.filename = filename,
            LogOption::MaxSize(size) => options.max_size = size,
            LogOption::MaxAge(age) => options.max_age = age,
            LogOption::MaxBackups(backups) => options.max_backups = backups,
            LogOption::Compress(compress) => options.compress = compress,
            LogOption::Development(development) => options.development = development,
        }
    }
}

/// Minimum level. Anything but the seven lowercase level names is ignored.
pub fn with_level(level: impl Into<String>) -> LogOption {
    LogOption::Level(level.into())
}

pub fn with_format(format: impl Into<String>) -> LogOption {
    LogOption::Format(format.into())
}

pub fn with_output_paths<I, S>(paths: I) -> LogOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    LogOption::OutputPaths(paths.into_iter().map(Into::into).collect())
}

pub fn with_error_output_paths<I, S>(paths: I) -> LogOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    LogOption::ErrorOutputPaths(paths.into_iter().map(Into::into).collect())
}

pub fn with_disable_caller(disable: bool) -> LogOption {
    LogOption::DisableCaller(disable)
}

pub fn with_disable_stacktrace(disable: bool) -> LogOption {
    LogOption::DisableStacktrace(disable)
}

pub fn with_filename(filename: impl Into<String>) -> LogOption {
    LogOption::Filename(filename.into())
}

pub fn with_max_size(megabytes: i64) -> LogOption {
    LogOption::MaxSize(megabytes)
}

pub fn with_max_age(days: i64) -> LogOption {
    LogOption::MaxAge(days)
}

pub fn with_max_backups(count: i64) -> LogOption {
    LogOption::MaxBackups(count)
}

pub fn with_compress(compress: bool) -> LogOption {
    LogOption::Compress(compress)
}

pub fn with_development(development: bool) -> LogOption {
    LogOption::Development(development)
}
