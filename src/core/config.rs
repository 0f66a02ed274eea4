//! External logger configuration
//!
//! [`Config`] is the shape of a `[log]` section in a TOML file or a set of
//! `LOG_*` environment variables. Unlike [`Options`], missing keys take the
//! deployment defaults (100 MB files, 7 days, 3 backups) and bad values are
//! reported through [`Config::validate`].

use super::error::{LoggerError, Result};
use super::options::{validate_fields, Options};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub level: String,
    pub format: String,
    pub output_paths: Vec<String>,
    pub error_output_paths: Vec<String>,
    pub disable_caller: bool,
    pub disable_stacktrace: bool,
    pub filename: String,
    pub max_size: i64,
    pub max_age: i64,
    pub max_backups: i64,
    pub compress: bool,
    pub development: bool,
}

/// Unlike [`Options`], no output paths are set: a default config logs
/// nowhere until `output_paths` or `filename` is given.
impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "console".to_string(),
            output_paths: Vec::new(),
            error_output_paths: Vec::new(),
            disable_caller: false,
            disable_stacktrace: false,
            filename: String::new(),
            max_size: 100,
            max_age: 7,
            max_backups: 3,
            compress: false,
            development: false,
        }
    }
}

impl Config {
    /// Parse a TOML document whose top-level keys are the config fields.
    ///
    /// ```
    /// use rust_logger_facade::Config;
    ///
    /// let config = Config::from_toml_str("level = \"debug\"\nformat = \"json\"").unwrap();
    /// assert_eq!(config.level, "debug");
    /// assert_eq!(config.max_size, 100);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "read log config",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Read `LOG_*` variables from the process environment.
    ///
    /// Unset variables keep their defaults. List variables are
    /// comma-separated.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup("LOG_LEVEL") {
            config.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.format = format;
        }
        if let Some(paths) = lookup("LOG_OUTPUT_PATHS") {
            config.output_paths = split_list(&paths);
        }
        if let Some(paths) = lookup("LOG_ERROR_OUTPUT_PATHS") {
            config.error_output_paths = split_list(&paths);
        }
        if let Some(value) = lookup("LOG_DISABLE_CALLER") {
            config.disable_caller = parse_bool("LOG_DISABLE_CALLER", &value)?;
        }
        if let Some(value) = lookup("LOG_DISABLE_STACKTRACE") {
            config.disable_stacktrace = parse_bool("LOG_DISABLE_STACKTRACE", &value)?;
        }
        if let Some(filename) = lookup("LOG_FILENAME") {
            config.filename = filename;
        }
        if let Some(value) = lookup("LOG_MAX_SIZE") {
            config.max_size = parse_int("LOG_MAX_SIZE", &value)?;
        }
        if let Some(value) = lookup("LOG_MAX_AGE") {
            config.max_age = parse_int("LOG_MAX_AGE", &value)?;
        }
        if let Some(value) = lookup("LOG_MAX_BACKUPS") {
            config.max_backups = parse_int("LOG_MAX_BACKUPS", &value)?;
        }
        if let Some(value) = lookup("LOG_COMPRESS") {
            config.compress = parse_bool("LOG_COMPRESS", &value)?;
        }
        if let Some(value) = lookup("LOG_DEVELOPMENT") {
            config.development = parse_bool("LOG_DEVELOPMENT", &value)?;
        }

        Ok(config)
    }

    /// Same checks as [`Options::validate`].
    pub fn validate(&self) -> Result<()> {
        validate_fields(
            &self.level,
            &self.format,
            self.max_size,
            self.max_age,
            self.max_backups,
        )
    }

    /// Copy every field into [`Options`] as is.
    pub fn to_options(&self) -> Options {
        Options {
            level: self.level.clone(),
            format: self.format.clone(),
            output_paths: self.output_paths.clone(),
            error_output_paths: self.error_output_paths.clone(),
            disable_caller: self.disable_caller,
            disable_stacktrace: self.disable_stacktrace,
            filename: self.filename.clone(),
            max_size: self.max_size,
            max_age: self.max_age,
            max_backups: self.max_backups,
            compress: self.compress,
            development: self.development,
        }
    }
}

impl From<&Config> for Options {
    fn from(config: &Config) -> Self {
        config.to_options()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(LoggerError::config(
            key,
            format!("expected a boolean, got {}", other),
        )),
    }
}

fn parse_int(key: &str, value: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|e| {
        LoggerError::config(key, format!("expected an integer, got {} ({})", value, e))
    })
}
