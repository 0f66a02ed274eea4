//! Log entry structure

use super::field::Field;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

/// Source location of a logging call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    file: &'static str,
    line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Short `dir/file.rs:line` form: the file plus its immediate parent.
    pub fn short(&self) -> String {
        let is_separator = |c: char| c == '/' || c == '\\';
        let path = self.file;
        let trimmed = match path.rfind(is_separator) {
            Some(last) => match path[..last].rfind(is_separator) {
                Some(previous) => &path[previous + 1..],
                None => path,
            },
            None => path,
        };
        format!("{}:{}", trimmed.replace('\\', "/"), self.line)
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub caller: Option<Caller>,
    pub stacktrace: Option<String>,
    pub fields: Vec<Field>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            caller: None,
            stacktrace: None,
            fields: Vec::new(),
        }
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_stacktrace(mut self, stacktrace: String) -> Self {
        self.stacktrace = Some(stacktrace);
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_short_form() {
        let caller = Caller::new("/home/dev/project/src/core/logger.rs", 42);
        assert_eq!(caller.short(), "core/logger.rs:42");
    }

    #[test]
    fn test_caller_short_form_without_directories() {
        assert_eq!(Caller::new("main.rs", 7).short(), "main.rs:7");
        assert_eq!(Caller::new("src/main.rs", 7).short(), "src/main.rs:7");
    }

    #[test]
    fn test_caller_short_form_windows_separators() {
        let caller = Caller::new("C:\\work\\app\\src\\main.rs", 3);
        assert_eq!(caller.short(), "src/main.rs:3");
    }

    #[test]
    fn test_caller_from_location() {
        let caller = Caller::from_location(Location::caller());
        assert!(caller.file().ends_with("log_entry.rs"));
    }

    #[test]
    fn test_entry_builder() {
        let entry = LogEntry::new(LogLevel::Warn, "disk almost full")
            .with_fields(vec![Field::int("free_mb", 12)])
            .with_caller(Caller::new("src/disk.rs", 10));

        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.fields.len(), 1);
        assert!(entry.stacktrace.is_none());
    }
}
