//! Core logger types and traits

pub mod config;
pub mod encoder;
pub mod error;
pub mod field;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod options;
pub mod sink;

pub use config::Config;
pub use encoder::{format_timestamp, keys, OutputFormat};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use options::{
    with_compress, with_development, with_disable_caller, with_disable_stacktrace,
    with_error_output_paths, with_filename, with_format, with_level, with_max_age,
    with_max_backups, with_max_size, with_output_paths, LogOption, Options,
};
pub use sink::Sink;
