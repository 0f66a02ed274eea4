//! # Rust Logger Facade
//!
//! A structured logging facade: build a leveled JSON or console logger from
//! a handful of options, log through a process-wide instance, redirect
//! framework output into it and tag entries with trace and request ids
//! taken from an OpenTelemetry context.
//!
//! ## Features
//!
//! - **Options**: defaults plus ordered `with_*` overrides, or TOML / `LOG_*`
//!   environment configuration with validation
//! - **Outputs**: stdout, stderr and a size-rotated file with age/backup
//!   retention and gzip compression
//! - **Global logger**: lock-free reads, atomic re-initialisation
//! - **Context**: `traceID` / `requestID` fields from a request context
//! - **Framework adapters**: `io::Write` and `tracing_subscriber` writers
//!
//! ```
//! use rust_logger_facade::prelude::*;
//!
//! global::init([with_level("debug"), with_format("json")]);
//!
//! let cx = context::context_with_request_id(&opentelemetry::Context::new(), "req-7");
//! context::from_context(&cx).info("order placed", &[Field::uint("items", 3)]);
//!
//! global::sync().ok();
//! ```

pub mod context;
pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;
pub mod writer;

pub mod prelude {
    pub use crate::context;
    pub use crate::core::{
        with_compress, with_development, with_disable_caller, with_disable_stacktrace,
        with_error_output_paths, with_filename, with_format, with_level, with_max_age,
        with_max_backups, with_max_size, with_output_paths, Config, Field, FieldValue, LogLevel,
        LogOption, Logger, LoggerBuilder, LoggerError, Options, OutputFormat, Result, Sink,
    };
    pub use crate::global;
    pub use crate::writer::{framework_error_writer, framework_writer, FrameworkWriter};
}

pub use crate::core::{
    with_compress, with_development, with_disable_caller, with_disable_stacktrace,
    with_error_output_paths, with_filename, with_format, with_level, with_max_age,
    with_max_backups, with_max_size, with_output_paths, Caller, Config, Field, FieldValue,
    LogEntry, LogLevel, LogOption, Logger, LoggerBuilder, LoggerError, Options, OutputFormat,
    Result, Sink,
};
pub use context::{
    context_with_request_id, context_with_trace_id, from_context, from_current_context,
    request_id_from_context, trace_id_from_context,
};
pub use global::{get_logger, init, init_from_config, init_with_options, reset, sync};
pub use writer::{framework_error_writer, framework_writer, FrameworkWriter};
