//! Byte-stream adapters for third-party framework logs
//!
//! A [`FrameworkWriter`] turns every write into one entry on the current
//! global logger at a fixed level. Frameworks that log through
//! `std::io::Write` can be pointed at one directly; with the
//! `tracing-compat` feature it is also a `tracing_subscriber` `MakeWriter`.
//!
//! ```no_run
//! use std::io::Write;
//!
//! let mut access_log = rust_logger_facade::writer::framework_writer();
//! writeln!(access_log, "GET /health 200").unwrap();
//! ```

use crate::core::{LogLevel, Logger};
use crate::global;
use std::io;

/// `io::Write` adapter logging each write as one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkWriter {
    level: LogLevel,
}

impl FrameworkWriter {
    /// Writer logging at `level`.
    ///
    /// Debug, info, warn and error are honoured; any other level logs at
    /// info so a framework write can never panic or exit the process.
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }
}

/// Writer for a framework's regular output, logged at info.
pub fn framework_writer() -> FrameworkWriter {
    FrameworkWriter::new(LogLevel::Info)
}

/// Writer for a framework's error output, logged at error.
pub fn framework_error_writer() -> FrameworkWriter {
    FrameworkWriter::new(LogLevel::Error)
}

/// Log `buf` minus one trailing newline; returns the bytes consumed.
fn emit(logger: &Logger, level: LogLevel, buf: &[u8]) -> usize {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let message = String::from_utf8_lossy(line);

    match level {
        LogLevel::Debug => logger.debug(&message, &[]),
        LogLevel::Info => logger.info(&message, &[]),
        LogLevel::Warn => logger.warn(&message, &[]),
        LogLevel::Error => logger.error(&message, &[]),
        _ => logger.info(&message, &[]),
    }

    buf.len()
}

impl io::Write for FrameworkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(emit(&global::get_logger(), self.level, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(feature = "tracing-compat")]
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for FrameworkWriter {
    type Writer = FrameworkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}
