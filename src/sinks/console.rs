//! Console sink writing to the process's standard streams

use crate::core::{Result, Sink};
use std::io::Write;

/// One of the two process streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

impl ConsoleStream {
    /// Match an output path name case-insensitively.
    ///
    /// Returns `None` for anything other than `stdout` or `stderr`.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.to_ascii_lowercase().as_str() {
            "stdout" => Some(ConsoleStream::Stdout),
            "stderr" => Some(ConsoleStream::Stderr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }
}

#[derive(Debug)]
pub struct ConsoleSink {
    stream: ConsoleStream,
}

impl ConsoleSink {
    pub fn new(stream: ConsoleStream) -> Self {
        Self { stream }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().lock().write_all(buf)?,
            ConsoleStream::Stderr => std::io::stderr().lock().write_all(buf)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        self.stream.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_from_path() {
        assert_eq!(ConsoleStream::from_path("stdout"), Some(ConsoleStream::Stdout));
        assert_eq!(ConsoleStream::from_path("STDERR"), Some(ConsoleStream::Stderr));
        assert_eq!(ConsoleStream::from_path("StdOut"), Some(ConsoleStream::Stdout));
        assert_eq!(ConsoleStream::from_path("/var/log/app.log"), None);
        assert_eq!(ConsoleStream::from_path(""), None);
    }

    #[test]
    fn test_sink_name() {
        assert_eq!(ConsoleSink::stdout().name(), "stdout");
        assert_eq!(ConsoleSink::stderr().name(), "stderr");
    }
}
