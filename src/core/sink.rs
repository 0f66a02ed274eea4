//! Sink trait for encoded log output

use super::error::Result;

/// A destination for encoded log records.
///
/// Sinks receive fully encoded, newline-terminated records. They are
/// always accessed behind the owning logger's lock, so implementations
/// only need to be `Send`.
pub trait Sink: Send {
    fn write(&mut self, buf: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
