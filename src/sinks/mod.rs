//! Output sinks for encoded log records

pub mod buffer;
pub mod console;
pub mod multi;
pub mod rotating_file;

pub use buffer::BufferSink;
pub use console::{ConsoleSink, ConsoleStream};
pub use multi::MultiSink;
pub use rotating_file::{RotatingFileSink, RotationPolicy};
