//! Logging macros for formatted messages through the global logger.
//!
//! Each macro takes a format string and arguments like `format!`, then
//! optional structured fields after a `;`.
//!
//! # Examples
//!
//! ```
//! use rust_logger_facade::{fields, info, warn};
//!
//! let port = 8080;
//! info!("Server listening on port {}", port);
//! warn!("slow request"; "path" => "/orders", "elapsed_ms" => 1250u64);
//!
//! let fields = fields!["user" => "alice", "attempt" => 3];
//! assert_eq!(fields.len(), 2);
//! ```

/// Build an array of [`Field`](crate::Field)s from `key => value` pairs.
#[macro_export]
macro_rules! fields {
    () => {{
        let empty: [$crate::Field; 0] = [];
        empty
    }};
    ($($key:expr => $value:expr),+) => {
        [$($crate::Field::new($key, $value)),+]
    };
}

/// Log a formatted message at the given level.
///
/// ```
/// use rust_logger_facade::{log, LogLevel};
///
/// log!(LogLevel::Error, "Error code: {}", 500);
/// log!(LogLevel::Info, "cache warmed"; "entries" => 1024u64);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $fmt:literal $(, $arg:expr)* $(; $($key:expr => $value:expr),+)?) => {
        $crate::global::log(
            $level,
            &::std::format!($fmt $(, $arg)*),
            &[$($($crate::Field::new($key, $value)),+)?],
        )
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Error, $($arg)+)
    };
}
