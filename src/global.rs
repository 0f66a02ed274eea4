//! Process-wide logger
//!
//! The global logger is built from default options on first use and can be
//! replaced at any time with [`init`]. Log calls load the current logger
//! through an atomic pointer and never wait on a re-initialisation in
//! progress; re-initialisations are serialized among themselves.
//!
//! ```
//! use rust_logger_facade::{global, with_format, with_level, Field};
//!
//! global::init([with_level("debug"), with_format("json")]);
//! global::info("service started", &[Field::uint("port", 8080)]);
//! global::sync().ok();
//! ```

use crate::core::{Config, Field, LogLevel, LogOption, Logger, Options, Result};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<ArcSwap<Logger>> =
    LazyLock::new(|| ArcSwap::from_pointee(Logger::build(&Options::new())));

static INIT_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Rebuild the global logger from the defaults plus `options`.
pub fn init<I>(options: I)
where
    I: IntoIterator<Item = LogOption>,
{
    let mut resolved = Options::new();
    resolved.apply(options);
    init_with_options(&resolved);
}

/// Rebuild the global logger from a complete [`Options`].
pub fn init_with_options(options: &Options) {
    let _guard = INIT_LOCK.lock();
    GLOBAL.store(Arc::new(Logger::build(options)));
}

/// Validate `config`, then rebuild the global logger from it.
///
/// # Errors
///
/// Returns the validation error; the current logger is kept in that case.
pub fn init_from_config(config: &Config) -> Result<()> {
    config.validate()?;
    init_with_options(&config.to_options());
    Ok(())
}

/// Restore the default global logger.
pub fn reset() {
    init(Vec::new());
}

/// The current global logger.
pub fn get_logger() -> Arc<Logger> {
    GLOBAL.load_full()
}

/// Flush the current global logger.
pub fn sync() -> Result<()> {
    GLOBAL.load().sync()
}

#[track_caller]
pub fn log(level: LogLevel, message: &str, fields: &[Field]) {
    GLOBAL.load().log(level, message, fields);
}

#[track_caller]
pub fn debug(message: &str, fields: &[Field]) {
    GLOBAL.load().debug(message, fields);
}

#[track_caller]
pub fn info(message: &str, fields: &[Field]) {
    GLOBAL.load().info(message, fields);
}

#[track_caller]
pub fn warn(message: &str, fields: &[Field]) {
    GLOBAL.load().warn(message, fields);
}

#[track_caller]
pub fn error(message: &str, fields: &[Field]) {
    GLOBAL.load().error(message, fields);
}

/// Panics after logging if the global logger is in development mode.
#[track_caller]
pub fn dpanic(message: &str, fields: &[Field]) {
    GLOBAL.load().dpanic(message, fields);
}

#[track_caller]
pub fn panic(message: &str, fields: &[Field]) -> ! {
    GLOBAL.load_full().panic(message, fields)
}

/// Logs, flushes and exits the process with status 1.
#[track_caller]
pub fn fatal(message: &str, fields: &[Field]) -> ! {
    GLOBAL.load_full().fatal(message, fields)
}
