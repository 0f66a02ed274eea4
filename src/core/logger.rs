//! Main logger implementation

use super::{
    encoder::{format_timestamp, OutputFormat},
    error::{LoggerError, Result},
    field::Field,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    options::Options,
    sink::Sink,
};
use crate::sinks::{ConsoleSink, ConsoleStream, MultiSink, RotatingFileSink, RotationPolicy};
use chrono::Utc;
use parking_lot::Mutex;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// State shared by a logger and every logger derived from it
struct LoggerCore {
    min_level: LogLevel,
    format: OutputFormat,
    sink: Mutex<MultiSink>,
    error_sink: Mutex<MultiSink>,
    add_caller: bool,
    stacktrace_level: Option<LogLevel>,
    development: bool,
}

/// Leveled, structured logger
///
/// Cloning is cheap and clones share sinks. [`Logger::with`] derives a
/// logger carrying extra fields on every entry.
///
/// # Example
///
/// ```
/// use rust_logger_facade::prelude::*;
/// use rust_logger_facade::sinks::BufferSink;
///
/// let buffer = BufferSink::new();
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .format(OutputFormat::Json)
///     .sink(buffer.clone())
///     .build();
///
/// let request_logger = logger.with(&[Field::string("request", "r-1")]);
/// request_logger.info("handled", &[Field::int("status", 200)]);
///
/// assert!(buffer.contents().contains("\"request\":\"r-1\""));
/// ```
#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
    fields: Arc<[Field]>,
}

impl Logger {
    /// Build a logger from `options`.
    ///
    /// Never fails: unknown levels resolve to info, unknown formats to
    /// console and unknown output names are skipped. A log file that
    /// cannot be opened is reported on the error output and left out.
    pub fn build(options: &Options) -> Self {
        let mut level_name = options.level.as_str();
        if options.development && level_name == LogLevel::Info.as_str() {
            level_name = LogLevel::Debug.as_str();
        }
        let min_level = level_name.parse().unwrap_or(LogLevel::Info);

        let stacktrace_level = if options.disable_stacktrace {
            None
        } else if options.development {
            Some(LogLevel::Warn)
        } else {
            Some(LogLevel::Error)
        };

        let mut error_sink = MultiSink::new();
        for sink in console_sinks(&options.error_output_paths) {
            error_sink.push(Box::new(sink));
        }
        if error_sink.is_empty() {
            error_sink.push(Box::new(ConsoleSink::stderr()));
        }

        let mut sink = MultiSink::new();
        if !options.filename.is_empty() {
            match RotatingFileSink::with_policy(&options.filename, rotation_policy(options)) {
                Ok(file) => sink.push(Box::new(file)),
                Err(e) => report(&mut error_sink, "open log file", &e),
            }
        }
        for console in console_sinks(&options.output_paths) {
            sink.push(Box::new(console));
        }

        Self::from_core(LoggerCore {
            min_level,
            format: OutputFormat::from_name(&options.format),
            sink: Mutex::new(sink),
            error_sink: Mutex::new(error_sink),
            add_caller: options.development || !options.disable_caller,
            stacktrace_level,
            development: options.development,
        })
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn from_core(core: LoggerCore) -> Self {
        Self {
            core: Arc::new(core),
            fields: Arc::from(Vec::<Field>::new()),
        }
    }

    /// A logger sharing this one's sinks and level that adds `fields` to
    /// every entry, after the fields already bound here.
    #[must_use]
    pub fn with(&self, fields: &[Field]) -> Self {
        if fields.is_empty() {
            return self.clone();
        }
        let combined: Vec<Field> = self.fields.iter().chain(fields).cloned().collect();
        Self {
            core: Arc::clone(&self.core),
            fields: Arc::from(combined),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.core.min_level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.core.min_level
    }

    pub fn is_development(&self) -> bool {
        self.core.development
    }

    pub fn format(&self) -> OutputFormat {
        self.core.format
    }

    /// Fields bound by [`with`](Self::with)
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Log at `level`, escalating for the three highest levels.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: &str, fields: &[Field]) {
        match level {
            LogLevel::DPanic => self.dpanic(message, fields),
            LogLevel::Panic => self.panic(message, fields),
            LogLevel::Fatal => self.fatal(message, fields),
            _ => self.emit(level, message, fields, Location::caller()),
        }
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.emit(LogLevel::Debug, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.emit(LogLevel::Info, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.emit(LogLevel::Warn, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.emit(LogLevel::Error, message, fields, Location::caller());
    }

    /// Log, then panic when the logger is in development mode.
    #[track_caller]
    pub fn dpanic(&self, message: &str, fields: &[Field]) {
        self.emit(LogLevel::DPanic, message, fields, Location::caller());
        if self.core.development {
            panic!("{}", message);
        }
    }

    /// Log, then panic with `message`, whatever the minimum level.
    #[track_caller]
    pub fn panic(&self, message: &str, fields: &[Field]) -> ! {
        self.emit(LogLevel::Panic, message, fields, Location::caller());
        panic!("{}", message);
    }

    /// Log, flush, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        self.emit(LogLevel::Fatal, message, fields, Location::caller());
        let _ = self.sync();
        std::process::exit(1);
    }

    /// Flush every output sink.
    pub fn sync(&self) -> Result<()> {
        self.core.sink.lock().flush()
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: &[Field],
        location: &'static Location<'static>,
    ) {
        if !self.enabled(level) {
            return;
        }

        let mut entry = LogEntry::new(level, message)
            .with_fields(self.fields.iter().chain(fields).cloned().collect());
        if self.core.add_caller {
            entry = entry.with_caller(Caller::from_location(location));
        }
        if self.core.stacktrace_level.is_some_and(|min| level >= min) {
            entry = entry.with_stacktrace(Backtrace::force_capture().to_string());
        }

        let encoded = match self.core.format.encode(&entry) {
            Ok(encoded) => encoded,
            Err(e) => {
                report(&mut self.core.error_sink.lock(), "encode", &e);
                return;
            }
        };
        let result = {
            let mut sink = self.core.sink.lock();
            let written = sink.write(encoded.as_bytes());
            if level > LogLevel::Error {
                written.and_then(|_| sink.flush())
            } else {
                written
            }
        };

        if let Err(e) = result {
            report(&mut self.core.error_sink.lock(), "write", &e);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::build(&Options::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.core.min_level)
            .field("format", &self.core.format)
            .field("sinks", &self.core.sink.lock().names().len())
            .field("development", &self.core.development)
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Write one diagnostic line about the logger itself.
fn report(error_sink: &mut MultiSink, operation: &str, err: &LoggerError) {
    let line = format!("{} {} error: {}\n", format_timestamp(&Utc::now()), operation, err);
    let _ = error_sink.write(line.as_bytes());
    let _ = error_sink.flush();
}

/// Console sinks for `paths`, one per distinct stream.
fn console_sinks(paths: &[String]) -> Vec<ConsoleSink> {
    let mut streams: Vec<ConsoleStream> = Vec::new();
    for stream in paths.iter().filter_map(|path| ConsoleStream::from_path(path)) {
        if !streams.contains(&stream) {
            streams.push(stream);
        }
    }
    streams.into_iter().map(ConsoleSink::new).collect()
}

fn rotation_policy(options: &Options) -> RotationPolicy {
    let non_negative = |value: i64| u64::try_from(value).unwrap_or(0);
    RotationPolicy::new()
        .with_max_size_mb(non_negative(options.max_size))
        .with_max_age_days(non_negative(options.max_age))
        .with_max_backups(usize::try_from(options.max_backups).unwrap_or(0))
        .with_compression(options.compress)
}

/// Builder for loggers writing to caller-supplied sinks
///
/// Defaults: info level, console format, caller on, stack traces at error
/// and above, stderr for internal errors.
pub struct LoggerBuilder {
    min_level: LogLevel,
    format: OutputFormat,
    sinks: Vec<Box<dyn Sink>>,
    error_sinks: Vec<Box<dyn Sink>>,
    add_caller: bool,
    stacktrace_level: Option<LogLevel>,
    development: bool,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            format: OutputFormat::Console,
            sinks: Vec::new(),
            error_sinks: Vec::new(),
            add_caller: true,
            stacktrace_level: Some(LogLevel::Error),
            development: false,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Add an output sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Add a sink for the logger's own errors
    #[must_use = "builder methods return a new value"]
    pub fn error_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.error_sinks.push(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_caller(mut self, enabled: bool) -> Self {
        self.add_caller = enabled;
        self
    }

    /// Minimum level that captures a stack trace, `None` to disable
    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_level(mut self, level: Option<LogLevel>) -> Self {
        self.stacktrace_level = level;
        self
    }

    /// Development mode makes `dpanic` panic.
    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, enabled: bool) -> Self {
        self.development = enabled;
        self
    }

    pub fn build(self) -> Logger {
        let mut sink = MultiSink::new();
        for s in self.sinks {
            sink.push(s);
        }

        let mut error_sink = MultiSink::new();
        for s in self.error_sinks {
            error_sink.push(s);
        }
        if error_sink.is_empty() {
            error_sink.push(Box::new(ConsoleSink::stderr()));
        }

        Logger::from_core(LoggerCore {
            min_level: self.min_level,
            format: self.format,
            sink: Mutex::new(sink),
            error_sink: Mutex::new(error_sink),
            add_caller: self.add_caller,
            stacktrace_level: self.stacktrace_level,
            development: self.development,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{with_development, with_disable_caller, with_output_paths};
    use crate::sinks::BufferSink;

    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> Result<()> {
            Err(LoggerError::writer("disk gone"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn json_logger(level: LogLevel) -> (Logger, BufferSink) {
        let buffer = BufferSink::new();
        let logger = Logger::builder()
            .min_level(level)
            .format(OutputFormat::Json)
            .sink(buffer.clone())
            .build();
        (logger, buffer)
    }

    fn parse_lines(buffer: &BufferSink) -> Vec<serde_json::Value> {
        buffer
            .lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_level_filtering() {
        let (logger, buffer) = json_logger(LogLevel::Warn);

        logger.debug("hidden", &[]);
        logger.info("hidden", &[]);
        logger.warn("shown", &[]);
        logger.error("shown", &[]);

        let entries = parse_lines(&buffer);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["level"], "WARN");
        assert_eq!(entries[1]["level"], "ERROR");
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let (logger, buffer) = json_logger(LogLevel::Info);

        logger.info("here", &[]);
        let expected_line = line!() - 1;

        let entries = parse_lines(&buffer);
        assert_eq!(
            entries[0]["caller"],
            format!("core/logger.rs:{}", expected_line)
        );
    }

    #[test]
    fn test_log_dispatches_by_level() {
        let (logger, buffer) = json_logger(LogLevel::Debug);

        logger.log(LogLevel::Debug, "d", &[]);
        logger.log(LogLevel::Warn, "w", &[]);

        let entries = parse_lines(&buffer);
        assert_eq!(entries[0]["level"], "DEBUG");
        assert_eq!(entries[1]["msg"], "w");
    }

    #[test]
    fn test_derived_logger_fields() {
        let (logger, buffer) = json_logger(LogLevel::Info);
        let derived = logger
            .with(&[Field::string("service", "api")])
            .with(&[Field::string("request", "r-9")]);

        derived.info("call", &[Field::int("attempt", 2)]);
        logger.info("plain", &[]);

        let lines = buffer.lines();
        let service = lines[0].find("\"service\"").unwrap();
        let request = lines[0].find("\"request\"").unwrap();
        let attempt = lines[0].find("\"attempt\"").unwrap();
        assert!(service < request && request < attempt);
        assert!(!lines[1].contains("service"));
        assert_eq!(derived.fields().len(), 2);
        assert!(logger.fields().is_empty());
    }

    #[test]
    fn test_bound_and_call_fields_all_reach_output() {
        let buffer = BufferSink::new();
        let logger = Logger::builder()
            .format(OutputFormat::Json)
            .add_caller(false)
            .sink(buffer.clone())
            .build();

        logger.with(&[Field::string("a", "bound")]).info(
            "m",
            &[Field::string("caller", "user-value"), Field::string("a", "call")],
        );

        let line = buffer.lines().remove(0);
        assert!(line.ends_with(
            "\"msg\":\"m\",\"a\":\"bound\",\"caller\":\"user-value\",\"a\":\"call\"}"
        ));
    }

    #[test]
    fn test_stacktrace_threshold() {
        let (logger, buffer) = json_logger(LogLevel::Info);

        logger.warn("no trace", &[]);
        logger.error("with trace", &[]);

        let entries = parse_lines(&buffer);
        assert!(entries[0].get("stacktrace").is_none());
        assert!(entries[1].get("stacktrace").is_some());
    }

    #[test]
    fn test_write_errors_go_to_error_sink() {
        let errors = BufferSink::new();
        let logger = Logger::builder()
            .sink(FailingSink)
            .error_sink(errors.clone())
            .build();

        logger.info("lost", &[]);

        let reported = errors.contents();
        assert!(reported.contains("write error:"));
        assert!(reported.contains("disk gone"));
    }

    #[test]
    #[should_panic(expected = "unrecoverable")]
    fn test_panic_escalates() {
        let (logger, _buffer) = json_logger(LogLevel::Info);
        logger.panic("unrecoverable", &[]);
    }

    #[test]
    #[should_panic(expected = "filtered but fatal")]
    fn test_panic_escalates_below_min_level() {
        let (logger, _buffer) = json_logger(LogLevel::Fatal);
        logger.log(LogLevel::Panic, "filtered but fatal", &[]);
    }

    #[test]
    fn test_dpanic_only_logs_in_production() {
        let (logger, buffer) = json_logger(LogLevel::Info);
        logger.dpanic("odd state", &[]);
        assert_eq!(parse_lines(&buffer)[0]["level"], "DPANIC");
    }

    #[test]
    #[should_panic(expected = "odd state")]
    fn test_dpanic_panics_in_development() {
        let logger = Logger::builder().development(true).sink(BufferSink::new()).build();
        logger.dpanic("odd state", &[]);
    }

    #[test]
    fn test_build_resolves_defaults() {
        let mut options = Options::new();
        options.level = "bogus".to_string();
        options.format = "xml".to_string();
        options.output_paths = vec!["nowhere".to_string()];

        let logger = Logger::build(&options);
        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(logger.format(), OutputFormat::Console);
        assert!(logger.sync().is_ok());
    }

    #[test]
    fn test_build_development_promotes_info() {
        let options = Options::new().with(with_development(true));
        let logger = Logger::build(&options);
        assert_eq!(logger.level(), LogLevel::Debug);
        assert!(logger.is_development());
        assert!(logger.core.add_caller);
        assert_eq!(logger.core.stacktrace_level, Some(LogLevel::Warn));
    }

    #[test]
    fn test_build_deduplicates_outputs() {
        let options = Options::new()
            .with(with_output_paths(["stdout", "STDOUT", "stderr", "Stdout"]))
            .with(with_disable_caller(true));
        let logger = Logger::build(&options);

        assert_eq!(logger.core.sink.lock().names(), vec!["stdout", "stderr"]);
        assert!(!logger.core.add_caller);
    }

    #[test]
    fn test_build_empty_error_outputs_default_to_stderr() {
        let mut options = Options::new();
        options.error_output_paths.clear();
        let logger = Logger::build(&options);
        assert_eq!(logger.core.error_sink.lock().names(), vec!["stderr"]);
    }

    #[test]
    fn test_build_from_default_config_has_no_outputs() {
        let logger = Logger::build(&crate::core::Config::default().to_options());

        assert!(logger.core.sink.lock().names().is_empty());
        assert_eq!(logger.core.error_sink.lock().names(), vec!["stderr"]);
        logger.error("discarded", &[]);
        assert!(logger.sync().is_ok());
    }

    #[test]
    fn test_build_file_sink_comes_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut options = Options::new();
        options.filename = path.display().to_string();

        let logger = Logger::build(&options);
        let names = logger.core.sink.lock().names().join(",");
        assert_eq!(names, format!("{},stdout", path.display()));
    }
}
