//! Size-based rotating file sink
//!
//! The active file keeps its configured name. When a write would push it past
//! the size limit, it is renamed to a timestamped backup
//! (`app-2025-01-08T10-30-45.123.log`) and a fresh file is opened in its
//! place. When the sink is opened and after each rotation, old backups are
//! pruned by count and age, and the survivors are optionally gzip-compressed.

use crate::core::error::{LoggerError, Result};
use crate::core::Sink;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const MEGABYTE: u64 = 1024 * 1024;
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

/// When to rotate and which backups to keep
///
/// A zero value means "use the default" for the size limit and "no limit"
/// for the retention knobs.
///
/// # Examples
///
/// ```
/// use rust_logger_facade::sinks::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(50)
///     .with_max_backups(7)
///     .with_max_age_days(30)
///     .with_compression(true);
/// assert_eq!(policy.max_file_size(), 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Size limit of the active file in bytes (0: 100 MB)
    pub max_bytes: u64,
    /// Days to retain backups (0: forever)
    pub max_age_days: u64,
    /// Number of backups to retain (0: all)
    pub max_backups: usize,
    /// Gzip backups after rotation
    pub compress: bool,
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        self.max_bytes = megabytes.saturating_mul(MEGABYTE);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Effective size limit in bytes.
    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        if self.max_bytes == 0 {
            DEFAULT_MAX_SIZE_MB * MEGABYTE
        } else {
            self.max_bytes
        }
    }
}

#[derive(Debug)]
struct Backup {
    path: PathBuf,
    created: DateTime<Utc>,
    compressed: bool,
}

/// File sink with size-based rotation
///
/// # Examples
///
/// ```no_run
/// use rust_logger_facade::sinks::{RotatingFileSink, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_size_mb(10).with_max_backups(3);
/// let sink = RotatingFileSink::with_policy("/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileSink {
    base_path: PathBuf,
    display_name: String,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    last_backup_millis: i64,
    /// Retention failure from opening, returned by the next write
    pending_cleanup: Option<LoggerError>,
}

impl RotatingFileSink {
    /// Open `path` with the default policy.
    ///
    /// # Errors
    ///
    /// Returns error if the parent directory or the file cannot be created
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Open `path` for appending, creating missing parent directories.
    ///
    /// Backups left by earlier runs are pruned and compressed right away. A
    /// failure there does not fail the open; it is returned by the first
    /// write instead.
    ///
    /// # Errors
    ///
    /// Returns error if the parent directory or the file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = open_active(&base_path)?;

        let mut sink = Self {
            display_name: base_path.display().to_string(),
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
            last_backup_millis: i64::MIN,
            pending_cleanup: None,
        };
        sink.pending_cleanup = sink.remove_stale_backups().err();
        Ok(sink)
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Close the active file, move it to a backup name and start a new one.
    ///
    /// Pruning and compression failures are returned after the new file is
    /// in place, so the sink stays writable.
    pub fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.display_name.clone(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.base_path.exists() {
            let backup = self.next_backup_path();
            if let Err(e) = fs::rename(&self.base_path, &backup) {
                self.reopen()?;
                return Err(LoggerError::file_rotation(
                    self.display_name.clone(),
                    format!("Failed to rename to '{}': {}", backup.display(), e),
                ));
            }
        }

        self.reopen()?;
        self.remove_stale_backups()
    }

    fn reopen(&mut self) -> Result<()> {
        let (file, size) = open_active(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        Ok(())
    }

    /// `stem` and `.ext` of the active file name.
    fn name_parts(&self) -> (String, String) {
        let file_name = self
            .base_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match file_name.rfind('.') {
            Some(dot) if dot > 0 => (file_name[..dot].to_string(), file_name[dot..].to_string()),
            _ => (file_name, String::new()),
        }
    }

    /// Backup name for a rotation happening now.
    ///
    /// Stamps strictly increase across rotations of this sink, so pruning
    /// by name order never mistakes a fresh backup for an old one.
    fn next_backup_path(&mut self) -> PathBuf {
        let now = Utc::now().timestamp_millis();
        let (millis, path) = self.backup_path(now.max(self.last_backup_millis.saturating_add(1)));
        self.last_backup_millis = millis;
        path
    }

    /// First free backup name at or after `millis`, bumping by a
    /// millisecond on collision.
    fn backup_path(&self, mut millis: i64) -> (i64, PathBuf) {
        let (stem, ext) = self.name_parts();
        loop {
            let at = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
            let name = format!("{}-{}{}", stem, at.format(BACKUP_TIME_FORMAT), ext);
            let candidate = self.base_path.with_file_name(name);
            let compressed = append_suffix(&candidate, COMPRESS_SUFFIX);
            if !candidate.exists() && !compressed.exists() {
                return (millis, candidate);
            }
            millis += 1;
        }
    }

    /// Backups of this file, newest first.
    fn list_backups(&self) -> Result<Vec<Backup>> {
        let dir = match self.base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let (stem, ext) = self.name_parts();
        let prefix = format!("{}-", stem);

        let entries = fs::read_dir(&dir).map_err(|e| {
            LoggerError::io_operation(
                "list log backups",
                format!("Failed to read directory '{}'", dir.display()),
                e,
            )
        })?;

        let mut backups = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let (body, compressed) = match name.strip_suffix(COMPRESS_SUFFIX) {
                Some(body) => (body, true),
                None => (name.as_str(), false),
            };
            let Some(stamp) = body
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_suffix(ext.as_str()))
            else {
                continue;
            };
            if let Ok(created) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) {
                backups.push(Backup {
                    path: entry.path(),
                    created: created.and_utc(),
                    compressed,
                });
            }
        }

        backups.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(backups)
    }

    /// Apply the retention rules, then compress what is left.
    fn remove_stale_backups(&self) -> Result<()> {
        if self.policy.max_backups == 0 && self.policy.max_age_days == 0 && !self.policy.compress
        {
            return Ok(());
        }

        let mut backups = self.list_backups()?;
        let mut stale = Vec::new();

        if self.policy.max_backups > 0 && backups.len() > self.policy.max_backups {
            stale.extend(backups.split_off(self.policy.max_backups));
        }

        let cutoff = i64::try_from(self.policy.max_age_days)
            .ok()
            .filter(|days| *days > 0)
            .and_then(chrono::Duration::try_days)
            .and_then(|age| Utc::now().checked_sub_signed(age));
        if let Some(cutoff) = cutoff {
            let (keep, expired): (Vec<_>, Vec<_>) =
                backups.into_iter().partition(|b| b.created >= cutoff);
            backups = keep;
            stale.extend(expired);
        }

        let mut failures = Vec::new();
        for backup in &stale {
            if let Err(e) = fs::remove_file(&backup.path) {
                failures.push(format!("remove '{}': {}", backup.path.display(), e));
            }
        }

        if self.policy.compress {
            for backup in backups.iter().filter(|b| !b.compressed) {
                if let Err(e) = compress_file(&backup.path) {
                    failures.push(e.to_string());
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::file_rotation(
                self.display_name.clone(),
                failures.join("; "),
            ))
        }
    }
}

fn open_active(path: &Path) -> Result<(File, u64)> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
        })?;

    let size = file.metadata().map(|m| m.len()).map_err(|e| {
        LoggerError::file_appender(
            path.display().to_string(),
            format!("Cannot access file metadata: {}", e),
        )
    })?;

    Ok((file, size))
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Gzip `path` next to itself and remove the original.
///
/// Output goes to a temporary file first; the original is only removed
/// once the compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::BufReader;

    let gz_path = append_suffix(path, COMPRESS_SUFFIX);
    let temp_gz_path = append_suffix(path, ".gz.tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    if let Err(e) = stream_gzip(&mut reader, encoder) {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    fs::remove_file(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Compressed but failed to remove original {}", path.display()),
            e,
        )
    })
}

fn stream_gzip<R, W>(reader: &mut R, mut encoder: flate2::write::GzEncoder<W>) -> std::io::Result<()>
where
    R: std::io::Read,
    W: Write,
{
    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        encoder.write_all(&buffer[..bytes_read])?;
    }
    encoder.finish()?.flush()
}

impl Sink for RotatingFileSink {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        let len = buf.len() as u64;
        let max = self.policy.max_file_size();
        if len > max {
            return Err(LoggerError::file_appender(
                self.display_name.clone(),
                format!("write length {} exceeds maximum file size {}", len, max),
            ));
        }

        let mut cleanup = Ok(());
        if self.current_size + len > max {
            cleanup = self.rotate();
            if self.writer.is_none() {
                return cleanup;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer.write_all(buf).map_err(|e| {
            LoggerError::file_appender(
                self.display_name.clone(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += len;

        self.pending_cleanup.take().map_or(cleanup, Err)
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.display_name.clone(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.display_name
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
