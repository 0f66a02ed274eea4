//! Entry encoders
//!
//! Two encodings are supported:
//! - Json: one compact JSON object per line
//! - Console: tab-separated, human-readable line
//!
//! Both use the same fixed keys (see [`keys`]), upper-case levels, ISO 8601
//! timestamps with millisecond precision and the short caller form. Fields
//! are written in order and a repeated key is written again, never merged.

use super::error::Result;
use super::log_entry::LogEntry;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Keys used by both encoders.
pub mod keys {
    pub const MESSAGE: &str = "msg";
    pub const LEVEL: &str = "level";
    pub const TIME: &str = "ts";
    pub const CALLER: &str = "caller";
    pub const STACKTRACE: &str = "stacktrace";
}

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Machine-readable JSON, one object per line
    ///
    /// Example: `{"level":"INFO","ts":"2025-01-08T10:30:45.123Z","caller":"src/main.rs:12","msg":"Request processed"}`
    Json,

    /// Human-readable console format (default)
    ///
    /// Example: `2025-01-08T10:30:45.123Z	INFO	src/main.rs:12	Request processed	{"status":200}`
    #[default]
    Console,
}

impl OutputFormat {
    /// Resolve a configured format name; anything but `json` is console.
    pub fn from_name(name: &str) -> Self {
        if name == "json" {
            OutputFormat::Json
        } else {
            OutputFormat::Console
        }
    }

    /// Encode an entry into a single newline-terminated record.
    pub fn encode(&self, entry: &LogEntry) -> Result<String> {
        match self {
            OutputFormat::Json => encode_json(entry),
            OutputFormat::Console => encode_console(entry),
        }
    }
}

/// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Whether `key` names a built-in key this entry's JSON record already has.
///
/// Caller and stacktrace only count when the entry carries them.
fn shadows_builtin(entry: &LogEntry, key: &str) -> bool {
    match key {
        keys::LEVEL | keys::TIME | keys::MESSAGE => true,
        keys::CALLER => entry.caller.is_some(),
        keys::STACKTRACE => entry.stacktrace.is_some(),
        _ => false,
    }
}

/// The whole entry as one JSON object.
struct JsonRecord<'a>(&'a LogEntry);

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entry = self.0;
        let mut map = serializer.serialize_map(None)?;

        map.serialize_entry(keys::LEVEL, entry.level.to_str())?;
        map.serialize_entry(keys::TIME, &format_timestamp(&entry.timestamp))?;
        if let Some(caller) = entry.caller {
            map.serialize_entry(keys::CALLER, &caller.short())?;
        }
        map.serialize_entry(keys::MESSAGE, &entry.message)?;

        for field in entry.fields.iter().filter(|f| !shadows_builtin(entry, f.key())) {
            map.serialize_entry(field.key(), &field.value().to_json_value())?;
        }

        if let Some(ref stacktrace) = entry.stacktrace {
            map.serialize_entry(keys::STACKTRACE, stacktrace)?;
        }
        map.end()
    }
}

/// Only the entry's fields, as the trailing console column.
struct FieldsObject<'a>(&'a LogEntry);

impl Serialize for FieldsObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let fields = &self.0.fields;
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            map.serialize_entry(field.key(), &field.value().to_json_value())?;
        }
        map.end()
    }
}

fn encode_json(entry: &LogEntry) -> Result<String> {
    let mut line = serde_json::to_string(&JsonRecord(entry))?;
    line.push('\n');
    Ok(line)
}

/// Escape line breaks and tabs so a message cannot forge extra records
/// or columns in console output.
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn encode_console(entry: &LogEntry) -> Result<String> {
    let mut line = String::with_capacity(128 + entry.message.len());

    line.push_str(&format_timestamp(&entry.timestamp));
    line.push('\t');
    line.push_str(entry.level.to_str());
    if let Some(caller) = entry.caller {
        line.push('\t');
        line.push_str(&caller.short());
    }
    line.push('\t');
    line.push_str(&sanitize_message(&entry.message));

    if !entry.fields.is_empty() {
        line.push('\t');
        line.push_str(&serde_json::to_string(&FieldsObject(entry))?);
    }

    if let Some(ref stacktrace) = entry.stacktrace {
        line.push('\n');
        line.push_str(stacktrace.trim_end());
    }

    line.push('\n');
    Ok(line)
}
