//! JSONL run logs and the artifact index that ties them to reports.
//!
//! Every line of a run log is one [`LogEntry`]. Four keys are always
//! present (`timestamp`, `trace_id`, `level`, `event`); the per-case keys
//! (`mode`, `symbol`, `case`, `outcome`, `latency_ns`, `artifact_refs`,
//! `details`) appear only when set. Trace ids read
//! `<label>::<run_id>::<seq>` with a zero-padded sequence number.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Result attached to a `case_result` or `run_end` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
    Error,
}

/// Per-case keys, flattened into the line when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Entry point exercised, e.g. `vsnprintf`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "case", default, skip_serializing_if = "Option::is_none")]
    pub case_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ns: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_refs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// One JSONL line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,
    #[serde(flatten)]
    pub context: CaseContext,
}

macro_rules! context_setter {
    ($(#[$doc:meta])* $name:ident, $field:ident: $ty:ty) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name(mut self, value: impl Into<$ty>) -> Self {
            self.context.$field = Some(value.into());
            self
        }
    };
}

impl LogEntry {
    /// An entry stamped with the current UTC time. Pass an empty
    /// `trace_id` to let [`LogEmitter::emit_entry`] assign one.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            context: CaseContext::default(),
        }
    }

    context_setter!(with_mode, mode: String);
    context_setter!(with_symbol, symbol: String);
    context_setter!(with_case, case_name: String);
    context_setter!(with_outcome, outcome: Outcome);
    context_setter!(with_latency_ns, latency_ns: u64);
    context_setter!(
        /// Paths of files produced alongside this line.
        with_artifacts, artifact_refs: Vec<String>
    );
    context_setter!(with_details, details: serde_json::Value);
}

/// Sink for [`LogEntry`] lines that numbers trace ids as it goes.
pub struct LogEmitter<W: Write> {
    sink: W,
    prefix: String,
    issued: u64,
}

impl LogEmitter<BufWriter<File>> {
    /// Create (or truncate) `path` and log into it.
    pub fn to_file(path: &Path, label: &str, run_id: &str) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?), label, run_id))
    }
}

impl LogEmitter<Vec<u8>> {
    #[must_use]
    pub fn to_buffer(label: &str, run_id: &str) -> Self {
        Self::new(Vec::new(), label, run_id)
    }
}

impl<W: Write> LogEmitter<W> {
    pub fn new(sink: W, label: &str, run_id: &str) -> Self {
        Self {
            sink,
            prefix: format!("{label}::{run_id}"),
            issued: 0,
        }
    }

    fn issue_trace_id(&mut self) -> String {
        self.issued += 1;
        format!("{}::{:03}", self.prefix, self.issued)
    }

    /// Write a line carrying only the required keys.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> io::Result<LogEntry> {
        let entry = LogEntry::new(self.issue_trace_id(), level, event);
        self.append(&entry)?;
        Ok(entry)
    }

    /// Write `entry`, numbering it if its trace id is empty.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> io::Result<()> {
        if entry.trace_id.is_empty() {
            entry.trace_id = self.issue_trace_id();
        }
        self.append(&entry)
    }

    fn append(&mut self, entry: &LogEntry) -> io::Result<()> {
        serde_json::to_writer(&mut self.sink, entry).map_err(io::Error::other)?;
        self.sink.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// A file recorded in an [`ArtifactIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub path: String,
    pub kind: String,
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Digest manifest written next to a run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactIndex {
    pub index_version: u32,
    pub run_id: String,
    pub generated_utc: String,
    pub artifacts: Vec<ArtifactEntry>,
}

impl ArtifactIndex {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            index_version: 1,
            run_id: run_id.into(),
            generated_utc: now_utc(),
            artifacts: Vec::new(),
        }
    }

    /// Record an artifact whose digest is already known.
    pub fn add(
        &mut self,
        path: impl Into<String>,
        kind: impl Into<String>,
        sha256: impl Into<String>,
    ) -> &mut Self {
        self.artifacts.push(ArtifactEntry {
            path: path.into(),
            kind: kind.into(),
            sha256: sha256.into(),
            size_bytes: None,
        });
        self
    }

    /// Read `path`, digest it, and record it with its size.
    pub fn add_file(&mut self, path: &Path, kind: impl Into<String>) -> io::Result<&mut Self> {
        let bytes = std::fs::read(path)?;
        let size = u64::try_from(bytes.len()).ok();
        self.add(path.display().to_string(), kind, sha256_hex(&bytes));
        if let Some(last) = self.artifacts.last_mut() {
            last.size_bytes = size;
        }
        Ok(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lowercase hex SHA-256.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    Sha256::digest(data)
        .iter()
        .flat_map(|b| [HEX[usize::from(b >> 4)], HEX[usize::from(b & 0x0f)]])
        .map(char::from)
        .collect()
}

/// A schema violation found by [`validate_log_line`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogLineError {
    #[error("line {line}: not a JSON object: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("line {line}: missing required key `{key}`")]
    MissingKey { line: usize, key: &'static str },
    #[error("line {line}: `{key}` has unexpected value {value:?}")]
    BadValue {
        line: usize,
        key: &'static str,
        value: String,
    },
}

impl LogLineError {
    /// The offending key, or `None` for unparsable lines.
    #[must_use]
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::Malformed { .. } => None,
            Self::MissingKey { key, .. } | Self::BadValue { key, .. } => Some(key),
        }
    }
}

const REQUIRED_KEYS: [&str; 4] = ["timestamp", "trace_id", "level", "event"];

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const MODES: &[&str] = &["strict", "hardened"];
const OUTCOMES: &[&str] = &["pass", "fail", "skip", "error"];

/// Keys whose string values come from a closed set.
const CLOSED_KEYS: [(&str, &[&str]); 3] = [("level", LEVELS), ("mode", MODES), ("outcome", OUTCOMES)];

/// Check one JSONL line and decode it.
pub fn validate_log_line(text: &str, line: usize) -> Result<LogEntry, Vec<LogLineError>> {
    let object = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(object)) => object,
        Ok(other) => {
            return Err(vec![LogLineError::Malformed {
                line,
                reason: format!("found {other}"),
            }]);
        }
        Err(err) => {
            return Err(vec![LogLineError::Malformed {
                line,
                reason: err.to_string(),
            }]);
        }
    };

    let mut problems: Vec<LogLineError> = REQUIRED_KEYS
        .into_iter()
        .filter(|key| !object.contains_key(*key))
        .map(|key| LogLineError::MissingKey { line, key })
        .collect();

    for (key, allowed) in CLOSED_KEYS {
        if let Some(value) = object.get(key).and_then(serde_json::Value::as_str)
            && !allowed.contains(&value)
        {
            problems.push(LogLineError::BadValue {
                line,
                key,
                value: value.to_string(),
            });
        }
    }

    if let Some(trace_id) = object.get("trace_id").and_then(serde_json::Value::as_str)
        && trace_id.split("::").count() != 3
    {
        problems.push(LogLineError::BadValue {
            line,
            key: "trace_id",
            value: trace_id.to_string(),
        });
    }

    if !problems.is_empty() {
        return Err(problems);
    }
    serde_json::from_value(serde_json::Value::Object(object)).map_err(|err| {
        vec![LogLineError::Malformed {
            line,
            reason: err.to_string(),
        }]
    })
}

/// Check every non-blank line of a log file.
///
/// Returns how many lines were checked and every problem found.
pub fn validate_log_file(path: &Path) -> io::Result<(usize, Vec<LogLineError>)> {
    let text = std::fs::read_to_string(path)?;
    let mut checked = 0;
    let mut problems = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        checked += 1;
        if let Err(found) = validate_log_line(line, index + 1) {
            problems.extend(found);
        }
    }
    Ok((checked, problems))
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn now_utc() -> String {
    let since_epoch = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format_utc(since_epoch.as_secs(), since_epoch.subsec_millis())
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`.
fn format_utc(secs: u64, millis: u32) -> String {
    let (days, clock) = (secs / 86_400, secs % 86_400);
    let (year, month, day) = days_to_date(days);
    let (hour, minute, second) = (clock / 3600, clock / 60 % 60, clock % 60);
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{millis:03}Z")
}

/// Gregorian date for a day count since 1970-01-01 (days-from-civil inverse).
fn days_to_date(days: u64) -> (u64, u64, u64) {
    let shifted = days + 719_468;
    let era = shifted / 146_097;
    let day_of_era = shifted % 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    // Months counted from March.
    let march_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * march_month + 2) / 5 + 1;
    let month = if march_month < 10 { march_month + 3 } else { march_month - 9 };
    let year = era * 400 + year_of_era + u64::from(month <= 2);
    (year, month, day)
}
