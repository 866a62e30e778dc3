//! Per-target hourly log files.
//!
//! Every target appends to its own file, named from the configured template
//! with `%DATAHORA%` replaced by the hour bucket (`YYYYMMDDHH00`). When a line
//! belongs to a different hour than the open file, that file is flushed and
//! closed before the next one is opened, so each file holds exactly one hour.
//!
//! Lines look like:
//!
//! ```text
//! 2025-05-03 18:00:05 :: INFO :: Uso CPU: 15.2% | Uso Memória: 30.5%
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike};
use regex::Regex;
use tracing::{error, info, warn};

use crate::error::{ProcmonError, Result};
use crate::process::Sample;
use crate::target::Target;

/// Placeholder in the filename template replaced by the hour bucket.
pub const DATAHORA_PLACEHOLDER: &str = "%DATAHORA%";

/// Timestamp format at the start of every line.
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FIELD_SEPARATOR: &str = " :: ";

/// Number of digits in a rendered hour bucket.
const BUCKET_DIGITS: usize = 12;

// ============================================================================
// Hour buckets
// ============================================================================

/// A timestamp truncated to the top of its hour, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourBucket {
    date: NaiveDate,
    hour: u32,
}

impl HourBucket {
    pub fn from_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        Self {
            date: timestamp.date_naive(),
            hour: timestamp.hour(),
        }
    }
}

/// Renders as `YYYYMMDDHH00`. The minute field is always `00`.
impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}00", self.date.format("%Y%m%d"), self.hour)
    }
}

// ============================================================================
// Levels and line format
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats one newline-terminated log line.
pub fn format_line<Tz: TimeZone>(
    timestamp: &DateTime<Tz>,
    level: LogLevel,
    message: &str,
) -> String
where
    Tz::Offset: fmt::Display,
{
    format!(
        "{}{sep}{}{sep}{}\n",
        timestamp.format(LINE_TIMESTAMP_FORMAT),
        level,
        message,
        sep = FIELD_SEPARATOR
    )
}

// ============================================================================
// Paths
// ============================================================================

/// File name for `target` in `bucket`: `{prefix}{template with %DATAHORA% substituted}`.
pub fn log_file_name(template: &str, target: &Target, bucket: HourBucket) -> String {
    format!(
        "{}{}",
        target.file_prefix(),
        template.replace(DATAHORA_PLACEHOLDER, &bucket.to_string())
    )
}

/// Full path of the log file for `target` in `bucket`. Pure and deterministic.
pub fn log_file_path(
    log_dir: &Path,
    template: &str,
    target: &Target,
    bucket: HourBucket,
) -> PathBuf {
    log_dir.join(log_file_name(template, target, bucket))
}

/// Finds the most recent log file for `target` in `log_dir`.
///
/// Only names of the exact form `{prefix}{head}{12 digits}{tail}` match, where
/// `head`/`tail` are the template parts around `%DATAHORA%`. Returns `Ok(None)`
/// if the directory does not exist or holds no file for the target.
pub fn find_latest_log(log_dir: &Path, template: &str, target: &Target) -> Result<Option<PathBuf>> {
    if !log_dir.is_dir() {
        return Ok(None);
    }

    let (head, tail) = template
        .split_once(DATAHORA_PLACEHOLDER)
        .unwrap_or((template, ""));
    let prefix = format!("{}{}", target.file_prefix(), head);

    let mut latest: Option<(String, PathBuf)> = None;
    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        let bucket = name
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_suffix(tail))
            .filter(|b| b.len() == BUCKET_DIGITS && b.bytes().all(|c| c.is_ascii_digit()));

        if let Some(bucket) = bucket {
            let newer = latest.as_ref().is_none_or(|(best, _)| bucket > best.as_str());
            if newer {
                latest = Some((bucket.to_string(), entry.path()));
            }
        }
    }

    Ok(latest.map(|(_, path)| path))
}

/// Returns the last `n` lines of the file at `path`.
pub fn tail_lines(path: &Path, n: usize) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].iter().map(|l| l.to_string()).collect())
}

// ============================================================================
// Parsing
// ============================================================================

/// A log line split into its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    pub cpu_percent: Option<f32>,
    pub memory_percent: Option<f32>,
}

static CPU_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Uso CPU:\s*([\d.]+)%").ok());
static MEMORY_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Uso Memória:\s*([\d.]+)%").ok());

fn capture_percent(re: &Option<Regex>, message: &str) -> Option<f32> {
    re.as_ref()?.captures(message)?.get(1)?.as_str().parse().ok()
}

/// Parses a line written by [`format_line`]. Returns `None` for lines that
/// do not have the three ` :: `-separated fields.
pub fn parse_log_line(line: &str) -> Option<LogEntry> {
    let mut parts = line.trim_end().splitn(3, FIELD_SEPARATOR);
    let timestamp = parts.next()?;
    let level = parts.next()?;
    let message = parts.next()?;

    Some(LogEntry {
        timestamp: timestamp.to_string(),
        level: level.to_string(),
        message: message.to_string(),
        cpu_percent: capture_percent(&CPU_RE, message),
        memory_percent: capture_percent(&MEMORY_RE, message),
    })
}

// ============================================================================
// Writer
// ============================================================================

/// An open, append-only log file for one target and one hour.
#[derive(Debug)]
struct LogFile {
    file: File,
    bucket: HourBucket,
    path: PathBuf,
}

impl LogFile {
    fn open(path: PathBuf, bucket: HourBucket) -> std::io::Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { file, bucket, path })
    }

    fn append(&mut self, line: &str) -> std::io::Result<()> {
        self.file.write_all(line.as_bytes())
    }

    /// Flushes everything appended so far to disk and closes the handle.
    fn close(mut self) -> std::io::Result<()> {
        self.file.flush()?;
        self.file.sync_all()
    }
}

/// Owns at most one open file per target and rotates it on hour changes.
#[derive(Debug)]
pub struct LogWriter {
    log_dir: PathBuf,
    template: String,
    files: HashMap<Target, LogFile>,
}

impl LogWriter {
    pub fn new(log_dir: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            log_dir: log_dir.into(),
            template: template.into(),
            files: HashMap::new(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Path the writer would use for `target` in `bucket`.
    pub fn path_for(&self, target: &Target, bucket: HourBucket) -> PathBuf {
        log_file_path(&self.log_dir, &self.template, target, bucket)
    }

    /// Path of the file currently open for `target`, if any.
    pub fn current_path(&self, target: &Target) -> Option<&Path> {
        self.files.get(target).map(|f| f.path.as_path())
    }

    /// Hour bucket of the file currently open for `target`, if any.
    pub fn current_bucket(&self, target: &Target) -> Option<HourBucket> {
        self.files.get(target).map(|f| f.bucket)
    }

    pub fn open_file_count(&self) -> usize {
        self.files.len()
    }

    /// Appends the sample's line to its target's file.
    pub fn write_sample(&mut self, sample: &Sample) -> Result<()> {
        self.write(&sample.target, &sample.timestamp, sample.level(), &sample.message())
    }

    /// Appends one line for `target`, rotating first if `timestamp` falls in
    /// a different hour than the open file.
    ///
    /// On failure the target's handle is dropped so the next write reopens it.
    pub fn write(
        &mut self,
        target: &Target,
        timestamp: &DateTime<Local>,
        level: LogLevel,
        message: &str,
    ) -> Result<()> {
        let bucket = HourBucket::from_timestamp(timestamp);
        let line = format_line(timestamp, level, message);

        let log_file = self.file_for(target, bucket)?;
        if let Err(source) = log_file.append(&line) {
            let path = log_file.path.clone();
            self.files.remove(target);
            return Err(ProcmonError::FilesystemWrite { path, source });
        }
        Ok(())
    }

    fn file_for(&mut self, target: &Target, bucket: HourBucket) -> Result<&mut LogFile> {
        let stale = self
            .files
            .get(target)
            .is_some_and(|current| current.bucket != bucket);
        if stale {
            self.close(target);
        }

        // An open handle whose file was deleted would keep appending to the
        // unlinked inode.
        let vanished = self
            .files
            .get(target)
            .is_some_and(|current| !current.path.exists());
        if vanished {
            if let Some(log_file) = self.files.remove(target) {
                warn!("Log file {} disappeared, reopening", log_file.path.display());
            }
        }

        let path = self.path_for(target, bucket);
        match self.files.entry(target.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let log_file = LogFile::open(path.clone(), bucket)
                    .map_err(|source| ProcmonError::FilesystemWrite { path, source })?;
                info!("Opened log file {}", log_file.path.display());
                Ok(entry.insert(log_file))
            }
        }
    }

    /// Flushes and closes the file open for `target`, if any.
    pub fn close(&mut self, target: &Target) {
        if let Some(log_file) = self.files.remove(target) {
            let path = log_file.path.clone();
            if let Err(e) = log_file.close() {
                error!("Failed to flush log file {}: {}", path.display(), e);
            }
        }
    }

    /// Flushes and closes every open file.
    pub fn close_all(&mut self) {
        let targets: Vec<Target> = self.files.keys().cloned().collect();
        for target in targets {
            self.close(&target);
        }
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        self.close_all();
    }
}
