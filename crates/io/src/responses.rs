// Append-only submission log (CSV)
//
// First write creates the file with a header row; later writes append data
// rows only. The file is opened and closed per append. There is no locking:
// one user session writes at a time.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use internmatch_engine::{Category, Selection};

/// Timestamp column format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One logged form submission. Field renames are the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Contact")]
    pub contact: String,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Job Role")]
    pub job_role: String,
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "Industry")]
    pub industry: String,
}

impl SubmissionRecord {
    pub fn new(name: &str, contact: &str, selection: &Selection, at: NaiveDateTime) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            name: name.to_string(),
            contact: contact.to_string(),
            domain: selection.joined(Category::Domain),
            job_role: selection.joined(Category::JobRole),
            level: selection.joined(Category::Level),
            industry: selection.joined(Category::Industry),
        }
    }

    /// Record stamped with the current local time.
    pub fn now(name: &str, contact: &str, selection: &Selection) -> Self {
        Self::new(name, contact, selection, Local::now().naive_local())
    }
}

#[derive(Debug)]
pub enum LogError {
    Io { path: String, message: String },
    Csv(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "response log {path}: {message}"),
            Self::Csv(msg) => write!(f, "response log CSV error: {msg}"),
        }
    }
}

impl std::error::Error for LogError {}

/// Handle to the append-only response log.
#[derive(Debug, Clone)]
pub struct ResponseLog {
    path: PathBuf,
}

impl ResponseLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the log is absent or empty.
    pub fn append(&self, record: &SubmissionRecord) -> Result<(), LogError> {
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer
            .serialize(record)
            .map_err(|e| LogError::Csv(e.to_string()))?;
        writer.flush().map_err(|e| self.io_err(e))?;

        log::info!(
            "recorded submission for '{}' in {}{}",
            record.name,
            self.path.display(),
            if needs_header { " (new log)" } else { "" }
        );
        Ok(())
    }

    /// All records in insertion order. A missing log is empty, not an error.
    pub fn read_all(&self) -> Result<Vec<SubmissionRecord>, LogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| LogError::Csv(e.to_string()))?;

        reader
            .deserialize()
            .map(|row| row.map_err(|e| LogError::Csv(e.to_string())))
            .collect()
    }

    fn io_err(&self, e: std::io::Error) -> LogError {
        LogError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}
