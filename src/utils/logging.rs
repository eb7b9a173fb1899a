//! Append-only audit logs.
//!
//! Two day-partitioned streams live under the log root:
//! - `chat_YYYYMMDD.log`: one JSON transcript record per line.
//! - `ras/ras_YYYYMMDD.json`: a JSON array of request/response records,
//!   rewritten in full on every append.
//!
//! The calendar day comes from the record's own timestamp in local time, so a
//! record always lands in the same file no matter when it is written.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::api::ChatMessage;
use crate::core::catalog::Selection;
use crate::core::error::LogWriteError;
use crate::core::message::{Turn, TurnRole};

pub const RAS_DIR_NAME: &str = "ras";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Utc>,
    pub role: TurnRole,
    pub model_name: String,
    pub content: String,
}

impl TranscriptEntry {
    pub fn from_turn(turn: &Turn, model_name: impl Into<String>) -> Self {
        Self {
            timestamp: turn.timestamp,
            role: turn.role,
            model_name: model_name.into(),
            content: turn.content.clone(),
        }
    }
}

/// Snapshot of a request taken just before the backend is called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasRequest {
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub prompts: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RasResponse {
    Success {
        timestamp: DateTime<Utc>,
        #[serde(rename = "durationMs")]
        duration_ms: u64,
        output: String,
    },
    Failure {
        timestamp: DateTime<Utc>,
        error: String,
        trace: String,
    },
}

impl RasResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, RasResponse::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasEntry {
    pub timestamp: DateTime<Utc>,
    pub model: Selection,
    pub request: RasRequest,
    pub response: RasResponse,
}

fn day_stamp(timestamp: &DateTime<Utc>) -> String {
    local_day(timestamp).format("%Y%m%d").to_string()
}

fn local_day(timestamp: &DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

/// Owner of the transcript and request/response log files.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    root: PathBuf,
}

impl AuditLogger {
    /// Create the log directories if needed. Failure here is a startup fault.
    pub fn provision(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(RAS_DIR_NAME))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn transcript_path(&self, timestamp: &DateTime<Utc>) -> PathBuf {
        self.root.join(format!("chat_{}.log", day_stamp(timestamp)))
    }

    pub fn ras_path(&self, timestamp: &DateTime<Utc>) -> PathBuf {
        self.root
            .join(RAS_DIR_NAME)
            .join(format!("ras_{}.json", day_stamp(timestamp)))
    }

    pub fn log_turn(&self, turn: &Turn, model_name: &str) -> Result<(), LogWriteError> {
        let entry = TranscriptEntry::from_turn(turn, model_name);
        let path = self.transcript_path(&entry.timestamp);
        self.append_line(&path, &entry)
            .map_err(|err| LogWriteError::new(&path, err))
    }

    fn append_line(&self, path: &Path, entry: &TranscriptEntry) -> io::Result<()> {
        let line = serde_json::to_string(entry)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{line}")?;
        writer.flush()
    }

    /// Append a request/response record to its day file.
    ///
    /// The existing array is read back first; an absent or unparsable file
    /// starts a fresh array.
    pub fn log_ras(&self, entry: &RasEntry) -> Result<(), LogWriteError> {
        let path = self.ras_path(&entry.timestamp);
        let mut entries = read_ras_array(&path);
        let value = serde_json::to_value(entry).map_err(|err| LogWriteError::new(&path, err))?;
        entries.push(value);
        write_json_atomically(&path, &entries).map_err(|err| LogWriteError::new(&path, err))
    }
}

fn read_ras_array(path: &Path) -> Vec<serde_json::Value> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Could not read RAS log; starting a new array");
            return Vec::new();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Could not parse RAS log; starting a new array");
            Vec::new()
        }
    }
}

fn write_json_atomically(path: &Path, entries: &[serde_json::Value]) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp_file = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut temp_file, entries)?;
    temp_file.flush()?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Read back a transcript day file. Used by tests and tooling.
pub fn read_transcript(path: &Path) -> io::Result<Vec<TranscriptEntry>> {
    let contents = fs::read_to_string(path)?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(io::Error::from))
        .collect()
}

/// Read back a request/response day file. Used by tests and tooling.
pub fn read_ras(path: &Path) -> io::Result<Vec<RasEntry>> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(io::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::ProviderId;
    use tempfile::TempDir;

    fn logger() -> (TempDir, AuditLogger) {
        let dir = TempDir::new().unwrap();
        let logger = AuditLogger::provision(dir.path().join("logs")).unwrap();
        (dir, logger)
    }

    fn ras_entry(output: Option<&str>) -> RasEntry {
        let now = Utc::now();
        let response = match output {
            Some(text) => RasResponse::Success {
                timestamp: now,
                duration_ms: 12,
                output: text.to_string(),
            },
            None => RasResponse::Failure {
                timestamp: now,
                error: "boom".to_string(),
                trace: "HTTP 500".to_string(),
            },
        };
        RasEntry {
            timestamp: now,
            model: Selection::new(ProviderId::OpenAi, "gpt-4"),
            request: RasRequest {
                timestamp: now,
                model: "gpt-4".to_string(),
                prompts: vec![ChatMessage::new("user", "hello")],
            },
            response,
        }
    }

    #[test]
    fn provision_creates_root_and_ras_dirs() {
        let (_dir, logger) = logger();
        assert!(logger.root().is_dir());
        assert!(logger.root().join(RAS_DIR_NAME).is_dir());
    }

    #[test]
    fn paths_follow_the_day_pattern() {
        let (_dir, logger) = logger();
        let now = Utc::now();
        let stamp = now.with_timezone(&Local).format("%Y%m%d").to_string();
        assert_eq!(
            logger.transcript_path(&now).file_name().unwrap().to_string_lossy(),
            format!("chat_{stamp}.log")
        );
        assert!(logger
            .ras_path(&now)
            .ends_with(format!("ras/ras_{stamp}.json")));
    }

    #[test]
    fn transcript_lines_are_self_contained_records() {
        let (_dir, logger) = logger();
        let user = Turn::user("hello");
        let error = Turn::error("quota exceeded");
        logger.log_turn(&user, "openai/gpt-4").unwrap();
        logger.log_turn(&error, "openai/gpt-4").unwrap();

        let raw = fs::read_to_string(logger.transcript_path(&user.timestamp)).unwrap();
        let first: serde_json::Value = serde_json::from_str(raw.lines().next().unwrap()).unwrap();
        assert_eq!(first["role"], "user");
        assert_eq!(first["modelName"], "openai/gpt-4");
        assert_eq!(first["content"], "hello");

        let entries = read_transcript(&logger.transcript_path(&user.timestamp)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].role, TurnRole::Error);
    }

    #[test]
    fn ras_log_accumulates_an_array() {
        let (_dir, logger) = logger();
        let success = ras_entry(Some("hi"));
        let failure = ras_entry(None);
        logger.log_ras(&success).unwrap();
        logger.log_ras(&failure).unwrap();

        let entries = read_ras(&logger.ras_path(&success.timestamp)).unwrap();
        assert_eq!(entries, vec![success, failure]);
        assert!(entries[0].response.is_success());
        assert!(!entries[1].response.is_success());
    }

    #[test]
    fn ras_json_uses_documented_field_names() {
        let (_dir, logger) = logger();
        let entry = ras_entry(Some("hi"));
        logger.log_ras(&entry).unwrap();

        let raw = fs::read_to_string(logger.ras_path(&entry.timestamp)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["model"]["provider"], "openai");
        assert_eq!(value[0]["model"]["model"], "gpt-4");
        assert_eq!(value[0]["request"]["prompts"][0]["content"], "hello");
        assert_eq!(value[0]["response"]["durationMs"], 12);
        assert_eq!(value[0]["response"]["output"], "hi");
    }

    #[test]
    fn corrupt_ras_file_is_replaced_by_a_fresh_array() {
        let (_dir, logger) = logger();
        let entry = ras_entry(None);
        let path = logger.ras_path(&entry.timestamp);
        fs::write(&path, "{ not json").unwrap();

        logger.log_ras(&entry).unwrap();
        let entries = read_ras(&path).unwrap();
        assert_eq!(entries.len(), 1);
        match &entries[0].response {
            RasResponse::Failure { error, trace, .. } => {
                assert_eq!(error, "boom");
                assert_eq!(trace, "HTTP 500");
            }
            other => panic!("expected failure response, got {:?}", other),
        }
    }

    #[test]
    fn unwritable_root_reports_log_write_failure() {
        let dir = TempDir::new().unwrap();
        let logger = AuditLogger::provision(dir.path().join("logs")).unwrap();
        fs::remove_dir_all(logger.root()).unwrap();

        let turn = Turn::user("hello");
        let err = logger.log_turn(&turn, "openai/gpt-4").unwrap_err();
        assert_eq!(err.path, logger.transcript_path(&turn.timestamp));
    }
}
