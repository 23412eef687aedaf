//! Append-only JSONL session log
//!
//! One file per process run, one record per line, written in emission order.
//! Write faults are reported through `tracing` and never reach the caller.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::conversation::Role;
use crate::providers::Usage;

/// One line of the session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

pub struct SessionLogger {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl SessionLogger {
    /// Create `session_<started_at>.jsonl` under `dir`, creating `dir` if needed.
    pub fn open(dir: &Path, started_at: DateTime<Local>) -> io::Result<Self> {
        fs::create_dir_all(dir)?;

        let path = dir.join(format!(
            "session_{}.jsonl",
            started_at.format("%Y%m%d_%H%M%S")
        ));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::info!(path = %path.display(), "session log opened");
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, timestamped now.
    pub fn log(&mut self, role: Role, content: &str, usage: Option<Usage>) {
        let record = LogRecord {
            timestamp: Local::now().to_rfc3339(),
            role,
            content: content.to_string(),
            usage,
        };

        if let Err(e) = self.write_record(&record) {
            tracing::warn!(
                error = %e,
                path = %self.path.display(),
                role = role.as_str(),
                "failed to write session log record"
            );
        }
    }

    fn write_record(&mut self, record: &LogRecord) -> io::Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }

    /// Flush and release the log file.
    pub fn close(mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(error = %e, "failed to flush session log on close");
        }
        tracing::info!(path = %self.path.display(), "session log closed");
    }
}

#[cfg(test)]
pub fn read_log(path: &Path) -> io::Result<Vec<LogRecord>> {
    fs::read_to_string(path)?
        .lines()
        .map(|line| serde_json::from_str(line).map_err(io::Error::from))
        .collect()
}
