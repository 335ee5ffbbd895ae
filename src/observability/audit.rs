//! Append-only outcome log.
//!
//! One line per finished run: `<timestamp> - <outcome>`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::AuditConfig;

/// Writer for the outcome log file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `None` when auditing is disabled.
    pub fn from_config(config: &AuditConfig) -> Option<Self> {
        config.enabled.then(|| Self::new(&config.path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `outcome` stamped with the current time.
    pub fn append(&self, outcome: &str) -> io::Result<()> {
        self.append_at(Utc::now(), outcome)
    }

    pub fn append_at(&self, at: DateTime<Utc>, outcome: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_line(at, outcome))
    }
}

/// Render one log line without the trailing newline.
pub fn format_line(at: DateTime<Utc>, outcome: &str) -> String {
    format!("{} - {}", at.to_rfc3339_opts(SecondsFormat::Secs, true), outcome)
}
