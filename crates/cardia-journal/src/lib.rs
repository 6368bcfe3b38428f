//! # cardia-journal
//!
//! Append-only JSON-lines journal for monitor events. One JSON object per
//! line, flushed per entry so alerts survive a crash of the surrounding
//! application.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use cardia_core::MonitorEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub ts_us: i64,
    pub event: MonitorEvent,
}

/// Append-only event journal backed by a JSON-lines file.
pub struct EventJournal {
    path: PathBuf,
    file: File,
}

impl EventJournal {
    /// Open (creating if needed) a journal for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JournalError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event, flushing so the line is durable immediately.
    pub fn append(&mut self, ts_us: i64, event: &MonitorEvent) -> Result<(), JournalError> {
        let line = serde_json::to_string(&serde_json::json!({
            "ts_us": ts_us,
            "event": event,
        }))?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        log::debug!("journaled {:?}", event);
        Ok(())
    }

    /// Read a journal back, oldest entry first. Blank lines are skipped.
    pub fn read_all<P: AsRef<Path>>(path: P) -> Result<Vec<JournalEntry>, JournalError> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardia_core::EventPriority;

    #[test]
    fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut journal = EventJournal::open(&path).unwrap();
        journal
            .append(1_000_000, &MonitorEvent::SourceConnected {})
            .unwrap();
        journal
            .append(
                2_000_000,
                &MonitorEvent::HighHeartRate {
                    bpm: 121,
                    reason: "High heart rate: 121 BPM".into(),
                },
            )
            .unwrap();
        drop(journal);

        let entries = EventJournal::read_all(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].ts_us, 1_000_000);
        assert_eq!(entries[0].event, MonitorEvent::SourceConnected {});
        assert_eq!(entries[1].event.priority(), EventPriority::Critical);
        match &entries[1].event {
            MonitorEvent::HighHeartRate { bpm, reason } => {
                assert_eq!(*bpm, 121);
                assert!(reason.contains("121"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut journal = EventJournal::open(&path).unwrap();
        journal
            .append(1, &MonitorEvent::PeakAccepted { ts_us: 1 })
            .unwrap();
        drop(journal);

        let mut journal = EventJournal::open(&path).unwrap();
        journal
            .append(2, &MonitorEvent::BpmUpdated { bpm: 72 })
            .unwrap();
        drop(journal);

        let entries = EventJournal::read_all(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].event, MonitorEvent::BpmUpdated { bpm: 72 });
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.jsonl");
        assert!(matches!(
            EventJournal::read_all(&missing),
            Err(JournalError::Io(_))
        ));
    }
}
