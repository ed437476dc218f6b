use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::clock::Clock;
use crate::scheduler::{Pacer, ReadingMode};

/// One row of the reading log, written when a session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: DateTime<Local>,
    pub mode: ReadingMode,
    pub wpm: u32,
    pub words: usize,
    pub words_read: usize,
    pub elapsed_secs: u64,
    pub completed: bool,
}

impl HistoryEntry {
    pub fn from_pacer<C: Clock>(pacer: &Pacer<C>) -> Self {
        let words_read = match pacer.mode() {
            ReadingMode::Chunk => pacer
                .chunks()
                .iter()
                .take(pacer.position() + 1)
                .map(Vec::len)
                .sum(),
            ReadingMode::Word | ReadingMode::Bionic => pacer.position() + 1,
        };

        Self {
            date: Local::now(),
            mode: pacer.mode(),
            wpm: pacer.speed_wpm(),
            words: pacer.words().len(),
            words_read: words_read.min(pacer.words().len()),
            elapsed_secs: pacer.elapsed_secs(),
            completed: pacer.state().is_complete,
        }
    }
}

/// Append-only CSV log of finished sessions
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new() -> Option<Self> {
        AppDirs::history_path().map(Self::with_path)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, entry: &HistoryEntry) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(entry).map_err(io::Error::other)?;
        writer.flush()
    }

    pub fn entries(&self) -> io::Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(io::Error::other)?;
        reader
            .deserialize::<HistoryEntry>()
            .map(|row| row.map_err(io::Error::other))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session::SessionConfig;
    use tempfile::tempdir;

    fn finished_pacer() -> Pacer<ManualClock> {
        let mut pacer = Pacer::with_clock(
            SessionConfig::new("one two three four five")
                .with_mode(ReadingMode::Chunk)
                .with_chunk_size(2)
                .with_smart_chunking(false),
            ManualClock::new(),
        );
        pacer.start();
        pacer.tick();
        pacer
    }

    #[test]
    fn test_entry_counts_words_in_chunks() {
        let entry = HistoryEntry::from_pacer(&finished_pacer());

        assert_eq!(entry.mode, ReadingMode::Chunk);
        assert_eq!(entry.words, 5);
        assert_eq!(entry.words_read, 4);
        assert!(!entry.completed);
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("history.csv");
        let log = HistoryLog::with_path(&path);
        let entry = HistoryEntry::from_pacer(&finished_pacer());

        log.append(&entry).unwrap();
        log.append(&entry).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.starts_with("date,mode,wpm,words,words_read,elapsed_secs,completed"));

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].words_read, 4);
        assert_eq!(entries[1].mode, ReadingMode::Chunk);
    }

    #[test]
    fn test_entries_of_missing_log() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::with_path(dir.path().join("none.csv"));
        assert!(log.entries().unwrap().is_empty());
    }
}
