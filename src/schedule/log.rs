//! Append-only post log (JSON Lines) and its replayed index.

use crate::error::{StateError, StorageError};
use crate::schedule::post::{PostState, ScheduledPost};
use crate::store::append_line;
use crate::types::{Fingerprint, Platform};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One line of the post log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    /// Full state of a post after a mutation.
    Snapshot { post: ScheduledPost },
    /// Cancellation tombstone.
    Removed {
        fingerprint: Fingerprint,
        removed_at: DateTime<Utc>,
    },
}

/// Latest state per fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostIndex {
    posts: BTreeMap<Fingerprint, ScheduledPost>,
}

impl PostIndex {
    pub fn replay<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = LogEntry>,
    {
        let mut index = Self::default();
        for entry in entries {
            index.apply(entry);
        }
        index
    }

    pub fn apply(&mut self, entry: LogEntry) {
        match entry {
            LogEntry::Snapshot { post } => {
                self.posts.insert(post.fingerprint.clone(), post);
            }
            LogEntry::Removed { fingerprint, .. } => {
                self.posts.remove(&fingerprint);
            }
        }
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&ScheduledPost> {
        self.posts.get(fingerprint)
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.posts.contains_key(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledPost> {
        self.posts.values()
    }

    /// Posts for `platform` whose state holds `date`'s slot.
    pub fn slot_taken<F>(&self, platform: Platform, date: NaiveDate, holds_slot: F) -> bool
    where
        F: Fn(&ScheduledPost) -> bool,
    {
        self.posts
            .values()
            .any(|p| p.platform == platform && p.target_date == date && holds_slot(p))
    }

    pub fn count_in(&self, state: PostState) -> usize {
        self.posts.values().filter(|p| p.state == state).count()
    }
}

/// Handle on the JSONL file.
#[derive(Debug, Clone)]
pub struct PostLog {
    path: PathBuf,
}

impl PostLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single synced line.
    pub fn append(&self, entry: &LogEntry) -> Result<(), StorageError> {
        let line = serde_json::to_string(entry).map_err(|e| StorageError::Serialization {
            what: "post log entry",
            message: e.to_string(),
        })?;
        append_line(&self.path, &line)
    }

    /// Read every parseable entry. A missing file is an empty log; malformed or torn
    /// lines are skipped with a warning.
    pub fn read_entries(&self) -> Result<Vec<LogEntry>, StorageError> {
        let bytes = match self.read_bytes()? {
            Some(bytes) => bytes,
            None => return Ok(Vec::new()),
        };
        let contents = String::from_utf8_lossy(&bytes);

        let mut entries = Vec::new();
        for (i, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    let err = StateError::MalformedLogLine {
                        path: self.path.clone(),
                        line: i + 1,
                        message: e.to_string(),
                    };
                    warn!(error = %err, "Skipping post log line");
                }
            }
        }
        debug!(path = ?self.path, entries = entries.len(), "Post log read");
        Ok(entries)
    }

    pub fn replay(&self) -> Result<PostIndex, StorageError> {
        Ok(PostIndex::replay(self.read_entries()?))
    }

    /// Terminate a torn final line so the next append starts on a fresh line.
    /// Returns whether a repair was needed.
    pub fn seal_torn_tail(&self) -> Result<bool, StorageError> {
        let torn = match self.read_bytes()? {
            Some(bytes) => bytes.last().is_some_and(|b| *b != b'\n'),
            None => false,
        };
        if !torn {
            return Ok(false);
        }
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(b"\n")?;
        file.sync_data()?;
        warn!(path = ?self.path, "Sealed torn final line in post log");
        Ok(true)
    }

    fn read_bytes(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// fsync the file if it exists.
    pub fn sync(&self) -> Result<(), StorageError> {
        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => {
                file.sync_all()?;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
