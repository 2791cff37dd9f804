//! Persisted lens rotation state.

use crate::error::{ApiError, StateError, StorageError};
use crate::lens::cycle::{Lens, LENS_CYCLE};
use crate::store;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Maximum number of history entries retained.
pub const HISTORY_LIMIT: usize = 20;

/// One completed rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub lens: Lens,
    pub post_type: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

/// Rotation position plus recent history, oldest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LensState {
    cursor: Option<usize>,
    history: Vec<HistoryEntry>,
}

/// On-disk shape. Read permissively: both keys optional, `-1` means "no position yet".
#[derive(Debug, Serialize, Deserialize)]
struct LensStateFile {
    #[serde(default, alias = "lens_i")]
    cursor: Option<i64>,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

impl LensState {
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Index the next rotation lands on.
    pub fn next_index(&self) -> usize {
        self.cursor
            .map(|c| (c + 1) % LENS_CYCLE.len())
            .unwrap_or(0)
    }

    /// Copy of this state with the rotation applied and `entry` appended.
    pub(crate) fn advanced(&self, entry: HistoryEntry) -> LensState {
        let mut next = self.clone();
        next.cursor = Some(self.next_index());
        next.history.push(entry);
        if next.history.len() > HISTORY_LIMIT {
            let excess = next.history.len() - HISTORY_LIMIT;
            next.history.drain(..excess);
        }
        next
    }

    /// Check the cursor range and history date order.
    pub fn validate(&self) -> Result<(), StateError> {
        if let Some(c) = self.cursor {
            if c >= LENS_CYCLE.len() {
                return Err(StateError::CursorOutOfRange {
                    cursor: c as i64,
                    len: LENS_CYCLE.len(),
                });
            }
        }
        for (index, pair) in self.history.windows(2).enumerate() {
            if pair[1].date < pair[0].date {
                return Err(StateError::HistoryOrder {
                    index: index + 1,
                    date: pair[1].date,
                    previous: pair[0].date,
                });
            }
        }
        Ok(())
    }

    /// Read state from disk. A missing file yields the default state.
    pub fn read(path: &Path) -> Result<LensState, ApiError> {
        let Some(contents) = store::read_optional(path)? else {
            return Ok(LensState::default());
        };

        let file: LensStateFile =
            serde_json::from_str(&contents).map_err(|e| StateError::Unparseable {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let cursor = match file.cursor {
            None | Some(-1) => None,
            Some(c) if (0..LENS_CYCLE.len() as i64).contains(&c) => Some(c as usize),
            Some(c) => {
                return Err(StateError::CursorOutOfRange {
                    cursor: c,
                    len: LENS_CYCLE.len(),
                }
                .into())
            }
        };

        let state = LensState {
            cursor,
            history: file.history,
        };
        state.validate()?;
        Ok(state)
    }

    /// Read state, resetting to defaults when the file is corrupt.
    pub fn load_or_recover(path: &Path) -> Result<LensState, StorageError> {
        match LensState::read(path) {
            Ok(state) => Ok(state),
            Err(ApiError::StateCorruption(e)) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Lens state corrupt; re-initializing rotation to defaults"
                );
                Ok(LensState::default())
            }
            Err(ApiError::StorageError(e)) => Err(e),
            Err(other) => Err(StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                other.to_string(),
            ))),
        }
    }

    /// Persist atomically.
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let file = LensStateFile {
            cursor: self.cursor.map(|c| c as i64),
            history: self.history.clone(),
        };
        let bytes =
            serde_json::to_vec_pretty(&file).map_err(|e| StorageError::Serialization {
                what: "lens state",
                message: e.to_string(),
            })?;
        store::write_atomic(path, &bytes)
    }
}
