//! Lens rotation engine: cycle advance plus least-recently-used domain choice.

use crate::clock::Clock;
use crate::error::{ApiError, StorageError};
use crate::lens::cycle::{Lens, LENS_CYCLE};
use crate::lens::state::{HistoryEntry, LensState};
use crate::types::Platform;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a rotation: the lens at `index` and the preferred domain, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LensChoice {
    pub lens: Lens,
    pub index: usize,
    pub domain: Option<String>,
}

/// Owns the persisted rotation state for one account.
pub struct LensRotationEngine {
    path: PathBuf,
    state: LensState,
    clock: Arc<dyn Clock>,
}

impl LensRotationEngine {
    /// Load state from `path`, falling back to defaults when missing or corrupt.
    pub fn open(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = LensState::load_or_recover(&path)?;
        debug!(
            path = %path.display(),
            cursor = ?state.cursor(),
            history = state.history().len(),
            "Lens state loaded"
        );
        Ok(Self { path, state, clock })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &LensState {
        &self.state
    }

    pub fn cycle(&self) -> &'static [Lens; 8] {
        &LENS_CYCLE
    }

    /// Lens most recently handed out, if any.
    pub fn current(&self) -> Option<Lens> {
        self.state.cursor().map(Lens::at)
    }

    /// Up to `limit` newest history entries, oldest first.
    pub fn recent_history(&self, limit: usize) -> &[HistoryEntry] {
        let history = self.state.history();
        &history[history.len().saturating_sub(limit)..]
    }

    /// The choice the next rotation would make, without side effects.
    pub fn preview(&self, candidate_domains: &[String]) -> LensChoice {
        let index = self.state.next_index();
        LensChoice {
            lens: Lens::at(index),
            index,
            domain: self.least_recent_domain(candidate_domains),
        }
    }

    /// Apply a previewed choice: append history and persist before advancing in memory.
    pub fn commit(
        &mut self,
        choice: &LensChoice,
        trend: Option<&str>,
        platform: Option<Platform>,
    ) -> Result<(), ApiError> {
        let expected = self.state.next_index();
        if choice.index != expected {
            return Err(ApiError::StaleLensChoice {
                expected,
                got: choice.index,
            });
        }

        let entry = HistoryEntry {
            date: self.history_date(),
            lens: choice.lens,
            post_type: choice.lens.post_type().to_string(),
            domain: choice.domain.clone(),
            trend: trend.map(str::to_string),
            platform: platform.map(|p| p.as_str().to_string()),
        };
        let next = self.state.advanced(entry);
        next.save(&self.path)?;
        self.state = next;

        info!(
            lens = choice.lens.name(),
            index = choice.index,
            domain = ?choice.domain,
            "Lens rotated"
        );
        Ok(())
    }

    /// Rotate to the next lens and pick the least recently used domain.
    pub fn next_lens(&mut self, candidate_domains: &[String]) -> Result<LensChoice, ApiError> {
        let choice = self.preview(candidate_domains);
        self.commit(&choice, None, None)?;
        Ok(choice)
    }

    /// Persist the in-memory state. Called at shutdown.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.state.save(&self.path)
    }

    /// Never-seen domains win; otherwise the one seen longest ago. Ties keep input order.
    fn least_recent_domain(&self, candidates: &[String]) -> Option<String> {
        let history = self.state.history();
        let last_seen = |domain: &str| -> Option<usize> {
            history.iter().rposition(|h| {
                h.domain
                    .as_deref()
                    .map(|d| d.trim().eq_ignore_ascii_case(domain.trim()))
                    .unwrap_or(false)
            })
        };

        let mut best: Option<(&String, Option<usize>)> = None;
        for candidate in candidates.iter().filter(|c| !c.trim().is_empty()) {
            let seen = last_seen(candidate);
            let better = match best {
                None => true,
                Some((_, best_seen)) => match (seen, best_seen) {
                    (None, Some(_)) => true,
                    (Some(a), Some(b)) => a < b,
                    _ => false,
                },
            };
            if better {
                best = Some((candidate, seen));
            }
        }
        best.map(|(d, _)| d.trim().to_string())
    }

    // History dates must stay ordered even if the clock steps backwards.
    fn history_date(&self) -> chrono::NaiveDate {
        let today = self.clock.now().date_naive();
        match self.state.history().last() {
            Some(last) if last.date > today => last.date,
            _ => today,
        }
    }
}
