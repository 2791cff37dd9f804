//! Trend candidates fed into planning.

use crate::error::{ApiError, StateError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One trend offered to the planner. Field names follow the upstream trend feed,
/// so `title` and `category` are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendCandidate {
    #[serde(alias = "title")]
    pub trend: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "category")]
    pub domain: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub relevance: Option<f64>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl TrendCandidate {
    pub fn new(trend: impl Into<String>) -> Self {
        Self {
            trend: trend.into(),
            ..Default::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_hashtags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// `score`, else `relevance`, else 0. NaN counts as 0.
    pub fn effective_score(&self) -> f64 {
        let s = self.score.or(self.relevance).unwrap_or(0.0);
        if s.is_nan() {
            0.0
        } else {
            s
        }
    }

    /// Trimmed, non-empty domain.
    pub fn domain_name(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Distinct candidate domains in first-seen order.
pub fn candidate_domains(candidates: &[TrendCandidate]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for domain in candidates.iter().filter_map(TrendCandidate::domain_name) {
        if !out.iter().any(|d| d.eq_ignore_ascii_case(domain)) {
            out.push(domain.to_string());
        }
    }
    out
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateFile {
    Many(Vec<TrendCandidate>),
    One(TrendCandidate),
}

/// Load candidates from a JSON file holding either an array or a single object.
pub fn load_candidates(path: &Path) -> Result<Vec<TrendCandidate>, ApiError> {
    let contents = std::fs::read_to_string(path)?;
    let parsed: CandidateFile =
        serde_json::from_str(&contents).map_err(|e| StateError::Unparseable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(match parsed {
        CandidateFile::Many(v) => v,
        CandidateFile::One(c) => vec![c],
    })
}
