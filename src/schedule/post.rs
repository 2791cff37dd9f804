//! Scheduled post records and their identity.

use crate::error::ValidationError;
use crate::types::{Fingerprint, Platform};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a scheduled post.
///
/// `Pending -> Scheduled -> {Posted, Failed}`; `Skipped` replaces the poster call in
/// dry-run mode. Terminal states are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostState {
    Pending,
    Scheduled,
    Posted,
    Failed,
    Skipped,
}

impl PostState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostState::Pending => "pending",
            PostState::Scheduled => "scheduled",
            PostState::Posted => "posted",
            PostState::Failed => "failed",
            PostState::Skipped => "skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PostState::Posted | PostState::Failed | PostState::Skipped)
    }

    /// Pending or Scheduled.
    pub fn is_live(&self) -> bool {
        matches!(self, PostState::Pending | PostState::Scheduled)
    }
}

impl fmt::Display for PostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PostState::Pending),
            "scheduled" => Ok(PostState::Scheduled),
            "posted" => Ok(PostState::Posted),
            "failed" => Ok(PostState::Failed),
            "skipped" => Ok(PostState::Skipped),
            other => Err(format!("Unknown post state: {}", other)),
        }
    }
}

/// What gets posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub text: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub media: Option<String>,
}

impl PostContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hashtags: Vec::new(),
            media: None,
        }
    }

    pub fn with_hashtags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    /// blake3 hex of the text.
    pub fn content_ref(&self) -> String {
        hex::encode(blake3::hash(self.text.as_bytes()).as_bytes())
    }

    /// Non-empty text within the platform's character limit.
    pub fn validate_for(&self, platform: Platform) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText {
                platform: platform.to_string(),
            });
        }
        let len = self.text.chars().count();
        let limit = platform.max_text_len();
        if len > limit {
            return Err(ValidationError::TooLong {
                platform: platform.to_string(),
                len,
                limit,
            });
        }
        Ok(())
    }
}

/// Deterministic post identity from text, platform and target date.
///
/// `attempt` separates a fresh record from a terminal one on the same date; attempt 0
/// hashes exactly the three identity fields.
pub fn compute_fingerprint(
    content: &PostContent,
    platform: Platform,
    target_date: NaiveDate,
    attempt: u32,
) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"platform:");
    hasher.update(platform.as_str().as_bytes());
    hasher.update(b"\0date:");
    hasher.update(target_date.to_string().as_bytes());
    hasher.update(b"\0text:");
    hasher.update(content.text.as_bytes());
    if attempt > 0 {
        hasher.update(b"\0attempt:");
        hasher.update(&attempt.to_le_bytes());
    }
    Fingerprint::from_hash(hasher.finalize())
}

/// One snapshot of a post as written to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub fingerprint: Fingerprint,
    pub platform: Platform,
    pub content_ref: String,
    pub content: PostContent,
    pub state: PostState,
    pub target_date: NaiveDate,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl ScheduledPost {
    pub fn pending(
        fingerprint: Fingerprint,
        platform: Platform,
        content: &PostContent,
        target_date: NaiveDate,
        scheduled_at: DateTime<Utc>,
        dry_run: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            fingerprint,
            platform,
            content_ref: content.content_ref(),
            content: content.clone(),
            state: PostState::Pending,
            target_date,
            scheduled_at,
            dry_run,
            remote_id: None,
            error: None,
            recorded_at: now,
        }
    }

    /// Next snapshot in `state`.
    pub fn transitioned(&self, state: PostState, now: DateTime<Utc>) -> Self {
        Self {
            state,
            recorded_at: now,
            ..self.clone()
        }
    }

    pub fn with_outcome(mut self, remote_id: Option<String>, error: Option<String>) -> Self {
        self.remote_id = remote_id;
        self.error = error;
        self
    }
}
