//! Error types for the trendpost planning and scheduling system.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to serialize {what}: {message}")]
    Serialization { what: &'static str, message: String },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Persisted state that could not be trusted.
///
/// Raised while loading; callers recover by resetting to defaults.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("State file {path:?} is not valid JSON: {message}")]
    Unparseable { path: PathBuf, message: String },

    #[error("Lens cursor {cursor} out of range [0, {len})")]
    CursorOutOfRange { cursor: i64, len: usize },

    #[error("History out of date order at entry {index}: {date} precedes {previous}")]
    HistoryOrder {
        index: usize,
        date: chrono::NaiveDate,
        previous: chrono::NaiveDate,
    },

    #[error("Log line {line} in {path:?} is malformed: {message}")]
    MalformedLogLine {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Content plan validation failures. Never auto-repaired.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid content plan: required field '{field}' is missing for domain '{domain}'")]
    MissingField { field: &'static str, domain: String },

    #[error("Invalid content plan: expected exactly 4 hashtags, got {count}")]
    HashtagCount { count: usize },

    #[error("Invalid content plan: no trend candidates supplied")]
    NoCandidates,
}

/// Failure reported by (or while reaching) an external poster.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostingError {
    #[error("Poster rejected post for {platform}: {message}")]
    Rejected { platform: String, message: String },

    #[error("Poster for {platform} timed out after {secs}s")]
    Timeout { platform: String, secs: u64 },

    #[error("No poster registered for {0}")]
    NoPoster(String),

    #[error("Poster transport error: {0}")]
    Transport(String),
}

/// Post content or platform that fails validation before any external call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Post text for {platform} is empty")]
    EmptyText { platform: String },

    #[error("Post text for {platform} is {len} characters (limit {limit})")]
    TooLong {
        platform: String,
        len: usize,
        limit: usize,
    },
}

/// Top-level API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidPlan(#[from] PlanError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Posting(#[from] PostingError),

    #[error(transparent)]
    StateCorruption(#[from] StateError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Post {fingerprint} cannot move from {from} via {action}")]
    InvalidTransition {
        fingerprint: String,
        from: String,
        action: &'static str,
    },

    #[error("Lens choice is stale: rotation is at index {expected}, choice was for {got}")]
    StaleLensChoice { expected: usize, got: usize },

    #[error("No free slot for {platform} within {horizon_days} days")]
    HorizonExhausted { platform: String, horizon_days: u32 },

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ApiError {
    /// True for errors raised by fail-fast validation (plan, post content, or arguments).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidPlan(_) | ApiError::Validation(_) | ApiError::InvalidArgument(_)
        )
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::StorageError(StorageError::IoError(err))
    }
}
