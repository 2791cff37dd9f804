//! Configuration System
//!
//! Layered configuration for state locations, the posting schedule, poster endpoints and
//! logging. See [`ConfigLoader`] for source precedence.

use crate::error::ApiError;
use crate::logging::{self, LoggingConfig};
use crate::schedule::slot::{DEFAULT_HORIZON_DAYS, DEFAULT_HOUR, DEFAULT_MINUTE};
use crate::schedule::{
    PosterRegistry, SchedulerOptions, SlotPolicy, WebhookPoster, DEFAULT_POSTER_TIMEOUT,
};
use crate::types::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Poster endpoints keyed by platform name
    #[serde(default)]
    pub posters: BTreeMap<String, PosterConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Persisted state locations, relative to the workspace root unless absolute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_lens_state_path")]
    pub lens_state_path: PathBuf,

    #[serde(default = "default_post_log_path")]
    pub post_log_path: PathBuf,
}

fn default_lens_state_path() -> PathBuf {
    PathBuf::from(".trendpost/content_state.json")
}

fn default_post_log_path() -> PathBuf {
    PathBuf::from(".trendpost/posts.jsonl")
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            lens_state_path: default_lens_state_path(),
            post_log_path: default_post_log_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// IANA zone for the daily slot
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_post_hour")]
    pub post_hour: u32,

    #[serde(default = "default_post_minute")]
    pub post_minute: u32,

    /// How many days ahead to look for a free slot
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,

    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    #[serde(default)]
    pub dry_run: bool,
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_post_hour() -> u32 {
    DEFAULT_HOUR
}

fn default_post_minute() -> u32 {
    DEFAULT_MINUTE
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

fn default_poster_timeout_secs() -> u64 {
    DEFAULT_POSTER_TIMEOUT.as_secs()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            post_hour: default_post_hour(),
            post_minute: default_post_minute(),
            horizon_days: default_horizon_days(),
            poster_timeout_secs: default_poster_timeout_secs(),
            dry_run: false,
        }
    }
}

/// Webhook poster for one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterConfig {
    pub endpoint: String,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Configuration validation problems
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigProblem {
    State(String),
    Schedule(String),
    Poster(String, String),
    Logging(String),
}

impl fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigProblem::State(msg) => write!(f, "State: {}", msg),
            ConfigProblem::Schedule(msg) => write!(f, "Schedule: {}", msg),
            ConfigProblem::Poster(name, msg) => write!(f, "Poster '{}': {}", name, msg),
            ConfigProblem::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ConfigProblem {}

impl AppConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ConfigProblem>> {
        let mut problems = Vec::new();

        if self.state.lens_state_path.as_os_str().is_empty() {
            problems.push(ConfigProblem::State("lens_state_path cannot be empty".to_string()));
        }
        if self.state.post_log_path.as_os_str().is_empty() {
            problems.push(ConfigProblem::State("post_log_path cannot be empty".to_string()));
        }
        if !self.state.lens_state_path.as_os_str().is_empty()
            && self.state.lens_state_path == self.state.post_log_path
        {
            problems.push(ConfigProblem::State(
                "lens_state_path and post_log_path must differ".to_string(),
            ));
        }

        if let Err(e) = self.slot_policy() {
            problems.push(ConfigProblem::Schedule(e.to_string()));
        }
        if self.schedule.poster_timeout_secs == 0 {
            problems.push(ConfigProblem::Schedule(
                "poster_timeout_secs must be positive".to_string(),
            ));
        }

        for (name, poster) in &self.posters {
            if let Err(e) = name.parse::<Platform>() {
                problems.push(ConfigProblem::Poster(name.clone(), e.to_string()));
            }
            let endpoint = poster.endpoint.trim();
            if endpoint.is_empty() {
                problems.push(ConfigProblem::Poster(
                    name.clone(),
                    "endpoint cannot be empty".to_string(),
                ));
            } else if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                problems.push(ConfigProblem::Poster(
                    name.clone(),
                    format!("endpoint must be an http(s) URL, got '{}'", endpoint),
                ));
            }
        }

        if let Err(e) = logging::validate_config(&self.logging) {
            problems.push(ConfigProblem::Logging(e.to_string()));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    pub fn lens_state_path(&self, workspace_root: &Path) -> PathBuf {
        resolve(workspace_root, &self.state.lens_state_path)
    }

    pub fn post_log_path(&self, workspace_root: &Path) -> PathBuf {
        resolve(workspace_root, &self.state.post_log_path)
    }

    pub fn slot_policy(&self) -> Result<SlotPolicy, ApiError> {
        let zone = SlotPolicy::parse_zone(&self.schedule.timezone)?;
        SlotPolicy::new(
            zone,
            self.schedule.post_hour,
            self.schedule.post_minute,
            self.schedule.horizon_days,
        )
    }

    /// Scheduler options; `force_dry_run` comes from a CLI flag and can only turn dry-run on.
    pub fn scheduler_options(&self, force_dry_run: bool) -> SchedulerOptions {
        SchedulerOptions {
            dry_run: self.schedule.dry_run || force_dry_run,
            poster_timeout: Duration::from_secs(self.schedule.poster_timeout_secs),
        }
    }

    /// Webhook posters for every enabled `[posters.*]` entry.
    pub fn poster_registry(&self) -> Result<PosterRegistry, ApiError> {
        let mut registry = PosterRegistry::new();
        for (name, poster) in self.posters.iter().filter(|(_, p)| p.enabled) {
            let platform: Platform = name.parse()?;
            let webhook = WebhookPoster::new(poster.endpoint.trim(), poster.token.clone())?;
            registry.register(platform, Arc::new(webhook));
        }
        Ok(registry)
    }

    /// Canonical TOML rendering, used by `init`.
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}

fn resolve(workspace_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.join(path)
    }
}
