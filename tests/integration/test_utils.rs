//! Shared test utilities for integration tests
//!
//! Isolated config environments, a recording poster, and fixed instants.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use trendpost::clock::{Clock, ManualClock};
use trendpost::error::PostingError;
use trendpost::schedule::{
    PostContent, PostOutcome, PostScheduler, Poster, PosterRegistry, SchedulerOptions, SlotPolicy,
};
use trendpost::types::Platform;

/// Global mutex to serialize HOME/XDG environment variable access across all tests
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
    env_name: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
            env_name: std::env::var("TRENDPOST_ENV").ok(),
        }
    }

    fn restore(self) {
        restore_var("HOME", self.home);
        restore_var("XDG_CONFIG_HOME", self.xdg_config_home);
        restore_var("TRENDPOST_ENV", self.env_name);
    }
}

fn restore_var(name: &str, value: Option<String>) {
    match value {
        Some(orig) => std::env::set_var(name, orig),
        None => std::env::remove_var(name),
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir`.
///
/// The global config file lives at `<test_dir>/trendpost/config.toml`. The environment
/// is restored afterwards and access is serialized across tests.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().to_str().unwrap());
    std::env::remove_var("TRENDPOST_ENV");

    let result = f();

    env_state.restore();

    result
}

/// Thursday 2026-01-08 06:00 in New York; today's 08:15 slot is still ahead.
pub fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 8, 11, 0, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(morning()))
}

/// Poster that records every call and answers with a sequential remote id.
#[derive(Default)]
pub struct RecordingPoster {
    calls: Mutex<Vec<(Platform, String)>>,
    reject_with: Option<String>,
}

impl RecordingPoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reject_with: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<(Platform, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Poster for RecordingPoster {
    async fn post(
        &self,
        content: &PostContent,
        platform: Platform,
    ) -> Result<PostOutcome, PostingError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((platform, content.text.clone()));
        match &self.reject_with {
            Some(message) => Ok(PostOutcome::failed(message.clone())),
            None => Ok(PostOutcome::posted(Some(format!("remote-{}", calls.len())))),
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Registry with `poster` answering for every platform.
pub fn registry_with(poster: Arc<RecordingPoster>) -> PosterRegistry {
    let mut registry = PosterRegistry::new();
    for platform in Platform::ALL {
        registry.register(platform, poster.clone());
    }
    registry
}

/// Scheduler over `<dir>/posts.jsonl` with the default New York 08:15 policy.
pub fn open_scheduler(
    dir: &TempDir,
    posters: PosterRegistry,
    clock: Arc<dyn Clock>,
    dry_run: bool,
) -> PostScheduler {
    PostScheduler::open(
        dir.path().join("posts.jsonl"),
        SlotPolicy::default(),
        posters,
        clock,
        SchedulerOptions {
            dry_run,
            ..SchedulerOptions::default()
        },
    )
    .unwrap()
}

