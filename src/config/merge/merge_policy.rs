//! Merge rules: defaults first, later sources override.

use crate::schedule::slot::{DEFAULT_HORIZON_DAYS, DEFAULT_HOUR, DEFAULT_MINUTE};
use crate::schedule::DEFAULT_POSTER_TIMEOUT;
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("state.lens_state_path", ".trendpost/content_state.json")?
        .set_default("state.post_log_path", ".trendpost/posts.jsonl")?
        .set_default("schedule.timezone", "America/New_York")?
        .set_default("schedule.post_hour", DEFAULT_HOUR as i64)?
        .set_default("schedule.post_minute", DEFAULT_MINUTE as i64)?
        .set_default("schedule.horizon_days", DEFAULT_HORIZON_DAYS as i64)?
        .set_default(
            "schedule.poster_timeout_secs",
            DEFAULT_POSTER_TIMEOUT.as_secs() as i64,
        )?
        .set_default("schedule.dry_run", false)
}
