//! CLI parse: clap types for trendpost. No behavior; definitions only.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// trendpost CLI - lens-rotated content planning and social post scheduling
#[derive(Parser, Debug)]
#[command(name = "trendpost")]
#[command(about = "Plan trend-driven posts with rotating lenses and schedule them into daily slots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Post body given inline or from a file.
#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// Post text
    #[arg(long, conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Read post text from a file
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Hashtag to attach (repeatable)
    #[arg(long = "hashtag")]
    pub hashtags: Vec<String>,

    /// Media reference (URL or path) to attach
    #[arg(long)]
    pub media: Option<String>,
}

/// Trend candidates given inline or from a JSON file.
#[derive(Args, Debug, Clone)]
pub struct TrendArgs {
    /// JSON file with one candidate or an array of candidates
    #[arg(long)]
    pub trends_file: Option<PathBuf>,

    /// Trend title (repeatable)
    #[arg(long = "trend")]
    pub trends: Vec<String>,

    /// Domain for inline trends, and fallback when no candidate names one
    #[arg(long)]
    pub domain: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Schedule a post into the next free daily slot
    Schedule {
        /// Target platform (twitter, instagram, linkedin, facebook)
        #[arg(long)]
        platform: String,
        #[command(flatten)]
        content: ContentArgs,
        /// Record the slot as skipped without ever posting
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Schedule content on several platforms independently
    ScheduleMulti {
        /// Target platforms (repeatable or comma separated)
        #[arg(long = "platform", required = true, value_delimiter = ',')]
        platforms: Vec<String>,
        #[command(flatten)]
        content: ContentArgs,
        /// Per-platform text override, PLATFORM=TEXT (repeatable)
        #[arg(long = "text-for", value_name = "PLATFORM=TEXT")]
        text_for: Vec<String>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Post immediately, bypassing slot assignment
    PostNow {
        #[arg(long)]
        platform: String,
        #[command(flatten)]
        content: ContentArgs,
        #[arg(long)]
        dry_run: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Build a content plan and advance the lens rotation
    Plan {
        #[command(flatten)]
        trends: TrendArgs,
        /// Platform the plan is for
        #[arg(long)]
        platform: Option<String>,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Inspect the lens rotation
    Lens {
        #[command(subcommand)]
        command: LensCommands,
    },
    /// Show the workflow skeleton for a domain (omit to list domains)
    Skeleton {
        domain: Option<String>,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Plan, draft and schedule in one step
    Run {
        #[command(flatten)]
        trends: TrendArgs,
        /// Target platforms (repeatable or comma separated)
        #[arg(long = "platform", required = true, value_delimiter = ',')]
        platforms: Vec<String>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Execute a scheduled post now, or every due post with --due
    Execute {
        /// Fingerprint or unique prefix
        #[arg(required_unless_present = "due", conflicts_with = "due")]
        fingerprint: Option<String>,
        /// Execute every scheduled post whose slot has arrived
        #[arg(long)]
        due: bool,
        #[arg(long)]
        dry_run: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Cancel a pending or scheduled post, freeing its slot
    Cancel {
        /// Fingerprint or unique prefix
        fingerprint: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List recorded posts, newest first
    History {
        #[arg(long)]
        platform: Option<String>,
        /// pending, scheduled, posted, failed, skipped
        #[arg(long)]
        state: Option<String>,
        /// Earliest target date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest target date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Preview the next free slots for a platform
    Slots {
        #[arg(long)]
        platform: String,
        #[arg(long, default_value = "7")]
        count: usize,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write a default workspace configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,

        /// List what would be initialized without creating
        #[arg(long)]
        list: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum LensCommands {
    /// Current position and the lens that comes next
    Status {
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// The fixed lens cycle
    Cycle {
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Recent rotation history, newest last
    History {
        #[arg(long, default_value = "20")]
        limit: usize,
        #[arg(long, default_value = "text")]
        format: String,
    },
}
