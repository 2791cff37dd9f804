//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::clock::{Clock, SystemClock};
use crate::config::{AppConfig, ConfigLoader};
use crate::error::ApiError;
use crate::generation::{ContentGenerator, DraftGenerator};
use crate::init;
use crate::lens::LensRotationEngine;
use crate::plan::{load_candidates, ContentPlanner, TrendCandidate};
use crate::schedule::{HistoryFilter, PostContent, PostScheduler, PostState, PosterRegistry};
use crate::skeleton;
use crate::types::Platform;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use super::presentation as present;
use crate::cli::command_name;
use crate::cli::parse::{Commands, ContentArgs, LensCommands, TrendArgs};

/// Runtime context for CLI execution: workspace, loaded config, clock and poster override.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: AppConfig,
    clock: Arc<dyn Clock>,
    posters: Option<PosterRegistry>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        if let Err(problems) = config.validate() {
            let joined = problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::ConfigError(joined));
        }
        Ok(Self::with_config(workspace_root, config))
    }

    /// Context over an already-loaded config.
    pub fn with_config(workspace_root: PathBuf, config: AppConfig) -> Self {
        Self {
            workspace_root,
            config,
            clock: Arc::new(SystemClock),
            posters: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use these posters instead of the ones built from `[posters.*]`.
    pub fn with_posters(mut self, posters: PosterRegistry) -> Self {
        self.posters = Some(posters);
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = %name, "Command started");
        let result = self.dispatch(command);
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(command = %name, duration_ms, "Command completed"),
            Err(e) => warn!(command = %name, duration_ms, error = %e, "Command failed"),
        }
        result
    }

    fn dispatch(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Schedule {
                platform,
                content,
                dry_run,
                format,
            } => self.handle_schedule(platform, content, *dry_run, format),
            Commands::ScheduleMulti {
                platforms,
                content,
                text_for,
                dry_run,
                format,
            } => self.handle_schedule_multi(platforms, content, text_for, *dry_run, format),
            Commands::PostNow {
                platform,
                content,
                dry_run,
                format,
            } => self.handle_post_now(platform, content, *dry_run, format),
            Commands::Plan {
                trends,
                platform,
                format,
            } => self.handle_plan(trends, platform.as_deref(), format),
            Commands::Lens { command } => self.handle_lens(command),
            Commands::Skeleton { domain, format } => {
                Ok(match (domain.as_deref(), format.as_str()) {
                    (None, "json") => present::format_domain_list_json(),
                    (None, _) => present::format_domain_list_text(),
                    (Some(d), "json") => present::format_skeleton_json(&skeleton::resolve(d)),
                    (Some(d), _) => present::format_skeleton_text(&skeleton::resolve(d)),
                })
            }
            Commands::Run {
                trends,
                platforms,
                dry_run,
                format,
            } => self.handle_run(trends, platforms, *dry_run, format),
            Commands::Execute {
                fingerprint,
                due,
                dry_run,
                format,
            } => self.handle_execute(fingerprint.as_deref(), *due, *dry_run, format),
            Commands::Cancel {
                fingerprint,
                format,
            } => {
                let mut scheduler = self.open_scheduler(false)?;
                let zone = scheduler.policy().zone();
                let target = scheduler.resolve(fingerprint)?;
                let post = scheduler.cancel(&target)?;
                scheduler.close()?;
                Ok(match format.as_str() {
                    "json" => present::format_post_json(&post),
                    _ => format!("Cancelled.\n{}", present::format_post_text(&post, zone)),
                })
            }
            Commands::History {
                platform,
                state,
                from,
                to,
                limit,
                format,
            } => {
                let filter = HistoryFilter {
                    platform: platform.as_deref().map(str::parse::<Platform>).transpose()?,
                    state: state
                        .as_deref()
                        .map(str::parse::<PostState>)
                        .transpose()
                        .map_err(ApiError::InvalidArgument)?,
                    from: *from,
                    to: *to,
                    limit: *limit,
                };
                let scheduler = self.open_scheduler(false)?;
                let posts = scheduler.history(&filter);
                Ok(match format.as_str() {
                    "json" => present::format_posts_json(&posts),
                    _ => present::format_posts_text("Post History", &posts, scheduler.policy().zone()),
                })
            }
            Commands::Slots {
                platform,
                count,
                format,
            } => {
                let platform: Platform = platform.parse()?;
                let scheduler = self.open_scheduler(false)?;
                let slots = scheduler.upcoming_slots(platform, *count);
                Ok(match format.as_str() {
                    "json" => present::format_slots_json(platform, &slots),
                    _ => present::format_slots_text(platform, &slots, scheduler.policy().zone()),
                })
            }
            Commands::Init { force, list } => {
                if *list {
                    Ok(present::format_init_preview(&init::preview(&self.workspace_root)))
                } else {
                    let result = init::initialize(&self.workspace_root, *force)?;
                    Ok(present::format_init_summary(&result, *force))
                }
            }
        }
    }

    fn handle_schedule(
        &self,
        platform: &str,
        content: &ContentArgs,
        dry_run: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let platform: Platform = platform.parse()?;
        let content = read_content(content)?;
        let mut scheduler = self.open_scheduler(dry_run)?;
        let outcome = scheduler.schedule_post(&content, platform)?;
        let zone = scheduler.policy().zone();
        scheduler.close()?;
        Ok(match format {
            "json" => present::format_schedule_outcome_json(&outcome),
            _ => present::format_schedule_outcome_text(&outcome, zone),
        })
    }

    fn handle_schedule_multi(
        &self,
        platforms: &[String],
        content: &ContentArgs,
        text_for: &[String],
        dry_run: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let base = read_content(content)?;
        let overrides = parse_text_overrides(text_for)?;
        let requests: Vec<(String, PostContent)> = platforms
            .iter()
            .map(|name| {
                let mut per_platform = base.clone();
                if let Some((_, text)) = overrides
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
                {
                    per_platform.text = text.clone();
                }
                (name.clone(), per_platform)
            })
            .collect();

        let mut scheduler = self.open_scheduler(dry_run)?;
        let report = scheduler.schedule_multi_platform(requests);
        let zone = scheduler.policy().zone();
        scheduler.close()?;

        if report.succeeded().count() == 0 {
            if let Some(err) = report.results.into_iter().find_map(|r| r.result.err()) {
                return Err(err);
            }
            return Err(ApiError::InvalidArgument("no platforms given".to_string()));
        }
        Ok(match format {
            "json" => present::format_multi_report_json(&report),
            _ => present::format_multi_report_text(&report, zone),
        })
    }

    fn handle_post_now(
        &self,
        platform: &str,
        content: &ContentArgs,
        dry_run: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let platform: Platform = platform.parse()?;
        let content = read_content(content)?;
        let runtime = runtime()?;
        let mut scheduler = self.open_scheduler(dry_run)?;
        let post = runtime.block_on(scheduler.post_now(&content, platform))?;
        let zone = scheduler.policy().zone();
        scheduler.close()?;
        Ok(match format {
            "json" => present::format_post_json(&post),
            _ => present::format_post_text(&post, zone),
        })
    }

    fn handle_plan(
        &self,
        trends: &TrendArgs,
        platform: Option<&str>,
        format: &str,
    ) -> Result<String, ApiError> {
        let platform = platform.map(str::parse::<Platform>).transpose()?;
        let candidates = load_trends(trends)?;
        let mut engine = self.open_lens_engine()?;
        let plan =
            ContentPlanner::new(&mut engine).plan(&candidates, platform, trends.domain.as_deref())?;
        Ok(match format {
            "json" => present::format_plan_json(&plan),
            _ => present::format_plan_text(&plan),
        })
    }

    fn handle_lens(&self, command: &LensCommands) -> Result<String, ApiError> {
        let engine = self.open_lens_engine()?;
        Ok(match command {
            LensCommands::Status { format } => match format.as_str() {
                "json" => present::format_lens_status_json(&engine),
                _ => present::format_lens_status_text(&engine),
            },
            LensCommands::Cycle { format } => match format.as_str() {
                "json" => present::format_lens_cycle_json(),
                _ => present::format_lens_cycle_text(engine.current()),
            },
            LensCommands::History { limit, format } => {
                let entries = engine.recent_history(*limit);
                match format.as_str() {
                    "json" => present::format_lens_history_json(entries),
                    _ => present::format_lens_history_text(entries),
                }
            }
        })
    }

    /// Plan once, draft per platform, then schedule every platform independently.
    fn handle_run(
        &self,
        trends: &TrendArgs,
        platforms: &[String],
        dry_run: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let targets = platforms
            .iter()
            .map(|p| p.parse::<Platform>())
            .collect::<Result<Vec<_>, _>>()?;
        let candidates = load_trends(trends)?;
        let runtime = runtime()?;
        let mut scheduler = self.open_scheduler(dry_run)?;
        let mut engine = self.open_lens_engine()?;

        let plan = ContentPlanner::new(&mut engine).plan(
            &candidates,
            targets.first().copied(),
            trends.domain.as_deref(),
        )?;

        let generator = DraftGenerator;
        let mut drafts = Vec::with_capacity(targets.len());
        for platform in &targets {
            let generated = runtime.block_on(generator.generate(&plan.with_platform(*platform)))?;
            debug!(
                platform = %platform,
                generator = generator.name(),
                chars = generated.text.chars().count(),
                "Draft generated"
            );
            drafts.push((platform.as_str(), PostContent::from(generated)));
        }

        let report = scheduler.schedule_multi_platform(drafts);
        let zone = scheduler.policy().zone();
        scheduler.close()?;
        Ok(match format {
            "json" => present::format_run_json(&plan, &report),
            _ => present::format_run_text(&plan, &report, zone),
        })
    }

    fn handle_execute(
        &self,
        fingerprint: Option<&str>,
        due: bool,
        dry_run: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let runtime = runtime()?;
        let mut scheduler = self.open_scheduler(dry_run)?;
        let zone = scheduler.policy().zone();

        if due {
            let posts = runtime.block_on(scheduler.run_due())?;
            scheduler.close()?;
            return Ok(match format {
                "json" => present::format_posts_json(&posts),
                _ => present::format_posts_text("Executed Posts", &posts, zone),
            });
        }

        let prefix = fingerprint.ok_or_else(|| {
            ApiError::InvalidArgument("a fingerprint or --due is required".to_string())
        })?;
        let target = scheduler.resolve(prefix)?;
        let post = runtime.block_on(scheduler.execute(&target))?;
        scheduler.close()?;
        Ok(match format {
            "json" => present::format_post_json(&post),
            _ => present::format_post_text(&post, zone),
        })
    }

    fn open_scheduler(&self, force_dry_run: bool) -> Result<PostScheduler, ApiError> {
        let posters = match &self.posters {
            Some(posters) => posters.clone(),
            None => self.config.poster_registry()?,
        };
        let scheduler = PostScheduler::open(
            self.config.post_log_path(&self.workspace_root),
            self.config.slot_policy()?,
            posters,
            Arc::clone(&self.clock),
            self.config.scheduler_options(force_dry_run),
        )?;
        Ok(scheduler)
    }

    fn open_lens_engine(&self) -> Result<LensRotationEngine, ApiError> {
        let engine = LensRotationEngine::open(
            self.config.lens_state_path(&self.workspace_root),
            Arc::clone(&self.clock),
        )?;
        Ok(engine)
    }
}

fn runtime() -> Result<Runtime, ApiError> {
    Runtime::new().map_err(|e| ApiError::ConfigError(format!("Failed to start async runtime: {}", e)))
}

fn read_content(args: &ContentArgs) -> Result<PostContent, ApiError> {
    let text = match (&args.text, &args.text_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| {
                ApiError::InvalidArgument(format!("cannot read {}: {}", path.display(), e))
            })?
            .trim_end()
            .to_string(),
        (None, None) => String::new(),
    };
    let mut content = PostContent::new(text).with_hashtags(
        args.hashtags
            .iter()
            .map(|t| t.trim().trim_start_matches('#').to_string())
            .filter(|t| !t.is_empty()),
    );
    if let Some(media) = &args.media {
        content = content.with_media(media.clone());
    }
    Ok(content)
}

/// `PLATFORM=TEXT` pairs from `--text-for`.
fn parse_text_overrides(values: &[String]) -> Result<Vec<(String, String)>, ApiError> {
    values
        .iter()
        .map(|value| match value.split_once('=') {
            Some((platform, text)) if !platform.trim().is_empty() => {
                Ok((platform.trim().to_string(), text.to_string()))
            }
            _ => Err(ApiError::InvalidArgument(format!(
                "--text-for expects PLATFORM=TEXT, got '{}'",
                value
            ))),
        })
        .collect()
}

fn load_trends(args: &TrendArgs) -> Result<Vec<TrendCandidate>, ApiError> {
    let mut candidates = match &args.trends_file {
        Some(path) => load_candidates(path)?,
        None => Vec::new(),
    };
    for title in args.trends.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        let mut candidate = TrendCandidate::new(title);
        if let Some(domain) = &args.domain {
            candidate = candidate.with_domain(domain.clone());
        }
        candidates.push(candidate);
    }
    Ok(candidates)
}
