//! Post lifecycle: slot assignment, dispatch, and the log-backed index.

use crate::clock::Clock;
use crate::error::{ApiError, PostingError, StorageError};
use crate::schedule::log::{LogEntry, PostIndex, PostLog};
use crate::schedule::post::{compute_fingerprint, PostContent, PostState, ScheduledPost};
use crate::schedule::poster::{PostOutcome, PosterRegistry};
use crate::schedule::slot::SlotPolicy;
use crate::types::{Fingerprint, Platform};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_POSTER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Resolve posts to `Skipped` instead of calling posters.
    pub dry_run: bool,
    pub poster_timeout: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            poster_timeout: DEFAULT_POSTER_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStatus {
    Scheduled,
    AlreadyScheduled,
    DryRun,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "scheduled",
            ScheduleStatus::AlreadyScheduled => "already scheduled",
            ScheduleStatus::DryRun => "dry run",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub status: ScheduleStatus,
    pub post: ScheduledPost,
}

/// Result for one platform of a multi-platform request.
#[derive(Debug)]
pub struct PlatformResult {
    pub platform: String,
    pub result: Result<ScheduleOutcome, ApiError>,
}

#[derive(Debug, Default)]
pub struct MultiScheduleReport {
    pub results: Vec<PlatformResult>,
}

impl MultiScheduleReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ScheduleOutcome> {
        self.results.iter().filter_map(|r| r.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &ApiError)> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (r.platform.as_str(), e)))
    }

    pub fn get(&self, platform: &str) -> Option<&Result<ScheduleOutcome, ApiError>> {
        self.results
            .iter()
            .find(|r| r.platform.eq_ignore_ascii_case(platform))
            .map(|r| &r.result)
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.result.is_ok())
    }
}

/// History query. Unset fields match everything; date bounds are inclusive target dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub platform: Option<Platform>,
    pub state: Option<PostState>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl HistoryFilter {
    pub fn matches(&self, post: &ScheduledPost) -> bool {
        self.platform.map_or(true, |p| post.platform == p)
            && self.state.map_or(true, |s| post.state == s)
            && self.from.map_or(true, |d| post.target_date >= d)
            && self.to.map_or(true, |d| post.target_date <= d)
    }
}

/// Single-writer owner of the post log.
pub struct PostScheduler {
    log: PostLog,
    index: PostIndex,
    policy: SlotPolicy,
    posters: PosterRegistry,
    clock: Arc<dyn Clock>,
    options: SchedulerOptions,
}

impl PostScheduler {
    /// Replay the log at `log_path` into memory.
    pub fn open(
        log_path: impl Into<PathBuf>,
        policy: SlotPolicy,
        posters: PosterRegistry,
        clock: Arc<dyn Clock>,
        options: SchedulerOptions,
    ) -> Result<Self, StorageError> {
        let log = PostLog::new(log_path);
        log.seal_torn_tail()?;
        let index = log.replay()?;
        info!(
            path = ?log.path(),
            posts = index.len(),
            dry_run = options.dry_run,
            "Post scheduler opened"
        );
        Ok(Self {
            log,
            index,
            policy,
            posters,
            clock,
            options,
        })
    }

    pub fn index(&self) -> &PostIndex {
        &self.index
    }

    pub fn policy(&self) -> &SlotPolicy {
        &self.policy
    }

    pub fn log_path(&self) -> &std::path::Path {
        self.log.path()
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&ScheduledPost> {
        self.index.get(fingerprint)
    }

    /// Resolve a full fingerprint or a unique prefix of one.
    pub fn resolve(&self, prefix: &str) -> Result<Fingerprint, ApiError> {
        let needle = prefix.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(ApiError::PostNotFound(prefix.to_string()));
        }
        let mut matches = self
            .index
            .iter()
            .filter(|p| p.fingerprint.as_str().starts_with(&needle))
            .map(|p| p.fingerprint.clone());
        match (matches.next(), matches.next()) {
            (Some(fp), None) => Ok(fp),
            (Some(_), Some(_)) => Err(ApiError::PostNotFound(format!(
                "{} (ambiguous prefix)",
                prefix
            ))),
            (None, _) => Err(ApiError::PostNotFound(prefix.to_string())),
        }
    }

    /// Assign `content` the next free slot on `platform`.
    ///
    /// A live or posted record with the same text for the same platform, dated today or
    /// later, is returned unchanged as `AlreadyScheduled`.
    pub fn schedule_post(
        &mut self,
        content: &PostContent,
        platform: Platform,
    ) -> Result<ScheduleOutcome, ApiError> {
        content.validate_for(platform)?;

        let now = self.clock.now();
        let today = self.policy.local_date(now);
        let content_ref = content.content_ref();

        if let Some(existing) = self.find_existing(&content_ref, platform, today) {
            info!(
                fingerprint = existing.fingerprint.short(),
                platform = %platform,
                state = %existing.state,
                "Post already scheduled"
            );
            return Ok(ScheduleOutcome {
                status: ScheduleStatus::AlreadyScheduled,
                post: existing.clone(),
            });
        }

        let (target_date, slot) = self
            .policy
            .next_free(now, |date| self.slot_taken(platform, date))
            .ok_or_else(|| ApiError::HorizonExhausted {
                platform: platform.to_string(),
                horizon_days: self.policy.horizon_days(),
            })?;

        let fingerprint = self.fresh_fingerprint(content, platform, target_date);
        let pending = ScheduledPost::pending(
            fingerprint,
            platform,
            content,
            target_date,
            slot,
            self.options.dry_run,
            now,
        );
        self.record(pending.clone())?;

        let (state, status) = if self.options.dry_run {
            (PostState::Skipped, ScheduleStatus::DryRun)
        } else {
            (PostState::Scheduled, ScheduleStatus::Scheduled)
        };
        let post = pending.transitioned(state, now);
        self.record(post.clone())?;

        info!(
            fingerprint = post.fingerprint.short(),
            platform = %platform,
            target_date = %target_date,
            scheduled_at = %slot,
            dry_run = self.options.dry_run,
            "Post scheduled"
        );
        Ok(ScheduleOutcome { status, post })
    }

    /// Schedule each platform independently; one platform's failure never blocks another.
    pub fn schedule_multi_platform<I, S>(&mut self, content_by_platform: I) -> MultiScheduleReport
    where
        I: IntoIterator<Item = (S, PostContent)>,
        S: AsRef<str>,
    {
        let mut report = MultiScheduleReport::default();
        for (name, content) in content_by_platform {
            let name = name.as_ref().trim().to_string();
            let result = name
                .parse::<Platform>()
                .map_err(ApiError::from)
                .and_then(|platform| self.schedule_post(&content, platform));
            if let Err(e) = &result {
                warn!(platform = %name, error = %e, "Platform not scheduled");
            }
            report.results.push(PlatformResult {
                platform: name,
                result,
            });
        }
        info!(
            scheduled = report.succeeded().count(),
            failed = report.failed().count(),
            "Multi-platform schedule complete"
        );
        report
    }

    /// Post immediately, bypassing slot assignment.
    pub async fn post_now(
        &mut self,
        content: &PostContent,
        platform: Platform,
    ) -> Result<ScheduledPost, ApiError> {
        content.validate_for(platform)?;

        let now = self.clock.now();
        let today = self.policy.local_date(now);

        if let Some(existing) = self
            .find_same_day(&content.content_ref(), platform, today)
            .cloned()
        {
            match existing.state {
                PostState::Posted => {
                    info!(
                        fingerprint = existing.fingerprint.short(),
                        "Post already published today"
                    );
                    return Ok(existing);
                }
                PostState::Skipped => return Ok(existing),
                PostState::Pending | PostState::Scheduled => {
                    debug!(
                        fingerprint = existing.fingerprint.short(),
                        "Posting same-day record now"
                    );
                    return self.dispatch(&existing.fingerprint).await;
                }
                PostState::Failed => {}
            }
        }

        let fingerprint = self.fresh_fingerprint(content, platform, today);
        let pending = ScheduledPost::pending(
            fingerprint.clone(),
            platform,
            content,
            today,
            now,
            self.options.dry_run,
            now,
        );
        self.record(pending)?;
        self.dispatch(&fingerprint).await
    }

    /// Drive a `Scheduled` post to its terminal state. Terminal posts are returned as-is.
    ///
    /// In dry-run mode a real scheduled post is left untouched and the would-be
    /// `Skipped` snapshot is returned without being recorded.
    pub async fn execute(&mut self, fingerprint: &Fingerprint) -> Result<ScheduledPost, ApiError> {
        let post = self
            .index
            .get(fingerprint)
            .cloned()
            .ok_or_else(|| ApiError::PostNotFound(fingerprint.to_string()))?;

        match post.state {
            state if state.is_terminal() => {
                debug!(fingerprint = fingerprint.short(), state = %state, "Execute on terminal post");
                Ok(post)
            }
            PostState::Pending => Err(ApiError::InvalidTransition {
                fingerprint: fingerprint.to_string(),
                from: post.state.to_string(),
                action: "execute",
            }),
            _ if self.options.dry_run && !post.dry_run => {
                info!(fingerprint = fingerprint.short(), "Dry run: post left scheduled");
                Ok(self.dry_run_preview(&post))
            }
            _ => self.dispatch(fingerprint).await,
        }
    }

    /// Remove a live post, freeing its slot.
    pub fn cancel(&mut self, fingerprint: &Fingerprint) -> Result<ScheduledPost, ApiError> {
        let post = self
            .index
            .get(fingerprint)
            .cloned()
            .ok_or_else(|| ApiError::PostNotFound(fingerprint.to_string()))?;

        if !post.state.is_live() {
            return Err(ApiError::InvalidTransition {
                fingerprint: fingerprint.to_string(),
                from: post.state.to_string(),
                action: "cancel",
            });
        }

        let entry = LogEntry::Removed {
            fingerprint: fingerprint.clone(),
            removed_at: self.clock.now(),
        };
        self.log.append(&entry)?;
        self.index.apply(entry);
        info!(
            fingerprint = fingerprint.short(),
            platform = %post.platform,
            target_date = %post.target_date,
            "Post cancelled"
        );
        Ok(post)
    }

    /// Scheduled posts whose slot is at or before `now`, earliest first.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<ScheduledPost> {
        let mut due: Vec<_> = self
            .index
            .iter()
            .filter(|p| p.state == PostState::Scheduled && p.scheduled_at <= now)
            .cloned()
            .collect();
        due.sort_by(|a, b| {
            a.scheduled_at
                .cmp(&b.scheduled_at)
                .then_with(|| a.platform.cmp(&b.platform))
        });
        due
    }

    /// Execute every due post.
    pub async fn run_due(&mut self) -> Result<Vec<ScheduledPost>, ApiError> {
        let due = self.due(self.clock.now());
        if due.is_empty() {
            debug!("No posts due");
        }
        let mut executed = Vec::with_capacity(due.len());
        for post in due {
            executed.push(self.execute(&post.fingerprint).await?);
        }
        Ok(executed)
    }

    /// Matching posts, newest slot first.
    pub fn history(&self, filter: &HistoryFilter) -> Vec<ScheduledPost> {
        let mut posts: Vec<_> = self
            .index
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.scheduled_at
                .cmp(&a.scheduled_at)
                .then_with(|| b.recorded_at.cmp(&a.recorded_at))
        });
        if let Some(limit) = filter.limit {
            posts.truncate(limit);
        }
        posts
    }

    /// The next `count` free slots for `platform`, without reserving them.
    pub fn upcoming_slots(&self, platform: Platform, count: usize) -> Vec<(NaiveDate, DateTime<Utc>)> {
        let now = self.clock.now();
        let mut slots: Vec<(NaiveDate, DateTime<Utc>)> = Vec::with_capacity(count);
        while slots.len() < count {
            let next = self.policy.next_free(now, |date| {
                slots.iter().any(|(d, _)| *d == date) || self.slot_taken(platform, date)
            });
            match next {
                Some(slot) => slots.push(slot),
                None => break,
            }
        }
        slots
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.log.sync()
    }

    /// Flush and release the log.
    pub fn close(self) -> Result<(), StorageError> {
        self.log.sync()?;
        info!(path = ?self.log.path(), posts = self.index.len(), "Post scheduler closed");
        Ok(())
    }

    fn record(&mut self, post: ScheduledPost) -> Result<(), StorageError> {
        let entry = LogEntry::Snapshot { post };
        self.log.append(&entry)?;
        self.index.apply(entry);
        Ok(())
    }

    /// Whether `post` holds its platform's slot on its target date.
    ///
    /// Dry-run records only hold slots for other dry-run scheduling.
    fn holds_slot(&self, post: &ScheduledPost) -> bool {
        match post.state {
            PostState::Pending | PostState::Scheduled | PostState::Posted => true,
            PostState::Skipped => self.options.dry_run,
            PostState::Failed => false,
        }
    }

    fn slot_taken(&self, platform: Platform, date: NaiveDate) -> bool {
        self.index
            .slot_taken(platform, date, |post| self.holds_slot(post))
    }

    fn find_existing(
        &self,
        content_ref: &str,
        platform: Platform,
        today: NaiveDate,
    ) -> Option<&ScheduledPost> {
        self.index
            .iter()
            .filter(|p| {
                p.platform == platform
                    && p.content_ref == content_ref
                    && p.target_date >= today
                    && self.holds_slot(p)
            })
            .min_by_key(|p| (p.target_date, p.recorded_at))
    }

    /// Same-day record for `content_ref` on `platform` across every attempt, preferring
    /// a published one.
    fn find_same_day(
        &self,
        content_ref: &str,
        platform: Platform,
        today: NaiveDate,
    ) -> Option<&ScheduledPost> {
        self.index
            .iter()
            .filter(|p| {
                p.platform == platform
                    && p.content_ref == content_ref
                    && p.target_date == today
                    && self.holds_slot(p)
            })
            .min_by_key(|p| (p.state != PostState::Posted, p.recorded_at))
    }

    /// Unrecorded `Skipped` snapshot of a live post, returned by dry runs.
    fn dry_run_preview(&self, post: &ScheduledPost) -> ScheduledPost {
        let mut preview = post.transitioned(PostState::Skipped, self.clock.now());
        preview.dry_run = true;
        preview
    }

    fn fresh_fingerprint(
        &self,
        content: &PostContent,
        platform: Platform,
        target_date: NaiveDate,
    ) -> Fingerprint {
        let mut attempt = 0u32;
        loop {
            let fingerprint = compute_fingerprint(content, platform, target_date, attempt);
            if !self.index.contains(&fingerprint) || attempt == u32::MAX {
                return fingerprint;
            }
            attempt += 1;
        }
    }

    /// Call the poster (or skip in dry-run) and record the terminal snapshot.
    async fn dispatch(&mut self, fingerprint: &Fingerprint) -> Result<ScheduledPost, ApiError> {
        let post = self
            .index
            .get(fingerprint)
            .cloned()
            .ok_or_else(|| ApiError::PostNotFound(fingerprint.to_string()))?;

        if self.options.dry_run && !post.dry_run {
            info!(fingerprint = fingerprint.short(), "Dry run: live post left untouched");
            return Ok(self.dry_run_preview(&post));
        }

        if self.options.dry_run {
            let mut skipped = post.transitioned(PostState::Skipped, self.clock.now());
            skipped.dry_run = true;
            self.record(skipped.clone())?;
            info!(fingerprint = fingerprint.short(), platform = %post.platform, "Dry run: post skipped");
            return Ok(skipped);
        }

        let result = self.call_poster(&post).await;
        let now = self.clock.now();
        let next = match result {
            Ok(PostOutcome {
                success: true,
                remote_id,
                ..
            }) => {
                info!(
                    fingerprint = fingerprint.short(),
                    platform = %post.platform,
                    remote_id = ?remote_id,
                    "Post published"
                );
                post.transitioned(PostState::Posted, now)
                    .with_outcome(remote_id, None)
            }
            Ok(PostOutcome {
                remote_id, error, ..
            }) => {
                let err = PostingError::Rejected {
                    platform: post.platform.to_string(),
                    message: error.unwrap_or_else(|| "poster reported failure".to_string()),
                };
                warn!(fingerprint = fingerprint.short(), error = %err, "Post failed");
                post.transitioned(PostState::Failed, now)
                    .with_outcome(remote_id, Some(err.to_string()))
            }
            Err(err) => {
                warn!(fingerprint = fingerprint.short(), error = %err, "Post failed");
                post.transitioned(PostState::Failed, now)
                    .with_outcome(None, Some(err.to_string()))
            }
        };
        self.record(next.clone())?;
        Ok(next)
    }

    async fn call_poster(&self, post: &ScheduledPost) -> Result<PostOutcome, PostingError> {
        let poster = self
            .posters
            .get(post.platform)
            .ok_or_else(|| PostingError::NoPoster(post.platform.to_string()))?;
        let call = poster.post(&post.content, post.platform);
        match tokio::time::timeout(self.options.poster_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(PostingError::Timeout {
                platform: post.platform.to_string(),
                secs: self.options.poster_timeout.as_secs(),
            }),
        }
    }
}
