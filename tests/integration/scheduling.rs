//! Integration tests for slot assignment, idempotency and post execution

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;
use trendpost::clock::FixedClock;
use trendpost::schedule::{
    PostContent, PostLog, PostState, PosterRegistry, ScheduleStatus,
};
use trendpost::types::Platform;

use crate::integration::{manual_clock, morning, open_scheduler, registry_with, RecordingPoster};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_consecutive_posts_take_consecutive_days() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = open_scheduler(
        &dir,
        PosterRegistry::new(),
        Arc::new(FixedClock(morning())),
        false,
    );

    let first = scheduler
        .schedule_post(&PostContent::new("first take on rate cuts"), Platform::Twitter)
        .unwrap();
    let second = scheduler
        .schedule_post(&PostContent::new("second take on rate cuts"), Platform::Twitter)
        .unwrap();

    assert_eq!(first.status, ScheduleStatus::Scheduled);
    assert_eq!(first.post.target_date, date(2026, 1, 8));
    assert_eq!(
        first.post.scheduled_at,
        Utc.with_ymd_and_hms(2026, 1, 8, 13, 15, 0).unwrap()
    );
    assert_eq!(second.post.target_date, date(2026, 1, 9));
    assert_eq!(
        second.post.scheduled_at,
        Utc.with_ymd_and_hms(2026, 1, 9, 13, 15, 0).unwrap()
    );
    assert_ne!(first.post.fingerprint, second.post.fingerprint);
}

#[test]
fn test_repeat_request_returns_existing_post() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = open_scheduler(
        &dir,
        PosterRegistry::new(),
        Arc::new(FixedClock(morning())),
        false,
    );
    let content = PostContent::new("one post, asked for twice").with_hashtags(["AI"]);

    let first = scheduler.schedule_post(&content, Platform::LinkedIn).unwrap();
    let again = scheduler.schedule_post(&content, Platform::LinkedIn).unwrap();

    assert_eq!(again.status, ScheduleStatus::AlreadyScheduled);
    assert_eq!(again.post.fingerprint, first.post.fingerprint);
    assert_eq!(scheduler.index().len(), 1);
    assert_eq!(
        scheduler.upcoming_slots(Platform::LinkedIn, 1)[0].0,
        date(2026, 1, 9)
    );
}

#[test]
fn test_multi_platform_reports_each_platform() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = open_scheduler(
        &dir,
        PosterRegistry::new(),
        Arc::new(FixedClock(morning())),
        false,
    );
    let long = "x".repeat(300);

    let report = scheduler.schedule_multi_platform(vec![
        ("twitter", PostContent::new(long.clone())),
        ("linkedin", PostContent::new(long)),
        ("Facebook", PostContent::new("short and fine")),
    ]);

    assert!(!report.all_succeeded());
    assert!(matches!(report.get("twitter"), Some(Err(e)) if e.is_validation()));
    assert!(matches!(report.get("linkedin"), Some(Ok(o)) if o.status == ScheduleStatus::Scheduled));
    assert!(matches!(report.get("facebook"), Some(Ok(_))));
    assert_eq!(scheduler.index().len(), 2);
    assert!(scheduler
        .index()
        .iter()
        .all(|p| p.platform != Platform::Twitter));
}

#[tokio::test]
async fn test_execute_posts_once() {
    let dir = TempDir::new().unwrap();
    let poster = Arc::new(RecordingPoster::new());
    let mut scheduler = open_scheduler(
        &dir,
        registry_with(poster.clone()),
        Arc::new(FixedClock(morning())),
        false,
    );
    let outcome = scheduler
        .schedule_post(&PostContent::new("ship it"), Platform::Instagram)
        .unwrap();

    let posted = scheduler.execute(&outcome.post.fingerprint).await.unwrap();
    let again = scheduler.execute(&outcome.post.fingerprint).await.unwrap();

    assert_eq!(posted.state, PostState::Posted);
    assert_eq!(posted.remote_id.as_deref(), Some("remote-1"));
    assert_eq!(again, posted);
    assert_eq!(poster.calls(), vec![(Platform::Instagram, "ship it".to_string())]);
}

#[tokio::test]
async fn test_rejected_post_is_failed_and_frees_the_day() {
    let dir = TempDir::new().unwrap();
    let poster = Arc::new(RecordingPoster::rejecting("account suspended"));
    let mut scheduler = open_scheduler(
        &dir,
        registry_with(poster),
        Arc::new(FixedClock(morning())),
        false,
    );
    let content = PostContent::new("will be rejected");
    let outcome = scheduler.schedule_post(&content, Platform::Twitter).unwrap();

    let failed = scheduler.execute(&outcome.post.fingerprint).await.unwrap();
    assert_eq!(failed.state, PostState::Failed);
    assert!(failed.error.as_deref().unwrap().contains("account suspended"));

    let retry = scheduler.schedule_post(&content, Platform::Twitter).unwrap();
    assert_eq!(retry.status, ScheduleStatus::Scheduled);
    assert_eq!(retry.post.target_date, date(2026, 1, 8));
    assert_ne!(retry.post.fingerprint, outcome.post.fingerprint);
}

#[tokio::test]
async fn test_run_due_only_executes_arrived_slots() {
    let dir = TempDir::new().unwrap();
    let poster = Arc::new(RecordingPoster::new());
    let clock = manual_clock();
    let mut scheduler = open_scheduler(&dir, registry_with(poster.clone()), clock.clone(), false);

    scheduler
        .schedule_post(&PostContent::new("today"), Platform::Twitter)
        .unwrap();
    scheduler
        .schedule_post(&PostContent::new("tomorrow"), Platform::Twitter)
        .unwrap();

    assert!(scheduler.run_due().await.unwrap().is_empty());

    clock.advance(Duration::hours(3));
    let executed = scheduler.run_due().await.unwrap();

    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].content.text, "today");
    assert_eq!(executed[0].state, PostState::Posted);
    assert_eq!(poster.calls().len(), 1);
}

#[tokio::test]
async fn test_dry_run_never_calls_poster() {
    let dir = TempDir::new().unwrap();
    let poster = Arc::new(RecordingPoster::new());
    let mut scheduler = open_scheduler(
        &dir,
        registry_with(poster.clone()),
        Arc::new(FixedClock(morning())),
        true,
    );

    let outcome = scheduler
        .schedule_post(&PostContent::new("rehearsal"), Platform::Facebook)
        .unwrap();
    let now = scheduler
        .post_now(&PostContent::new("rehearsal now"), Platform::Facebook)
        .await
        .unwrap();

    assert_eq!(outcome.status, ScheduleStatus::DryRun);
    assert_eq!(outcome.post.state, PostState::Skipped);
    assert_eq!(now.state, PostState::Skipped);
    assert!(poster.calls().is_empty());
}

#[tokio::test]
async fn test_dry_run_post_now_never_touches_live_schedule() {
    let dir = TempDir::new().unwrap();
    let poster = Arc::new(RecordingPoster::new());
    let clock = Arc::new(FixedClock(morning()));
    let content = PostContent::new("live launch note");
    let fingerprint = {
        let mut live = open_scheduler(&dir, registry_with(poster.clone()), clock.clone(), false);
        let outcome = live.schedule_post(&content, Platform::LinkedIn).unwrap();
        live.close().unwrap();
        outcome.post.fingerprint
    };

    {
        let mut dry = open_scheduler(&dir, registry_with(poster.clone()), clock.clone(), true);
        let preview = dry.post_now(&content, Platform::LinkedIn).await.unwrap();
        assert_eq!(preview.state, PostState::Skipped);
        dry.close().unwrap();
    }

    let mut live = open_scheduler(&dir, registry_with(poster.clone()), clock, false);
    let post = live.get(&fingerprint).unwrap();
    assert_eq!(post.state, PostState::Scheduled);
    assert_eq!(post.target_date, date(2026, 1, 8));

    let posted = live.execute(&fingerprint).await.unwrap();
    assert_eq!(posted.state, PostState::Posted);
    assert_eq!(poster.calls().len(), 1);
}

#[test]
fn test_reopen_replays_to_same_index() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(FixedClock(morning()));
    let live = {
        let mut scheduler = open_scheduler(&dir, PosterRegistry::new(), clock.clone(), false);
        for text in ["a", "b", "c"] {
            scheduler
                .schedule_post(&PostContent::new(text), Platform::Twitter)
                .unwrap();
        }
        let b = scheduler
            .index()
            .iter()
            .find(|p| p.content.text == "b")
            .unwrap()
            .fingerprint
            .clone();
        scheduler.cancel(&b).unwrap();
        let index = scheduler.index().clone();
        scheduler.close().unwrap();
        index
    };

    let reopened = open_scheduler(&dir, PosterRegistry::new(), clock, false);
    assert_eq!(reopened.index(), &live);
    assert_eq!(reopened.index().len(), 2);
    assert_eq!(
        PostLog::new(dir.path().join("posts.jsonl")).replay().unwrap(),
        live
    );
}
