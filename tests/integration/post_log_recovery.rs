//! Integration tests for post log crash recovery

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;
use trendpost::clock::FixedClock;
use trendpost::schedule::{PostContent, PostLog, PostState, PosterRegistry};
use trendpost::types::Platform;

use crate::integration::{morning, open_scheduler};

fn append_raw(dir: &TempDir, bytes: &[u8]) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(dir.path().join("posts.jsonl"))
        .unwrap();
    file.write_all(bytes).unwrap();
}

#[test]
fn test_torn_tail_is_dropped_and_log_stays_appendable() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(FixedClock(morning()));
    {
        let mut scheduler = open_scheduler(&dir, PosterRegistry::new(), clock.clone(), false);
        scheduler
            .schedule_post(&PostContent::new("before crash 1"), Platform::Twitter)
            .unwrap();
        scheduler
            .schedule_post(&PostContent::new("before crash 2"), Platform::Twitter)
            .unwrap();
        scheduler.close().unwrap();
    }
    append_raw(&dir, br#"{"kind":"snapshot","post":{"fingerprint":"ab"#);

    {
        let mut scheduler = open_scheduler(&dir, PosterRegistry::new(), clock.clone(), false);
        assert_eq!(scheduler.index().len(), 2);
        let outcome = scheduler
            .schedule_post(&PostContent::new("after crash"), Platform::Twitter)
            .unwrap();
        assert_eq!(
            outcome.post.target_date,
            chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
        );
        scheduler.close().unwrap();
    }

    let reopened = open_scheduler(&dir, PosterRegistry::new(), clock, false);
    assert_eq!(reopened.index().len(), 3);
    assert!(reopened
        .index()
        .iter()
        .all(|p| p.state == PostState::Scheduled));
}

#[test]
fn test_malformed_lines_are_skipped() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(FixedClock(morning()));
    {
        let mut scheduler = open_scheduler(&dir, PosterRegistry::new(), clock.clone(), false);
        scheduler
            .schedule_post(&PostContent::new("kept"), Platform::LinkedIn)
            .unwrap();
        scheduler.close().unwrap();
    }
    append_raw(&dir, b"not json at all\n\n{\"kind\":\"unknown\"}\n");

    let log = PostLog::new(dir.path().join("posts.jsonl"));
    let index = log.replay().unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.iter().next().unwrap().content.text, "kept");
}
