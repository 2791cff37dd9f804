//! Property-based tests for slot assignment and log replay

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use trendpost::clock::FixedClock;
use trendpost::schedule::{
    compute_fingerprint, PostContent, PostLog, PostScheduler, PosterRegistry, SchedulerOptions,
    SlotPolicy,
};
use trendpost::types::Platform;

fn platform_strategy() -> impl Strategy<Value = Platform> {
    prop::sample::select(Platform::ALL.to_vec())
}

fn open(dir: &TempDir) -> PostScheduler {
    PostScheduler::open(
        dir.path().join("posts.jsonl"),
        SlotPolicy::default(),
        PosterRegistry::new(),
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 8, 11, 0, 0).unwrap())),
        SchedulerOptions::default(),
    )
    .unwrap()
}

/// Distinct posts on one platform occupy consecutive days with no collisions, and
/// replaying the log reproduces the live index.
#[test]
fn test_slots_are_consecutive_and_replay_matches() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(32));

    runner
        .run(
            &prop::collection::vec((platform_strategy(), "[a-z]{1,12}"), 1..12),
            |requests| {
                let dir = TempDir::new().unwrap();
                let mut scheduler = open(&dir);
                let mut seen = HashSet::new();

                for (platform, text) in &requests {
                    let content = PostContent::new(text.clone());
                    let outcome = scheduler.schedule_post(&content, *platform).unwrap();
                    seen.insert((*platform, text.clone()));
                    prop_assert!(outcome.post.scheduled_at >= Utc.with_ymd_and_hms(2026, 1, 8, 13, 15, 0).unwrap());
                }

                for platform in Platform::ALL {
                    let mut dates: Vec<NaiveDate> = scheduler
                        .index()
                        .iter()
                        .filter(|p| p.platform == platform)
                        .map(|p| p.target_date)
                        .collect();
                    dates.sort();
                    let start = NaiveDate::from_ymd_opt(2026, 1, 8).unwrap();
                    let expected: Vec<NaiveDate> =
                        (0..dates.len()).map(|i| start + Duration::days(i as i64)).collect();
                    prop_assert_eq!(dates, expected);
                }
                prop_assert_eq!(scheduler.index().len(), seen.len());

                let replayed = PostLog::new(dir.path().join("posts.jsonl")).replay().unwrap();
                prop_assert_eq!(&replayed, scheduler.index());
                Ok(())
            },
        )
        .unwrap();
}

/// Fingerprints depend only on their inputs; the attempt number separates retries.
#[test]
fn test_fingerprint_is_a_function_of_inputs() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(any::<String>(), platform_strategy(), 0i64..3650, 0u32..4),
            |(text, platform, offset, attempt)| {
                let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset);
                let content = PostContent::new(text);

                let a = compute_fingerprint(&content, platform, date, attempt);
                let b = compute_fingerprint(&content, platform, date, attempt);
                let retry = compute_fingerprint(&content, platform, date, attempt + 1);

                prop_assert_eq!(&a, &b);
                prop_assert_ne!(&a, &retry);
                prop_assert_eq!(a.as_str().len(), 64);
                Ok(())
            },
        )
        .unwrap();
}
