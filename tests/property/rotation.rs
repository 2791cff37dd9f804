//! Property-based tests for lens rotation

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use trendpost::clock::FixedClock;
use trendpost::lens::{LensRotationEngine, HISTORY_LIMIT, LENS_CYCLE};

fn open(dir: &TempDir) -> LensRotationEngine {
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()));
    LensRotationEngine::open(dir.path().join("content_state.json"), clock).unwrap()
}

/// Any window of eight consecutive rotations covers the whole cycle, and history
/// never exceeds its cap.
#[test]
fn test_rotation_windows_are_distinct() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(24));

    runner
        .run(&(8usize..48), |rotations| {
            let dir = TempDir::new().unwrap();
            let mut engine = open(&dir);
            let mut indices = Vec::with_capacity(rotations);
            for _ in 0..rotations {
                indices.push(engine.next_lens(&[]).unwrap().index);
            }

            for window in indices.windows(LENS_CYCLE.len()) {
                let distinct: HashSet<_> = window.iter().collect();
                prop_assert_eq!(distinct.len(), LENS_CYCLE.len());
            }
            prop_assert_eq!(engine.state().history().len(), rotations.min(HISTORY_LIMIT));
            prop_assert_eq!(engine.state().cursor(), Some((rotations - 1) % LENS_CYCLE.len()));
            Ok(())
        })
        .unwrap();
}

/// A reopened engine continues exactly where the previous one stopped.
#[test]
fn test_reopen_preserves_position() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(24));

    runner
        .run(&(0usize..30, 1usize..10), |(before, after)| {
            let dir = TempDir::new().unwrap();
            let mut continuous = Vec::new();
            {
                let mut engine = open(&dir);
                for _ in 0..before {
                    continuous.push(engine.next_lens(&[]).unwrap().index);
                }
            }
            let mut engine = open(&dir);
            for _ in 0..after {
                continuous.push(engine.next_lens(&[]).unwrap().index);
            }

            let expected: Vec<usize> = (0..before + after).map(|i| i % LENS_CYCLE.len()).collect();
            prop_assert_eq!(continuous, expected);
            Ok(())
        })
        .unwrap();
}
