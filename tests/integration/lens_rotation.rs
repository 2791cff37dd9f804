//! Integration tests for lens rotation persistence and domain choice

use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use trendpost::clock::FixedClock;
use trendpost::lens::{Lens, LensRotationEngine, HISTORY_LIMIT, LENS_CYCLE};

use crate::integration::morning;

fn open(dir: &TempDir) -> LensRotationEngine {
    LensRotationEngine::open(
        dir.path().join("content_state.json"),
        Arc::new(FixedClock(morning())),
    )
    .unwrap()
}

#[test]
fn test_eight_rotations_visit_every_lens_then_wrap() {
    let dir = TempDir::new().unwrap();
    let mut engine = open(&dir);

    let lenses: Vec<Lens> = (0..9)
        .map(|_| engine.next_lens(&[]).unwrap().lens)
        .collect();

    let distinct: HashSet<_> = lenses[..8].iter().collect();
    assert_eq!(distinct.len(), 8);
    assert_eq!(lenses[..8], LENS_CYCLE[..]);
    assert_eq!(lenses[8], Lens::EveryoneGetsWrong);
}

#[test]
fn test_rotation_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = open(&dir);
        engine.next_lens(&[]).unwrap();
        engine.next_lens(&[]).unwrap();
    }

    let mut engine = open(&dir);
    assert_eq!(engine.current(), Some(Lens::RealConstraint));
    assert_eq!(engine.next_lens(&[]).unwrap().lens, Lens::InPractice);
}

#[test]
fn test_history_is_capped() {
    let dir = TempDir::new().unwrap();
    let mut engine = open(&dir);
    for _ in 0..(HISTORY_LIMIT + 5) {
        engine.next_lens(&[]).unwrap();
    }

    let reopened = open(&dir);
    assert_eq!(reopened.state().history().len(), HISTORY_LIMIT);
    assert_eq!(reopened.state().cursor(), Some((HISTORY_LIMIT + 4) % 8));
}

#[test]
fn test_least_recently_used_domain_wins() {
    let dir = TempDir::new().unwrap();
    let mut engine = open(&dir);
    let candidates = vec!["Foreclosures".to_string(), "Assisted Living".to_string()];

    let first = engine.next_lens(&candidates).unwrap();
    let second = engine.next_lens(&candidates).unwrap();
    let third = engine.next_lens(&candidates).unwrap();

    assert_eq!(first.domain.as_deref(), Some("Foreclosures"));
    assert_eq!(second.domain.as_deref(), Some("Assisted Living"));
    assert_eq!(third.domain.as_deref(), Some("Foreclosures"));
}

#[test]
fn test_corrupt_state_resets_rotation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("content_state.json");

    std::fs::write(&path, "{not json").unwrap();
    assert_eq!(open(&dir).state().cursor(), None);

    std::fs::write(&path, r#"{"cursor": 12, "history": []}"#).unwrap();
    let mut engine = open(&dir);
    assert_eq!(engine.state().cursor(), None);
    assert_eq!(engine.next_lens(&[]).unwrap().index, 0);
}

#[test]
fn test_legacy_cursor_key_is_read() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("content_state.json"),
        r#"{"lens_i": 3, "history": []}"#,
    )
    .unwrap();

    let mut engine = open(&dir);
    assert_eq!(engine.current(), Some(Lens::BreaksAtScale));
    assert_eq!(engine.next_lens(&[]).unwrap().lens, Lens::HiddenTradeoff);
}
