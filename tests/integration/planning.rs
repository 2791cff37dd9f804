//! Integration tests for the plan, draft, schedule pipeline

use std::sync::Arc;
use tempfile::TempDir;
use trendpost::clock::FixedClock;
use trendpost::generation::{ContentGenerator, DraftGenerator};
use trendpost::lens::{Lens, LensRotationEngine};
use trendpost::plan::{load_candidates, validate, ContentPlanner, HASHTAG_COUNT};
use trendpost::schedule::{PostContent, PosterRegistry, ScheduleStatus};
use trendpost::skeleton::{self, Domain};
use trendpost::types::Platform;

use crate::integration::{morning, open_scheduler};

fn engine(dir: &TempDir) -> LensRotationEngine {
    LensRotationEngine::open(
        dir.path().join("content_state.json"),
        Arc::new(FixedClock(morning())),
    )
    .unwrap()
}

#[test]
fn test_candidates_file_accepts_feed_field_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trends.json");
    std::fs::write(
        &path,
        r##"[
            {"title": "Loan modification backlog", "category": "Foreclosures", "relevance": 0.4},
            {"trend": "Memory care waitlists", "domain": "Assisted Living", "score": 0.8,
             "hashtags": ["#SeniorCare", "Caregiving", "Families", "Planning"]}
        ]"##,
    )
    .unwrap();

    let candidates = load_candidates(&path).unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].trend, "Loan modification backlog");
    assert_eq!(candidates[0].domain.as_deref(), Some("Foreclosures"));

    let mut engine = engine(&dir);
    let plan = ContentPlanner::new(&mut engine)
        .plan(&candidates, Some(Platform::LinkedIn), None)
        .unwrap();

    // Neither domain has been used, so the first in input order is preferred.
    assert_eq!(plan.domain(), "Foreclosures");
    assert_eq!(plan.trend(), "Loan modification backlog");
    assert_eq!(plan.decision(), skeleton::resolve("Foreclosures").decision);
    assert_eq!(plan.hashtags().len(), HASHTAG_COUNT);
    assert!(validate(&plan).is_ok());
}

#[test]
fn test_unknown_domain_uses_general_skeleton() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine(&dir);
    let candidates = vec![trendpost::plan::TrendCandidate::new("Warehouse robotics")
        .with_domain("Logistics")];

    let plan = ContentPlanner::new(&mut engine)
        .plan(&candidates, None, None)
        .unwrap();

    assert_eq!(plan.domain(), "Logistics");
    assert_eq!(plan.decision(), Domain::General.skeleton().decision);
    assert_eq!(plan.lens(), Lens::EveryoneGetsWrong);
}

#[tokio::test]
async fn test_drafts_fit_every_platform_and_schedule() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine(&dir);
    let candidates = vec![trendpost::plan::TrendCandidate::new(
        "Prop firms tighten daily drawdown rules",
    )
    .with_domain("Trading Futures")];
    let plan = ContentPlanner::new(&mut engine)
        .plan(&candidates, None, None)
        .unwrap();

    let mut scheduler = open_scheduler(
        &dir,
        PosterRegistry::new(),
        Arc::new(FixedClock(morning())),
        false,
    );
    let generator = DraftGenerator;
    for platform in Platform::ALL {
        let generated = generator
            .generate(&plan.with_platform(platform))
            .await
            .unwrap();
        let content = PostContent::from(generated);
        assert!(content.text.chars().count() <= platform.max_text_len());
        assert!(content.text.contains("#FuturesTrading"));

        let outcome = scheduler.schedule_post(&content, platform).unwrap();
        assert_eq!(outcome.status, ScheduleStatus::Scheduled);
    }
    assert_eq!(scheduler.index().len(), Platform::ALL.len());
}
