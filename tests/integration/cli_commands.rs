//! Integration tests for CLI routing through RunContext

use chrono::Duration;
use clap::Parser;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use trendpost::cli::{exit_code, Cli, RunContext, EXIT_VALIDATION};
use trendpost::clock::FixedClock;
use trendpost::config::AppConfig;
use trendpost::error::ApiError;

use crate::integration::{manual_clock, morning, registry_with, RecordingPoster};

fn context(dir: &TempDir, poster: Arc<RecordingPoster>) -> RunContext {
    RunContext::with_config(dir.path().to_path_buf(), AppConfig::default())
        .with_clock(Arc::new(FixedClock(morning())))
        .with_posters(registry_with(poster))
}

fn run(ctx: &RunContext, args: &[&str]) -> Result<String, ApiError> {
    let cli = Cli::try_parse_from(std::iter::once("trendpost").chain(args.iter().copied()))
        .expect("arguments should parse");
    ctx.execute(&cli.command)
}

fn json(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be JSON")
}

#[test]
fn test_schedule_then_repeat() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, Arc::new(RecordingPoster::new()));

    let first = run(&ctx, &["schedule", "--platform", "twitter", "--text", "hello"]).unwrap();
    assert!(first.contains("Scheduled on twitter"));
    assert!(first.contains("2026-01-08 08:15 EST"));

    let again = run(&ctx, &["schedule", "--platform", "twitter", "--text", "hello"]).unwrap();
    assert!(again.contains("Already scheduled"));
}

#[test]
fn test_schedule_json_output() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, Arc::new(RecordingPoster::new()));

    let out = run(
        &ctx,
        &[
            "schedule",
            "--platform",
            "linkedin",
            "--text",
            "structured",
            "--hashtag",
            "#Ops",
            "--format",
            "json",
        ],
    )
    .unwrap();
    let value = json(&out);

    assert_eq!(value["status"], "scheduled");
    assert_eq!(value["post"]["target_date"], "2026-01-08");
    assert_eq!(value["post"]["state"], "scheduled");
    assert_eq!(value["post"]["content"]["hashtags"][0], "Ops");
}

#[test]
fn test_validation_failures_exit_two() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, Arc::new(RecordingPoster::new()));

    let unsupported = run(&ctx, &["schedule", "--platform", "myspace", "--text", "hi"]).unwrap_err();
    assert_eq!(exit_code(&unsupported), EXIT_VALIDATION);

    let long = "x".repeat(281);
    let too_long = run(&ctx, &["schedule", "--platform", "twitter", "--text", &long]).unwrap_err();
    assert_eq!(exit_code(&too_long), EXIT_VALIDATION);

    let no_trends = run(&ctx, &["plan"]).unwrap_err();
    assert_eq!(exit_code(&no_trends), EXIT_VALIDATION);
    assert!(!dir.path().join(".trendpost/content_state.json").exists());
    assert!(!dir.path().join(".trendpost/posts.jsonl").exists());
}

#[test]
fn test_schedule_multi_partial_failure() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, Arc::new(RecordingPoster::new()));
    let long = format!("twitter={}", "y".repeat(300));

    let out = run(
        &ctx,
        &[
            "schedule-multi",
            "--platform",
            "twitter,linkedin",
            "--text",
            "fits everywhere but twitter gets an override",
            "--text-for",
            &long,
            "--format",
            "json",
        ],
    )
    .unwrap();
    let value = json(&out);

    assert_eq!(value["all_succeeded"], false);
    assert_eq!(value["results"][0]["platform"], "twitter");
    assert_eq!(value["results"][0]["ok"], false);
    assert_eq!(value["results"][0]["validation"], true);
    assert_eq!(value["results"][1]["ok"], true);
}

#[test]
fn test_plan_advances_lens_status() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, Arc::new(RecordingPoster::new()));

    let plan = json(
        &run(
            &ctx,
            &[
                "plan",
                "--trend",
                "Servicers extend forbearance",
                "--domain",
                "Foreclosures",
                "--format",
                "json",
            ],
        )
        .unwrap(),
    );
    assert_eq!(plan["lens"], "What Everyone Gets Wrong");
    assert_eq!(plan["post_type"], "Correction");
    assert_eq!(plan["hashtags"].as_array().unwrap().len(), 4);

    let status = json(&run(&ctx, &["lens", "status", "--format", "json"]).unwrap());
    assert_eq!(status["cursor"], 0);
    assert_eq!(status["next"], "The Real Constraint");

    let history = json(&run(&ctx, &["lens", "history", "--format", "json"]).unwrap());
    assert_eq!(history["total"], 1);
    assert_eq!(history["history"][0]["domain"], "Foreclosures");
}

#[test]
fn test_run_plans_once_and_schedules_each_platform() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, Arc::new(RecordingPoster::new()));

    let out = json(
        &run(
            &ctx,
            &[
                "run",
                "--trend",
                "Memory care pricing",
                "--domain",
                "Assisted Living",
                "--platform",
                "twitter,linkedin",
                "--format",
                "json",
            ],
        )
        .unwrap(),
    );
    assert_eq!(out["plan"]["domain"], "Assisted Living");
    assert_eq!(out["schedule"]["all_succeeded"], true);

    let status = json(&run(&ctx, &["lens", "status", "--format", "json"]).unwrap());
    assert_eq!(status["history_len"], 1);

    let history = json(&run(&ctx, &["history", "--format", "json"]).unwrap());
    assert_eq!(history["total"], 2);
}

#[test]
fn test_execute_due_posts_arrived_slots() {
    let dir = TempDir::new().unwrap();
    let poster = Arc::new(RecordingPoster::new());
    let clock = manual_clock();
    let ctx = RunContext::with_config(dir.path().to_path_buf(), AppConfig::default())
        .with_clock(clock.clone())
        .with_posters(registry_with(poster.clone()));

    run(&ctx, &["schedule", "--platform", "facebook", "--text", "due soon"]).unwrap();
    let early = json(&run(&ctx, &["execute", "--due", "--format", "json"]).unwrap());
    assert_eq!(early["total"], 0);

    clock.advance(Duration::hours(4));
    let executed = json(&run(&ctx, &["execute", "--due", "--format", "json"]).unwrap());
    assert_eq!(executed["total"], 1);
    assert_eq!(executed["posts"][0]["state"], "posted");
    assert_eq!(poster.calls().len(), 1);

    let posted = json(&run(&ctx, &["history", "--state", "posted", "--format", "json"]).unwrap());
    assert_eq!(posted["total"], 1);
}

#[test]
fn test_cancel_by_prefix_frees_slot() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, Arc::new(RecordingPoster::new()));

    let scheduled = json(
        &run(
            &ctx,
            &["schedule", "--platform", "twitter", "--text", "never mind", "--format", "json"],
        )
        .unwrap(),
    );
    let fingerprint = scheduled["post"]["fingerprint"].as_str().unwrap().to_string();

    let before = json(&run(&ctx, &["slots", "--platform", "twitter", "--count", "1", "--format", "json"]).unwrap());
    assert_eq!(before["slots"][0]["date"], "2026-01-09");

    let out = run(&ctx, &["cancel", &fingerprint[..10]]).unwrap();
    assert!(out.starts_with("Cancelled."));

    let after = json(&run(&ctx, &["slots", "--platform", "twitter", "--count", "2", "--format", "json"]).unwrap());
    assert_eq!(after["slots"][0]["date"], "2026-01-08");
    assert_eq!(after["slots"][1]["date"], "2026-01-09");

    let err = run(&ctx, &["cancel", &fingerprint]).unwrap_err();
    assert!(matches!(err, ApiError::PostNotFound(_)));
}

#[test]
fn test_skeleton_lookup() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, Arc::new(RecordingPoster::new()));

    let listing = run(&ctx, &["skeleton"]).unwrap();
    assert!(listing.contains("Trading Futures"));

    let care = json(&run(&ctx, &["skeleton", "assisted living", "--format", "json"]).unwrap());
    assert_eq!(care["domain"], "Assisted Living");
    assert_eq!(care["human_roles"].as_array().unwrap().len(), 3);
}
