//! Schedule command presentation: outcomes, posts, history and slot previews.

use super::shared::{format_local_time, format_section_heading, table_with_header, to_pretty_json};
use crate::schedule::{MultiScheduleReport, ScheduleOutcome, ScheduledPost};
use crate::types::Platform;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::json;

pub fn format_schedule_outcome_text(outcome: &ScheduleOutcome, zone: Tz) -> String {
    let post = &outcome.post;
    let mut output = format!(
        "{} {} on {}\n",
        status_marker(outcome),
        capitalize(outcome.status.as_str()),
        post.platform
    );
    output.push_str(&format!("  Fingerprint: {}\n", post.fingerprint));
    output.push_str(&format!(
        "  Slot: {} ({})\n",
        format_local_time(post.scheduled_at, zone),
        post.scheduled_at.to_rfc3339()
    ));
    output.push_str(&format!("  State: {}\n", post.state));
    output
}

pub fn format_schedule_outcome_json(outcome: &ScheduleOutcome) -> String {
    to_pretty_json(&outcome_value(outcome))
}

pub fn format_multi_report_text(report: &MultiScheduleReport, zone: Tz) -> String {
    let mut table = table_with_header(vec!["Platform", "Result", "Slot", "Fingerprint"]);
    for entry in &report.results {
        match &entry.result {
            Ok(outcome) => table.add_row(vec![
                entry.platform.clone(),
                outcome.status.as_str().to_string(),
                format_local_time(outcome.post.scheduled_at, zone),
                outcome.post.fingerprint.short().to_string(),
            ]),
            Err(e) => table.add_row(vec![
                entry.platform.clone(),
                format!("failed: {}", e),
                "-".to_string(),
                "-".to_string(),
            ]),
        };
    }
    let mut output = format!("{}\n\n{}\n", format_section_heading("Schedule"), table);
    output.push_str(&format!(
        "\nScheduled: {}  Failed: {}\n",
        report.succeeded().count(),
        report.failed().count()
    ));
    output
}

pub fn format_multi_report_json(report: &MultiScheduleReport) -> String {
    to_pretty_json(&multi_report_value(report))
}

pub(super) fn multi_report_value(report: &MultiScheduleReport) -> serde_json::Value {
    let results: Vec<_> = report
        .results
        .iter()
        .map(|entry| match &entry.result {
            Ok(outcome) => json!({
                "platform": entry.platform,
                "ok": true,
                "outcome": outcome_value(outcome),
            }),
            Err(e) => json!({
                "platform": entry.platform,
                "ok": false,
                "error": e.to_string(),
                "validation": e.is_validation(),
            }),
        })
        .collect();
    json!({
        "results": results,
        "all_succeeded": report.all_succeeded(),
    })
}

/// One post after post-now, execute or cancel.
pub fn format_post_text(post: &ScheduledPost, zone: Tz) -> String {
    let mut output = format!("Post {} on {}: {}\n", post.fingerprint.short(), post.platform, post.state);
    output.push_str(&format!("  Fingerprint: {}\n", post.fingerprint));
    output.push_str(&format!("  Slot: {}\n", format_local_time(post.scheduled_at, zone)));
    if post.dry_run {
        output.push_str("  Dry run: yes\n");
    }
    if let Some(id) = &post.remote_id {
        output.push_str(&format!("  Remote id: {}\n", id));
    }
    if let Some(error) = &post.error {
        output.push_str(&format!("  Error: {}\n", error));
    }
    output
}

pub fn format_post_json(post: &ScheduledPost) -> String {
    to_pretty_json(post)
}

pub fn format_posts_text(title: &str, posts: &[ScheduledPost], zone: Tz) -> String {
    if posts.is_empty() {
        return format!("{}\n\nNo posts found.\n", format_section_heading(title));
    }
    let mut table = table_with_header(vec!["Fingerprint", "Platform", "Slot", "State", "Text"]);
    for post in posts {
        let mut state = post.state.to_string();
        if post.dry_run {
            state.push_str(" (dry run)");
        }
        table.add_row(vec![
            post.fingerprint.short().to_string(),
            post.platform.to_string(),
            format_local_time(post.scheduled_at, zone),
            state,
            preview_text(&post.content.text, 40),
        ]);
    }
    format!(
        "{}\n\n{}\n\nTotal: {} post(s)\n",
        format_section_heading(title),
        table,
        posts.len()
    )
}

pub fn format_posts_json(posts: &[ScheduledPost]) -> String {
    to_pretty_json(&json!({ "posts": posts, "total": posts.len() }))
}

pub fn format_slots_text(
    platform: Platform,
    slots: &[(NaiveDate, DateTime<Utc>)],
    zone: Tz,
) -> String {
    let heading = format_section_heading(&format!("Next free slots for {}", platform));
    if slots.is_empty() {
        return format!("{}\n\nNo free slot within the horizon.\n", heading);
    }
    let mut table = table_with_header(vec!["Date", "Local", "UTC"]);
    for (date, at) in slots {
        table.add_row(vec![
            date.to_string(),
            format_local_time(*at, zone),
            at.to_rfc3339(),
        ]);
    }
    format!("{}\n\n{}\n", heading, table)
}

pub fn format_slots_json(platform: Platform, slots: &[(NaiveDate, DateTime<Utc>)]) -> String {
    let slots: Vec<_> = slots
        .iter()
        .map(|(date, at)| json!({ "date": date, "at": at }))
        .collect();
    to_pretty_json(&json!({ "platform": platform, "slots": slots }))
}

fn outcome_value(outcome: &ScheduleOutcome) -> serde_json::Value {
    json!({
        "status": outcome.status.as_str(),
        "post": outcome.post,
    })
}

fn status_marker(outcome: &ScheduleOutcome) -> &'static str {
    match outcome.status {
        crate::schedule::ScheduleStatus::Scheduled => "✓",
        _ => "⊘",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn preview_text(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let cut: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
