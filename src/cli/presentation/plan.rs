//! Plan, skeleton and run presentation.

use super::schedule::{format_multi_report_text, multi_report_value};
use super::shared::{format_section_heading, to_pretty_json};
use crate::plan::ContentPlan;
use crate::schedule::MultiScheduleReport;
use crate::skeleton::{self, Skeleton};
use chrono_tz::Tz;
use serde_json::json;

pub fn format_plan_text(plan: &ContentPlan) -> String {
    let mut output = format!("{}\n\n", format_section_heading("Content Plan"));
    output.push_str(&format!("  Lens: {} ({}/8)\n", plan.lens(), plan.lens().index() + 1));
    output.push_str(&format!("  Post type: {}\n", plan.post_type()));
    output.push_str(&format!("  Domain: {}\n", plan.domain()));
    output.push_str(&format!("  Trend: {}\n", plan.trend()));
    if !plan.trend_description().is_empty() {
        output.push_str(&format!("  About: {}\n", plan.trend_description()));
    }
    if let Some(platform) = plan.platform() {
        output.push_str(&format!("  Platform: {}\n", platform));
    }
    output.push_str(&format!(
        "  Hashtags: {}\n",
        plan.hashtags()
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ")
    ));

    output.push_str(&format!("\n{}\n\n", format_section_heading("Workflow")));
    output.push_str(&format!("  Decision: {}\n", plan.decision()));
    output.push_str(&format!("  Constraint: {}\n", plan.constraint()));
    output.push_str(&format!("  Risk owner: {}\n", plan.risk_owner()));
    output.push_str(&format!("  Roles: {}\n", plan.human_roles().join(", ")));
    output.push_str(&format!("  Workflow focus: {}\n", plan.workflow_focus()));
    output.push_str(&format!("  Constraint focus: {}\n", plan.constraint_focus()));

    output.push_str(&format!("\n{}\n\n", format_section_heading("Voice")));
    output.push_str(&format!("  Brand phrase: {}\n", plan.brand_phrase()));
    output.push_str(&format!("  Quiet anchor: {}\n", plan.quiet_anchor()));
    output.push_str(&format!("  Footer: {}\n", plan.footer()));
    output.push_str(&format!("  Avoid: {}\n", plan.banned_phrases().join(", ")));
    output
}

pub fn format_plan_json(plan: &ContentPlan) -> String {
    to_pretty_json(plan)
}

pub fn format_skeleton_text(skeleton: &Skeleton) -> String {
    let mut output = format!(
        "{}\n\n",
        format_section_heading(&format!("Workflow Skeleton: {}", skeleton.domain))
    );
    output.push_str(&format!("  Decision: {}\n", skeleton.decision));
    output.push_str(&format!("  Constraint: {}\n", skeleton.constraint));
    output.push_str(&format!("  Risk owner: {}\n", skeleton.risk_owner));
    output.push_str("  Roles:\n");
    for role in &skeleton.human_roles {
        output.push_str(&format!("    - {}\n", role));
    }
    output.push_str(&format!(
        "  Default hashtags: {}\n",
        skeleton.default_hashtags.join(", ")
    ));
    output
}

pub fn format_skeleton_json(skeleton: &Skeleton) -> String {
    to_pretty_json(skeleton)
}

pub fn format_domain_list_text() -> String {
    let mut output = String::from("Domains with workflow skeletons:\n");
    for domain in skeleton::available_domains() {
        output.push_str(&format!("  - {}\n", domain));
    }
    output.push_str("\nAny other domain uses the General skeleton.\n");
    output
}

pub fn format_domain_list_json() -> String {
    to_pretty_json(&json!({
        "domains": skeleton::available_domains(),
        "fallback": "General",
    }))
}

/// Plan followed by the per-platform schedule result.
pub fn format_run_text(plan: &ContentPlan, report: &MultiScheduleReport, zone: Tz) -> String {
    let mut output = format!(
        "Planned \"{}\" through lens {} ({})\n\n",
        plan.trend(),
        plan.lens(),
        plan.domain()
    );
    output.push_str(&format_multi_report_text(report, zone));
    output
}

pub fn format_run_json(plan: &ContentPlan, report: &MultiScheduleReport) -> String {
    to_pretty_json(&json!({ "plan": plan, "schedule": multi_report_value(report) }))
}
