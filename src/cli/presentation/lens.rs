//! Lens command presentation: status, cycle and history.

use super::shared::{format_section_heading, table_with_header, to_pretty_json};
use crate::lens::{HistoryEntry, Lens, LensRotationEngine, LENS_CYCLE};
use serde_json::json;

pub fn format_lens_status_text(engine: &LensRotationEngine) -> String {
    let next_index = engine.state().next_index();
    let next = Lens::at(next_index);
    let mut output = format!("{}\n\n", format_section_heading("Lens Rotation"));
    match (engine.state().cursor(), engine.current()) {
        (Some(cursor), Some(current)) => output.push_str(&format!(
            "  Current: {} ({}/{})\n",
            current,
            cursor + 1,
            LENS_CYCLE.len()
        )),
        _ => output.push_str("  Current: none (rotation not started)\n"),
    }
    output.push_str(&format!(
        "  Next: {} ({}/{}), post type \"{}\"\n",
        next,
        next_index + 1,
        LENS_CYCLE.len(),
        next.post_type()
    ));
    output.push_str(&format!(
        "  History: {} entr{}\n",
        engine.state().history().len(),
        if engine.state().history().len() == 1 { "y" } else { "ies" }
    ));
    output.push_str(&format!("  State file: {}\n", engine.path().display()));
    output
}

pub fn format_lens_status_json(engine: &LensRotationEngine) -> String {
    let next = Lens::at(engine.state().next_index());
    to_pretty_json(&json!({
        "cursor": engine.state().cursor(),
        "current": engine.current(),
        "next_index": engine.state().next_index(),
        "next": next,
        "next_post_type": next.post_type(),
        "history_len": engine.state().history().len(),
        "state_path": engine.path().display().to_string(),
    }))
}

pub fn format_lens_cycle_text(current: Option<Lens>) -> String {
    let mut table = table_with_header(vec!["#", "Lens", "Post type", ""]);
    for (i, lens) in LENS_CYCLE.iter().enumerate() {
        let marker = if current == Some(*lens) { "current" } else { "" };
        table.add_row(vec![
            (i + 1).to_string(),
            lens.name().to_string(),
            lens.post_type().to_string(),
            marker.to_string(),
        ]);
    }
    format!("{}\n\n{}\n", format_section_heading("Lens Cycle"), table)
}

pub fn format_lens_cycle_json() -> String {
    let lenses: Vec<_> = LENS_CYCLE
        .iter()
        .enumerate()
        .map(|(i, lens)| {
            json!({
                "index": i,
                "lens": lens,
                "post_type": lens.post_type(),
                "workflow_focus": lens.workflow_focus(),
                "constraint_focus": lens.constraint_focus(),
            })
        })
        .collect();
    to_pretty_json(&json!({ "cycle": lenses }))
}

pub fn format_lens_history_text(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return format!(
            "{}\n\nNo rotations recorded yet.\n",
            format_section_heading("Lens History")
        );
    }
    let mut table = table_with_header(vec!["Date", "Lens", "Domain", "Trend", "Platform"]);
    for entry in entries {
        table.add_row(vec![
            entry.date.to_string(),
            entry.lens.name().to_string(),
            entry.domain.clone().unwrap_or_else(|| "-".to_string()),
            entry.trend.clone().unwrap_or_else(|| "-".to_string()),
            entry.platform.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    format!("{}\n\n{}\n", format_section_heading("Lens History"), table)
}

pub fn format_lens_history_json(entries: &[HistoryEntry]) -> String {
    to_pretty_json(&json!({ "history": entries, "total": entries.len() }))
}
