//! CLI presentation: text and json formatters per command family.

mod init;
mod lens;
mod plan;
mod schedule;
mod shared;

pub use init::{format_init_preview, format_init_summary};
pub use lens::{
    format_lens_cycle_json, format_lens_cycle_text, format_lens_history_json,
    format_lens_history_text, format_lens_status_json, format_lens_status_text,
};
pub use plan::{
    format_domain_list_json, format_domain_list_text, format_plan_json, format_plan_text,
    format_run_json, format_run_text, format_skeleton_json, format_skeleton_text,
};
pub use schedule::{
    format_multi_report_json, format_multi_report_text, format_post_json, format_post_text,
    format_posts_json, format_posts_text, format_schedule_outcome_json,
    format_schedule_outcome_text, format_slots_json, format_slots_text,
};
pub use shared::format_section_heading;
