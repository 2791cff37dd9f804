//! Init command presentation: preview and summary formatters.

use crate::init::{InitPreview, InitResult};

pub fn format_init_preview(preview: &InitPreview) -> String {
    let mut output = String::from("Initialization Preview:\n\n");

    if preview.config_exists {
        output.push_str(&format!(
            "Config file already exists: {}\n",
            preview.config_file
        ));
    } else {
        output.push_str(&format!("Would create config: {}\n", preview.config_file));
    }

    if !preview.state_dirs.is_empty() {
        output.push_str("\nState directories:\n");
        for dir in &preview.state_dirs {
            output.push_str(&format!("  - {}\n", dir));
        }
    }

    if preview.config_exists {
        output.push_str("\nUse 'trendpost init --force' to overwrite the config.\n");
    } else {
        output.push_str("\nRun 'trendpost init' to perform initialization.\n");
    }
    output
}

pub fn format_init_summary(result: &InitResult, force: bool) -> String {
    let mut output = String::from("Initializing trendpost workspace...\n\n");

    for created in &result.created {
        if force {
            output.push_str(&format!("  ✓ {} (overwritten)\n", created));
        } else {
            output.push_str(&format!("  ✓ {}\n", created));
        }
    }
    for skipped in &result.skipped {
        output.push_str(&format!("  ⊘ {} (already exists, skipped)\n", skipped));
    }

    if !result.errors.is_empty() {
        output.push_str("\nErrors:\n");
        for error in &result.errors {
            output.push_str(&format!("  ✗ {}\n", error));
        }
    }

    output.push('\n');
    if result.created.is_empty() && !force {
        output.push_str("Workspace already initialized. Use --force to re-initialize.\n");
    } else {
        output.push_str("Initialization complete! You can now use:\n");
        output.push_str("  - trendpost plan --trend <title> --domain <domain>\n");
        output.push_str("  - trendpost schedule --platform <platform> --text <text>\n");
        output.push_str("  - trendpost slots --platform <platform>\n");
    }
    output
}
