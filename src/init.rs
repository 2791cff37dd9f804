//! Workspace initialization for `trendpost init`
//!
//! Writes a canonical default `config/config.toml` and creates the state directory.
//! Existing files are left alone unless `force` is set.

use crate::config::paths::workspace_config_path;
use crate::config::AppConfig;
use crate::error::ApiError;
use std::path::Path;

/// Result of initialization operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitResult {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

/// Preview of what would be initialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitPreview {
    pub config_file: String,
    pub config_exists: bool,
    pub state_dirs: Vec<String>,
}

/// Initialize a workspace with the default configuration.
pub fn initialize(workspace_root: &Path, force: bool) -> Result<InitResult, ApiError> {
    let config = AppConfig::default();
    let mut result = InitResult::default();

    let config_path = workspace_config_path(workspace_root);
    if config_path.exists() && !force {
        result.skipped.push(config_path.display().to_string());
    } else {
        let rendered = config.to_toml()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        match std::fs::write(&config_path, rendered) {
            Ok(()) => result.created.push(config_path.display().to_string()),
            Err(e) => result.errors.push(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            )),
        }
    }

    for dir in state_dirs(&config, workspace_root) {
        if dir.exists() {
            result.skipped.push(dir.display().to_string());
            continue;
        }
        match std::fs::create_dir_all(&dir) {
            Ok(()) => result.created.push(dir.display().to_string()),
            Err(e) => result.errors.push(format!(
                "Failed to create state directory {}: {}",
                dir.display(),
                e
            )),
        }
    }

    Ok(result)
}

/// What `initialize` would do, without touching disk.
pub fn preview(workspace_root: &Path) -> InitPreview {
    let config = AppConfig::default();
    let config_path = workspace_config_path(workspace_root);
    InitPreview {
        config_file: config_path.display().to_string(),
        config_exists: config_path.exists(),
        state_dirs: state_dirs(&config, workspace_root)
            .into_iter()
            .map(|d| d.display().to_string())
            .collect(),
    }
}

fn state_dirs(config: &AppConfig, workspace_root: &Path) -> Vec<std::path::PathBuf> {
    let mut dirs: Vec<_> = [
        config.lens_state_path(workspace_root),
        config.post_log_path(workspace_root),
    ]
    .iter()
    .filter_map(|p| p.parent().map(Path::to_path_buf))
    .collect();
    dirs.dedup();
    dirs
}
