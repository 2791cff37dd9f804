//! Config file locations.

use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "trendpost";
pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_NAME_VAR: &str = "TRENDPOST_ENV";

/// `$XDG_CONFIG_HOME/trendpost/config.toml`, else `$HOME/.config/trendpost/config.toml`,
/// else the platform config directory.
pub fn global_config_path() -> Option<PathBuf> {
    let non_empty = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty());

    if let Some(xdg) = non_empty("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE));
    }
    if let Some(home) = non_empty("HOME") {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join(APP_DIR)
                .join(CONFIG_FILE),
        );
    }
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR).join(CONFIG_FILE))
}

pub fn workspace_config_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join("config")
}

pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_config_dir(workspace_root).join(CONFIG_FILE)
}
