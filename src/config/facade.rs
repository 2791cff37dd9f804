//! Layered loading entry point.

use crate::config::merge::merge_policy;
use crate::config::paths;
use crate::config::sources::{global_file, workspace_file};
use crate::config::AppConfig;
use crate::error::ApiError;
use config::{Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_PREFIX: &str = "TRENDPOST";

/// Loads [`AppConfig`] from defaults, files and environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global file, then workspace files, then `TRENDPOST__*` variables
    /// (e.g. `TRENDPOST__SCHEDULE__DRY_RUN=true`).
    pub fn load(workspace_root: &Path) -> Result<AppConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Defaults plus a single explicit file.
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config: AppConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    pub fn xdg_config_path() -> Option<PathBuf> {
        paths::global_config_path()
    }
}
