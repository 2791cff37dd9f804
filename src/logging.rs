//! Logging System
//!
//! Structured logging on top of `tracing`. Level, format and destination come from the
//! `[logging]` config section, overridden by `TRENDPOST_LOG*` environment variables and
//! then by CLI flags.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

pub const ENV_FILTER: &str = "TRENDPOST_LOG";
pub const ENV_FORMAT: &str = "TRENDPOST_LOG_FORMAT";
pub const ENV_OUTPUT: &str = "TRENDPOST_LOG_OUTPUT";
pub const ENV_MODULES: &str = "TRENDPOST_LOG_MODULES";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable to install no subscriber at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (when output includes "file")
    #[serde(default = "default_log_file")]
    pub file: PathBuf,

    /// Colored text on terminals
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `trendpost::schedule = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

// stdout carries command output (tables, JSON)
fn default_output() -> String {
    "stderr".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from(".trendpost/trendpost.log")
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: default_log_file(),
            color: true,
            modules: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global subscriber.
///
/// Priority (highest first): environment variables, then `config`, then defaults. CLI
/// flags are folded into `config` by the caller. Calling this twice is an error from
/// the second call on.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if output.stdout {
        layers.push(make_layer(format, config.color, std::io::stdout));
    }
    if output.stderr {
        layers.push(make_layer(format, config.color, std::io::stderr));
    }
    if output.file {
        let file = open_log_file(config)?;
        layers.push(make_layer(format, false, Arc::new(file)));
    }

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| ApiError::ConfigError(format!("Failed to initialize logging: {}", e)))
}

fn make_layer<W>(format: LogFormat, color: bool, writer: W) -> BoxedLayer
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(color)
            .with_writer(writer)
            .boxed(),
    }
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, ApiError> {
    if let Some(parent) = config.file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::ConfigError(format!("Failed to create log directory: {}", e))
            })?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {:?}: {}", config.file, e))
        })
}

/// Build environment filter from `TRENDPOST_LOG` or the config level plus module overrides
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for directive in module_directives(config, std::env::var(ENV_MODULES).ok().as_deref()) {
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}

/// `module=level` directives from config, then from a `TRENDPOST_LOG_MODULES` value.
fn module_directives(config: &LoggingConfig, env_modules: Option<&str>) -> Vec<String> {
    let mut directives: Vec<String> = config
        .modules
        .iter()
        .map(|(module, level)| format!("{}={}", module, level))
        .collect();
    if let Some(spec) = env_modules {
        for part in spec.split(',') {
            if let Some((module, level)) = part.split_once('=') {
                directives.push(format!("{}={}", module.trim(), level.trim()));
            }
        }
    }
    directives
}

fn determine_format(config: &LoggingConfig) -> Result<LogFormat, ApiError> {
    let env = std::env::var(ENV_FORMAT).ok();
    parse_format(env.as_deref().unwrap_or(&config.format))
}

fn parse_format(format: &str) -> Result<LogFormat, ApiError> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ))),
    }
}

fn determine_output(config: &LoggingConfig) -> Result<OutputDestinations, ApiError> {
    let env = std::env::var(ENV_OUTPUT).ok();
    parse_output_destinations(env.as_deref().unwrap_or(&config.output))
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, ApiError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" | "both" => (false, true, true),
        _ => {
            return Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}

/// Check level, format and output without installing anything.
pub fn validate_config(config: &LoggingConfig) -> Result<(), ApiError> {
    parse_format(&config.format)?;
    parse_output_destinations(&config.output)?;
    if config.level != "off" {
        config
            .level
            .parse::<tracing_subscriber::filter::LevelFilter>()
            .map_err(|_| ApiError::ConfigError(format!("Invalid log level: {}", config.level)))?;
    }
    Ok(())
}
