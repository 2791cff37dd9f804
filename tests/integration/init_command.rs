//! Integration tests for the init command

use std::fs;
use tempfile::TempDir;
use trendpost::cli::RunContext;
use trendpost::config::paths::workspace_config_path;
use trendpost::config::AppConfig;
use trendpost::init;

use crate::integration::with_xdg_env;

#[test]
fn test_init_then_load_context() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let result = init::initialize(workspace.path(), false).unwrap();
        assert!(result.errors.is_empty());
        assert!(workspace_config_path(workspace.path()).exists());
        assert!(workspace.path().join(".trendpost").is_dir());

        let ctx = RunContext::new(workspace.path().to_path_buf(), None).unwrap();
        assert_eq!(ctx.config(), &AppConfig::default());
    });
}

#[test]
fn test_init_idempotent_and_force() {
    let workspace = TempDir::new().unwrap();

    let first = init::initialize(workspace.path(), false).unwrap();
    assert_eq!(first.created.len(), 2);

    let second = init::initialize(workspace.path(), false).unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.skipped.len(), 2);

    let config_path = workspace_config_path(workspace.path());
    fs::write(&config_path, "[schedule]\npost_hour = 6\n").unwrap();
    let forced = init::initialize(workspace.path(), true).unwrap();
    assert_eq!(forced.created.len(), 1);
    assert!(fs::read_to_string(&config_path)
        .unwrap()
        .contains("post_hour = 8"));
}

#[test]
fn test_init_list_previews_without_writing() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let ctx = RunContext::with_config(workspace.path().to_path_buf(), AppConfig::default());
        let cli = <trendpost::cli::Cli as clap::Parser>::try_parse_from(["trendpost", "init", "--list"])
            .unwrap();

        let out = ctx.execute(&cli.command).unwrap();
        assert!(out.contains("Would create config"));
        assert!(!workspace_config_path(workspace.path()).exists());
    });
}
