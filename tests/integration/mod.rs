//! Integration tests for trendpost planning and scheduling

mod test_utils;
pub use test_utils::*;

mod cli_commands;
mod init_command;
mod lens_rotation;
mod planning;
mod post_log_recovery;
mod scheduling;
