//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, is_mutating};
pub use output::{exit_code, map_error, EXIT_FAILURE, EXIT_OK, EXIT_VALIDATION};
pub use parse::{Cli, Commands, ContentArgs, LensCommands, TrendArgs};
pub use presentation::format_section_heading;
pub use route::RunContext;
