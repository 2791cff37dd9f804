//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::{Commands, LensCommands};

/// Command name string for log fields (e.g. "schedule", "lens.status").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Schedule { .. } => "schedule".to_string(),
        Commands::ScheduleMulti { .. } => "schedule_multi".to_string(),
        Commands::PostNow { .. } => "post_now".to_string(),
        Commands::Plan { .. } => "plan".to_string(),
        Commands::Lens { command } => format!("lens.{}", lens_command_name(command)),
        Commands::Skeleton { .. } => "skeleton".to_string(),
        Commands::Run { .. } => "run".to_string(),
        Commands::Execute { due: true, .. } => "execute.due".to_string(),
        Commands::Execute { .. } => "execute".to_string(),
        Commands::Cancel { .. } => "cancel".to_string(),
        Commands::History { .. } => "history".to_string(),
        Commands::Slots { .. } => "slots".to_string(),
        Commands::Init { .. } => "init".to_string(),
    }
}

pub fn lens_command_name(command: &LensCommands) -> &'static str {
    match command {
        LensCommands::Status { .. } => "status",
        LensCommands::Cycle { .. } => "cycle",
        LensCommands::History { .. } => "history",
    }
}

/// Whether the command writes rotation or post state.
pub fn is_mutating(command: &Commands) -> bool {
    match command {
        Commands::Schedule { .. }
        | Commands::ScheduleMulti { .. }
        | Commands::PostNow { .. }
        | Commands::Plan { .. }
        | Commands::Run { .. }
        | Commands::Execute { .. }
        | Commands::Cancel { .. }
        | Commands::Init { list: false, .. } => true,
        Commands::Lens { .. }
        | Commands::Skeleton { .. }
        | Commands::History { .. }
        | Commands::Slots { .. }
        | Commands::Init { list: true, .. } => false,
    }
}
