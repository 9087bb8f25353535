use std::path::Path;

use topo_config::TopoConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    project_root: &Path,
    config: &TopoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Publish(args) => commands::publish::handle(&args, project_root, config, flags).await,
        Commands::Snapshot(args) => {
            commands::snapshot::handle(&args, project_root, config, flags).await
        }
        Commands::Render(args) => commands::render::handle(&args, project_root, config, flags),
        Commands::Diff(args) => commands::diff::handle(&args, project_root, config, flags).await,
        Commands::Comment(args) => commands::comment::handle(&args, project_root, config, flags).await,
        Commands::Check(args) => commands::check::handle(&args, project_root, config, flags),
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
