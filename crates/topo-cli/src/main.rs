use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;
mod output;
mod pipeline;
mod review;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("topo error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();

    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let project_root = resolve_project_root(flags.project.as_deref())?;
    let config = topo_config::TopoConfig::load_with_dotenv(&project_root)
        .context("failed to load topo configuration")?;

    commands::dispatch::dispatch(cli.command, &project_root, &config, &flags).await
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TOPO_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);
        if explicit.is_dir() {
            return std::fs::canonicalize(&explicit)
                .with_context(|| format!("invalid --project '{}'", explicit.display()));
        }
        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }

    std::env::current_dir().context("failed to read current directory")
}
