use std::path::PathBuf;

use clap::{ArgGroup, Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Extract the graph, write its snapshot and patch the document diagram.
    Publish(PublishArgs),
    /// Extract the graph and write (or verify) its snapshot only.
    Snapshot(SnapshotArgs),
    /// Print the Mermaid diagram of a snapshot file.
    Render(RenderArgs),
    /// Compare application graph snapshots between two revisions.
    Diff(DiffArgs),
    /// Create or update the review report comment on a pull request.
    Comment(CommentArgs),
    /// Fail when a definition changed without its snapshot.
    Check(CheckArgs),
    /// Print a registered JSON Schema, or list the registered names.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct PublishArgs {
    /// Definition file (e.g. `apps/shop/app.bicep`).
    pub definition: PathBuf,

    /// Document to patch, relative to the repository root.
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Heading of the section owned by the diagram.
    #[arg(long)]
    pub section: Option<String>,

    /// Scan the definition file instead of running the configured extractor.
    #[arg(long)]
    pub direct: bool,

    /// Write nothing; fail if the snapshot or the document is out of date.
    #[arg(long)]
    pub check: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SnapshotArgs {
    /// Definition file (e.g. `apps/shop/app.bicep`).
    pub definition: PathBuf,

    /// Scan the definition file instead of running the configured extractor.
    #[arg(long)]
    pub direct: bool,

    /// Write nothing; fail if the snapshot is out of date.
    #[arg(long)]
    pub check: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RenderArgs {
    /// Snapshot file to render.
    pub snapshot: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct DiffArgs {
    /// Base revision (e.g. `origin/main`).
    #[arg(long)]
    pub base: String,

    /// Head revision.
    #[arg(long, default_value = "HEAD")]
    pub head: String,

    /// Snapshot paths to compare. Defaults to every snapshot present in
    /// either revision.
    #[arg(long = "graph", value_name = "PATH")]
    pub graphs: Vec<String>,

    /// Also write the Markdown report to this file.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct CommentArgs {
    /// Pull request number.
    #[arg(long)]
    pub pr: u64,

    /// File holding the report body (e.g. the output of `topo diff`).
    #[arg(long)]
    pub body_file: PathBuf,

    /// Publish to an in-memory thread and print the result instead.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, Args)]
#[command(group(
    ArgGroup::new("changes")
        .required(true)
        .args(["base", "staged", "changed"])
))]
pub struct CheckArgs {
    /// Base revision of the change set.
    #[arg(long, requires = "head")]
    pub base: Option<String>,

    /// Head revision of the change set.
    #[arg(long, requires = "base")]
    pub head: Option<String>,

    /// Check the staged changes.
    #[arg(long)]
    pub staged: bool,

    /// Check an explicit list of changed paths.
    #[arg(long, num_args = 1..)]
    pub changed: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name (e.g. `graph_snapshot`). Lists the names when omitted.
    pub name: Option<String>,
}
