use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quiesce_core::file_tree::DisplayFilter;

#[derive(Debug, Parser)]
#[command(name = "quiesce")]
#[command(bin_name = "quiesce")]
#[command(version)]
#[command(about = "Browse a changed-file tree while background work settles")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Write logs and panic details to ~/.config/quiesce/diagnostics"
    )]
    pub diagnostics: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Print the file tree described by a manifest")]
    Tree(TreeArgs),
    #[command(about = "Count files per display filter")]
    Summary(ManifestArgs),
    #[command(about = "Open the interactive file tree browser")]
    Browse(ManifestArgs),
}

impl Command {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Browse(_))
    }
}

#[derive(Debug, Args)]
pub struct ManifestArgs {
    #[arg(help = "TOML manifest with [[file]] tables")]
    pub manifest: PathBuf,
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    #[arg(help = "TOML manifest with [[file]] tables")]
    pub manifest: PathBuf,
    #[arg(long, help = "all, unstaged, staged, tracked or conflicted")]
    pub filter: Option<DisplayFilter>,
    #[arg(long, value_name = "PATH", help = "Folder path to show collapsed (repeatable)")]
    pub collapse: Vec<String>,
    #[arg(long, help = "Show the / root row")]
    pub root: bool,
    #[arg(long, help = "Append +added/-deleted line counts")]
    pub line_changes: bool,
    #[arg(long, help = "Keep single-child folder chains as separate rows")]
    pub no_compress: bool,
}
