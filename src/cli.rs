//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// notepub - mirror a note account and publish it as a static site
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: notepub.toml)
    #[arg(short = 'C', long, default_value = "notepub.toml")]
    pub config: PathBuf,

    /// Data directory holding the local mirror (relative to project root)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Output directory for the rendered site (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Retrieve and organize the latest notes from the remote account
    Collect {
        /// Notebook name (or name fragment, matched case-insensitively)
        collection: String,
    },

    /// Rebuild the full static site from the local mirror
    Rebuild,

    /// Regenerate only the tag index pages
    RebuildIndices,

    /// Collect followed by a full rebuild
    Refresh {
        /// Notebook name (or name fragment, matched case-insensitively)
        collection: String,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_collect(&self) -> bool {
        matches!(self.command, Commands::Collect { .. })
    }
    pub const fn is_rebuild(&self) -> bool {
        matches!(self.command, Commands::Rebuild)
    }
    pub const fn is_rebuild_indices(&self) -> bool {
        matches!(self.command, Commands::RebuildIndices)
    }
    pub const fn is_refresh(&self) -> bool {
        matches!(self.command, Commands::Refresh { .. })
    }
}
