//! Command-line argument definitions using clap derive.

use clap::{Args, Parser, Subcommand};

/// tach - enforce module boundaries in a Python project
#[derive(Parser, Debug)]
#[command(name = "tach")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run tach from your Python project, where `tach.yml` is present.")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check existing boundaries against your dependencies and package interfaces
    Check {
        /// Fail if any dependency constraint is unused
        #[arg(long)]
        exact: bool,

        #[command(flatten)]
        exclude: ExcludeArg,
    },

    /// Sync constraints with the actual dependencies in your project
    Sync {
        /// Drop all existing constraints and re-derive them
        #[arg(long)]
        prune: bool,

        #[command(flatten)]
        exclude: ExcludeArg,
    },

    /// Create a new package boundary around an existing file or folder
    Add {
        /// Path(s) of the file or directory to create a boundary around
        #[arg(value_name = "file_or_path,...", value_delimiter = ',', required = true)]
        paths: Vec<String>,

        /// Tag(s) for the new package. Defaults to its dotted module path
        #[arg(short, long, value_name = "tag,...", value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Initialize boundaries between top-level packages and write `tach.yml`
    Init {
        /// Number of child directories to search for packages
        #[arg(short, long)]
        depth: Option<usize>,

        #[command(flatten)]
        exclude: ExcludeArg,
    },

    /// Delete the existing configuration
    Clean {
        /// Do not prompt for confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ExcludeArg {
    /// Comma separated path list to exclude. tests/, ci/, etc.
    #[arg(short, long, value_name = "file_or_path,...")]
    exclude: Option<String>,
}

impl ExcludeArg {
    pub fn paths(&self) -> Vec<String> {
        self.exclude
            .as_deref()
            .map(tach_core::config::parse_exclude_list)
            .unwrap_or_default()
    }
}
