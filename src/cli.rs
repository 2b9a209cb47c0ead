use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use repo_snapshot::exchange::ExchangeConfig;

#[derive(Parser, Debug)]
#[command(name = "repo-snapshot", about = "Export and import repository snapshots")]
pub struct Cli {
    /// Path to the git repository
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Print result records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log decisions and show progress bars
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write one commit's file tree to a ZIP archive
    Archive {
        /// Commit to export (any revision expression)
        commit: String,
        output: PathBuf,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Write a commit and its descendants on local branches to a bundle
    Bundle {
        /// Base commit (any revision expression)
        commit: String,
        output: PathBuf,
    },
    /// Fetch a bundle into remote-tracking refs and apply it if the working copy allows
    Import {
        artifact: PathBuf,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Check whether this repository has everything a bundle requires
    Verify { artifact: PathBuf },
    /// List the refs a bundle carries
    ListHeads { artifact: PathBuf },
}

#[derive(Args, Debug, Default)]
pub struct Tuning {
    /// Deflate level for archive entries
    #[arg(long)]
    pub compression_level: Option<i64>,

    /// Branch suffix to prefer for checkout after import (repeatable, most preferred first)
    #[arg(long = "prefer")]
    pub prefer: Vec<String>,
}

impl Tuning {
    pub fn apply(&self, config: &mut ExchangeConfig) {
        if let Some(level) = self.compression_level {
            config.compression_level = level;
        }
        if !self.prefer.is_empty() {
            config.branch_preference = self.prefer.clone();
        }
    }
}
