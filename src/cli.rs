use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::seed::SeedSource;

/// Terminal task tracker.
/// Tasks live in memory for the length of the session; nothing is saved.
#[derive(Parser)]
#[command(name = "tm", version, about = "Terminal task tracker")]
pub struct Cli {
    /// Start from a JSON array of tasks instead of the demo set.
    #[arg(long, global = true, conflicts_with = "empty")]
    pub seed_file: Option<PathBuf>,

    /// Start with no tasks.
    #[arg(long, global = true)]
    pub empty: bool,

    /// Write logs to this file. Without it the UI runs with logging off.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Defaults to `ui`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Where the starting task list comes from.
    pub fn seed_source(&self) -> SeedSource {
        match (&self.seed_file, self.empty) {
            (Some(path), _) => SeedSource::File(path.clone()),
            (None, true) => SeedSource::Empty,
            (None, false) => SeedSource::Demo,
        }
    }
}
