use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_manager::cli::Cli;
use task_manager::cmd::*;
use task_manager::store::TaskStore;
use task_manager::Result;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let seed = cli.seed_source();
    let command = cli.command.unwrap_or_default();
    let interactive = matches!(command, Commands::Ui { .. });

    init_logging(cli.log_file.as_deref(), interactive)?;

    // Completions don't need a store
    if let Commands::Completions { shell } = command {
        cmd_completions(shell);
        return Ok(());
    }

    let store = TaskStore::with_tasks(seed.load()?)?;

    match command {
        Commands::Ui { filter, sort, completion_delay_ms } => cmd_ui(store, filter, sort, completion_delay_ms),
        Commands::List { filter, sort, json } => cmd_list(&store, filter, sort, json),
        Commands::Stats { json } => cmd_stats(&store, json),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}

/// Route logs to `log_file` when given. Otherwise CLI commands log warnings
/// to stderr and the TUI logs nothing, since stderr would tear the screen.
fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "task_manager=info".into()),
                )
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .init();
        }
        None if !interactive => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "task_manager=warn".into()),
                )
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None => {}
    }
    Ok(())
}
