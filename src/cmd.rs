//! Command implementations for the CLI interface.
//!
//! `list` and `stats` print the derived views of the seeded store; `ui`
//! hands the store to an interactive session.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::display::{render_stats, render_table};
use crate::error::Result;
use crate::fields::{SortKey, StatusFilter};
use crate::store::TaskStore;
use crate::tui::run::run_tui;
use crate::tui::session::{Session, SessionConfig, DEFAULT_COMPLETION_DELAY};
use crate::view::{compute_stats, derive_view};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (the default).
    Ui {
        /// Initial status filter.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
        /// Initial sort order.
        #[arg(long, value_enum, default_value_t = SortKey::Created)]
        sort: SortKey,
        /// Milliseconds between pressing complete and the task completing. 0 applies at once.
        #[arg(long, default_value_t = DEFAULT_COMPLETION_DELAY.as_millis() as u64)]
        completion_delay_ms: u64,
    },

    /// Print tasks as a table.
    List {
        /// Status filter: all | todo | in-progress | completed.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
        /// Sort key: created | priority | status.
        #[arg(long, value_enum, default_value_t = SortKey::Created)]
        sort: SortKey,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print task statistics.
    Stats {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Ui {
            filter: StatusFilter::All,
            sort: SortKey::Created,
            completion_delay_ms: DEFAULT_COMPLETION_DELAY.as_millis() as u64,
        }
    }
}

/// Launch the terminal user interface.
pub fn cmd_ui(store: TaskStore, filter: StatusFilter, sort: SortKey, completion_delay_ms: u64) -> Result<()> {
    let config = SessionConfig {
        filter,
        sort,
        completion_delay: Duration::from_millis(completion_delay_ms),
    };
    run_tui(Session::new(store, &config))?;
    Ok(())
}

/// Render the filtered, sorted task list.
pub fn list_output(store: &TaskStore, filter: StatusFilter, sort: SortKey, json: bool, today: NaiveDate) -> Result<String> {
    let tasks = derive_view(store.tasks(), filter, sort);
    if json {
        let mut out = serde_json::to_string_pretty(&tasks)?;
        out.push('\n');
        return Ok(out);
    }
    if tasks.is_empty() {
        return Ok(match filter {
            StatusFilter::All => "No tasks found.\n".to_string(),
            f => format!("No tasks with status \"{f}\".\n"),
        });
    }
    Ok(render_table(&tasks, today))
}

/// Print tasks with the given filter and sort order.
pub fn cmd_list(store: &TaskStore, filter: StatusFilter, sort: SortKey, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    print!("{}", list_output(store, filter, sort, json, today)?);
    Ok(())
}

/// Render statistics over every task.
pub fn stats_output(store: &TaskStore, json: bool) -> Result<String> {
    let stats = compute_stats(store.tasks());
    if json {
        let mut out = serde_json::to_string_pretty(&stats)?;
        out.push('\n');
        return Ok(out);
    }
    Ok(render_stats(&stats))
}

pub fn cmd_stats(store: &TaskStore, json: bool) -> Result<()> {
    print!("{}", stats_output(store, json)?);
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
