//! # TM - Terminal Task Manager
//!
//! An in-memory task tracker with a terminal user interface (TUI) and a small
//! CLI for scripted views of the same data.
//!
//! ## Key Features
//!
//! - **Ephemeral Store**: Tasks live for the length of a session; nothing touches disk
//! - **Status Workflow**: To Do → In Progress → Completed, with reopen at any time
//! - **Derived Views**: Filter by status and sort by creation time, priority or status
//! - **Statistics**: Totals per status, open high-priority count and completion rate
//! - **Seeding**: Start from the demo set, an empty list, or a JSON file of tasks
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI with the demo tasks
//! tm
//!
//! # Print open work, highest priority first
//! tm list --filter todo --sort priority
//!
//! # Statistics as JSON
//! tm stats --json
//! ```
//!
//! ## Key Commands
//!
//! - `tm ui` - Interactive task list (the default)
//! - `tm list` - Print the filtered, sorted task table
//! - `tm stats` - Print task statistics
//! - `tm completions <shell>` - Generate shell completions
//!
//! Logging is off inside the TUI unless `--log-file` is given; `RUST_LOG`
//! controls the level.

pub mod cli;
pub mod cmd;
pub mod dates;
pub mod display;
pub mod error;
pub mod fields;
pub mod seed;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod session;
    pub mod task_form;
    pub mod utils;
}

pub use error::{Error, Result};
