//! Enumerations for TUI state management.

/// Which screen currently receives input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    AddTask,
    Help,
    Confirm,
}
