//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Status};

/// Header, highlights and the completion gauge.
pub const PRIMARY: Color = Color::Rgb(124, 58, 237);
pub const TODO: Color = Color::Rgb(148, 163, 184);
pub const IN_PROGRESS: Color = Color::Rgb(59, 130, 246);
pub const COMPLETED: Color = Color::Rgb(34, 197, 94);
pub const HIGH_PRIORITY: Color = Color::Rgb(239, 68, 68);
/// Confirmation dialogs.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);

pub fn status_color(s: Status) -> Color {
    match s {
        Status::Todo => TODO,
        Status::InProgress => IN_PROGRESS,
        Status::Completed => COMPLETED,
    }
}

pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::Low => TODO,
        Priority::Medium => IN_PROGRESS,
        Priority::High => HIGH_PRIORITY,
    }
}
