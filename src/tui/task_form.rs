//! Add-task dialog state for the terminal user interface.
//!
//! The form holds draft values only; it produces a `NewTask` on submit and
//! never touches the store itself.

use chrono::NaiveDate;

use crate::dates::parse_due_input;
use crate::error::{Error, Result};
use crate::fields::Priority;
use crate::task::{normalise_text, NewTask};
use crate::tui::input::InputField;

/// Focusable fields in visual order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
    Due,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::Priority,
        FormField::Due,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|&f| f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Draft values for a new task.
#[derive(Clone, Debug)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub priority: usize,
    pub current_field: FormField,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// Empty form with medium priority selected.
    pub fn new() -> Self {
        Self {
            title: InputField::new(),
            description: InputField::new(),
            due: InputField::new(),
            priority: Priority::ALL
                .iter()
                .position(|&p| p == Priority::Medium)
                .unwrap_or(0),
            current_field: FormField::Title,
        }
    }

    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority % Priority::ALL.len()]
    }

    pub fn next_field(&mut self) {
        self.current_field = self.current_field.next();
    }

    pub fn prev_field(&mut self) {
        self.current_field = self.current_field.prev();
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Due => Some(&mut self.due),
            FormField::Priority => None,
        }
    }

    /// Handle character input for the focused field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Move the cursor, or cycle the priority selector when it has focus.
    pub fn handle_left_right(&mut self, right: bool) {
        let len = Priority::ALL.len();
        match self.current_field {
            FormField::Priority => {
                self.priority = if right {
                    (self.priority + 1) % len
                } else {
                    (self.priority + len - 1) % len
                };
            }
            _ => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    /// Validate the draft and build creation input.
    ///
    /// Due dates may not fall before `today`.
    pub fn to_new_task(&self, today: NaiveDate) -> Result<NewTask> {
        let title = normalise_text(Some(&self.title.value))
            .ok_or_else(|| Error::InvalidInput("title is required".to_string()))?;

        let due_date = match normalise_text(Some(&self.due.value)) {
            None => None,
            Some(raw) => {
                let due = parse_due_input(&raw, today).ok_or_else(|| {
                    Error::InvalidInput(format!("unrecognised due date '{raw}'"))
                })?;
                if due < today {
                    return Err(Error::InvalidInput(
                        "due date cannot be in the past".to_string(),
                    ));
                }
                Some(due)
            }
        };

        Ok(NewTask {
            title,
            description: normalise_text(Some(&self.description.value)),
            priority: self.selected_priority(),
            due_date,
        })
    }
}
