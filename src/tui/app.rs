//! Main application logic for the terminal user interface.
//!
//! `App` owns a `Session` and translates key presses into session calls,
//! then renders the header, statistics, task table and any open dialog.

use std::io;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::display::{format_due_relative, format_priority, format_short_date, format_status, local_date};
use crate::fields::{Priority, Status, StatusFilter};
use crate::task::TaskId;
use crate::tui::{
    colors::{priority_color, status_color, COMPLETED, DARK_RED, HIGH_PRIORITY, IN_PROGRESS, PRIMARY},
    enums::AppState,
    input::InputField,
    session::{Session, StatusChange},
    task_form::FormField,
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    session: Session,
    table_state: TableState,
    selected: Option<TaskId>,
    status_message: String,
    confirm_delete: Option<TaskId>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            session,
            table_state: TableState::default(),
            selected: None,
            status_message: String::new(),
            confirm_delete: None,
        };
        app.sync_selection();
        app
    }

    fn visible_ids(&self) -> Vec<TaskId> {
        self.session.visible_tasks().iter().map(|t| t.id).collect()
    }

    /// Keep the highlighted row on the same task across re-derivations,
    /// falling back to the first row when it is no longer visible.
    fn sync_selection(&mut self) {
        let ids = self.visible_ids();
        let idx = self
            .selected
            .and_then(|id| ids.iter().position(|&v| v == id))
            .or(if ids.is_empty() { None } else { Some(0) });
        self.table_state.select(idx);
        self.selected = idx.map(|i| ids[i]);
    }

    fn move_selection(&mut self, down: bool) {
        let ids = self.visible_ids();
        if ids.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(ids.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
        self.selected = Some(ids[next]);
    }

    fn select_edge(&mut self, last: bool) {
        let ids = self.visible_ids();
        let pick = if last { ids.last() } else { ids.first() };
        self.selected = pick.copied();
        self.sync_selection();
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn request_status(&mut self, status: Status) {
        let Some(id) = self.selected else {
            self.set_status_message("No task selected".to_string());
            return;
        };
        // a pending completion still needs cancelling even if the status already matches
        let current = self.session.store().get(id).map(|t| t.status);
        if current == Some(status) && !self.session.is_pending(id) {
            self.set_status_message(format!("Task {id} is already {}", format_status(status)));
            return;
        }
        match self.session.request_status(id, status, Instant::now()) {
            Ok(StatusChange::Applied) => {
                self.set_status_message(format!("Task {id} marked {}", format_status(status)));
            }
            Ok(StatusChange::Scheduled) => {
                self.set_status_message(format!("Completing task {id}..."));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
        self.sync_selection();
    }

    fn apply_pending(&mut self) {
        let done = self.session.tick(Instant::now());
        if done.is_empty() {
            return;
        }
        self.sync_selection();
        let ids: Vec<String> = done.iter().map(|id| id.to_string()).collect();
        self.set_status_message(format!("Completed task {}", ids.join(", ")));
    }

    /// Handle keys on the main list. Returns true to quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Home => self.select_edge(false),
            KeyCode::End => self.select_edge(true),
            KeyCode::Char('a') => {
                self.session.open_add_dialog();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('c') => self.request_status(Status::Completed),
            KeyCode::Char('s') => self.request_status(Status::InProgress),
            KeyCode::Char('r') => self.request_status(Status::Todo),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected {
                    self.confirm_delete = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('f') => {
                self.session.cycle_filter();
                self.sync_selection();
                self.set_status_message(format!("Filter: {}", self.session.filter));
            }
            KeyCode::Char('F') => {
                self.session.show_all();
                self.sync_selection();
                self.set_status_message("Showing all tasks".to_string());
            }
            KeyCode::Char('o') => {
                self.session.cycle_sort();
                self.sync_selection();
                self.set_status_message(format!("Sort: {}", self.session.sort));
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match key {
            KeyCode::Esc => {
                self.session.close_add_dialog();
                self.state = AppState::TaskList;
                self.set_status_message("Cancelled".to_string());
            }
            KeyCode::Enter => {
                let today = Local::now().date_naive();
                match self.session.submit_add_dialog(today) {
                    Ok(task) => {
                        self.state = AppState::TaskList;
                        self.selected = Some(task.id);
                        self.sync_selection();
                        self.set_status_message(format!("Added task {}: {}", task.id, task.title));
                    }
                    Err(e) => self.set_status_message(e.to_string()),
                }
            }
            _ => {
                let Some(form) = self.session.add_dialog_mut() else {
                    self.state = AppState::TaskList;
                    return false;
                };
                match key {
                    KeyCode::Tab | KeyCode::Down => form.next_field(),
                    KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                    KeyCode::Left => form.handle_left_right(false),
                    KeyCode::Right => form.handle_left_right(true),
                    KeyCode::Backspace => form.handle_backspace(),
                    KeyCode::Delete => form.handle_delete(),
                    KeyCode::Char(c) => form.handle_char(c),
                    _ => {}
                }
            }
        }
        false
    }

    fn handle_confirm_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(id) = self.confirm_delete.take() {
                    match self.session.delete_task(id) {
                        Ok(task) => self.set_status_message(format!("Deleted task {}: {}", id, task.title)),
                        Err(e) => self.set_status_message(e.to_string()),
                    }
                }
                self.state = AppState::TaskList;
                self.sync_selection();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
        false
    }

    fn handle_help_input(&mut self, key: KeyCode) -> bool {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')) {
            self.state = AppState::TaskList;
        }
        false
    }

    /// Poll for and handle keyboard events based on current application state.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(false);
                }
                self.clear_status_message();
                let should_quit = match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
                    AppState::AddTask => self.handle_form_input(key.code, key.modifiers),
                    AppState::Confirm => self.handle_confirm_input(key.code),
                    AppState::Help => self.handle_help_input(key.code),
                };
                return Ok(should_quit);
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let text = vec![Line::from(vec![
            Span::styled("TASK MANAGER", Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                "Organize and track your tasks efficiently",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_stats(&self, f: &mut Frame, area: Rect) {
        let stats = self.session.stats();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let cards = [
            ("Total Tasks", stats.total, PRIMARY),
            ("Completed", stats.completed, COMPLETED),
            ("In Progress", stats.in_progress, IN_PROGRESS),
            ("High Priority", stats.high_priority_open, HIGH_PRIORITY),
        ];
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[0]);
        for ((label, value, color), col) in cards.iter().zip(cols.iter()) {
            let card = Paragraph::new(Line::from(vec![
                Span::styled(value.to_string(), Style::default().fg(*color).add_modifier(Modifier::BOLD)),
                Span::raw(format!("  {label}")),
            ]))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
            f.render_widget(card, *col);
        }

        if stats.total > 0 && rows[1].height > 0 {
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title("Completion Rate"))
                .gauge_style(Style::default().fg(PRIMARY).bg(Color::Black))
                .percent(stats.completion_rate.min(100) as u16)
                .label(format!("{}%", stats.completion_rate));
            f.render_widget(gauge, rows[1]);
        }
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = Local::now().date_naive();
        let title = format!(
            "Tasks ({}/{}) - Filter: {} - Sort: {} - Press 'h' for help",
            self.session.visible_tasks().len(),
            self.session.store().len(),
            self.session.filter,
            self.session.sort,
        );

        let header = Row::new(["ID", "Status", "Priority", "Created", "Due", "Title"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(PRIMARY).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = self
            .session
            .visible_tasks()
            .into_iter()
            .map(|task| {
                let pending = self.session.is_pending(task.id);
                let (status_label, status_style) = if pending {
                    ("Completing...", Style::default().fg(COMPLETED).add_modifier(Modifier::ITALIC))
                } else {
                    (format_status(task.status), Style::default().fg(status_color(task.status)))
                };
                let title_style = if task.is_completed() {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(Color::White)
                };
                let priority_style = match task.priority {
                    Priority::High => Style::default().fg(priority_color(task.priority)).add_modifier(Modifier::BOLD),
                    p => Style::default().fg(priority_color(p)),
                };
                let title = match &task.description {
                    Some(desc) => Line::from(vec![
                        Span::styled(task.title.clone(), title_style),
                        Span::styled(format!(" - {desc}"), Style::default().fg(Color::DarkGray)),
                    ]),
                    None => Line::from(Span::styled(task.title.clone(), title_style)),
                };

                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(status_label).style(status_style),
                    Cell::from(format_priority(task.priority)).style(priority_style),
                    Cell::from(format_short_date(local_date(task.created_at))),
                    Cell::from(format_due_relative(task.due_date, today)),
                    Cell::from(title),
                ])
            })
            .collect();

        if rows.is_empty() {
            self.render_empty(f, area, &title);
            return;
        }

        let widths = [
            Constraint::Length(4),  // ID
            Constraint::Length(14), // Status
            Constraint::Length(8),  // Priority
            Constraint::Length(8),  // Created
            Constraint::Length(10), // Due
            Constraint::Min(20),    // Title
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_empty(&self, f: &mut Frame, area: Rect, title: &str) {
        let filter = self.session.filter;
        let message = if filter == StatusFilter::All {
            "Get started by creating your first task! Press 'a' to add one.".to_string()
        } else {
            format!("No tasks with status \"{filter}\". Press 'F' to show all tasks.")
        };
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("No tasks found", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(message),
        ];
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_task_form(&self, f: &mut Frame, area: Rect) {
        let Some(form) = self.session.add_dialog() else {
            return;
        };
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);
        let outer = Block::default()
            .title("Create New Task")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(PRIMARY));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        let focused = |field: FormField| form.current_field == field;

        render_input(f, &form.title, "Title *", focused(FormField::Title), chunks[0]);
        render_input(f, &form.description, "Description", focused(FormField::Description), chunks[1]);

        let priority = form.selected_priority();
        let selector = Paragraph::new(Line::from(vec![
            Span::raw("< "),
            Span::styled(format_priority(priority), Style::default().fg(priority_color(priority))),
            Span::raw(" >"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Priority")
                .border_style(field_border(focused(FormField::Priority))),
        );
        f.render_widget(selector, chunks[2]);

        render_input(
            f,
            &form.due,
            "Due Date (YYYY-MM-DD, today, in 3d, fri...)",
            focused(FormField::Due),
            chunks[3],
        );

        let hint = Paragraph::new("Tab/Shift-Tab: move  Left/Right: change priority  Enter: create  Esc: cancel")
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        f.render_widget(hint, chunks[4]);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let bindings = [
            ("Up/Down, j/k", "Move selection"),
            ("Home/End", "First / last task"),
            ("a", "Add a task"),
            ("c", "Complete selected task"),
            ("s", "Start selected task (in progress)"),
            ("r", "Reopen selected task (to do)"),
            ("d, Del", "Delete selected task"),
            ("f", "Cycle status filter"),
            ("F", "Show all tasks"),
            ("o", "Cycle sort order"),
            ("h, ?", "Toggle this help"),
            ("q, Esc, Ctrl-C", "Quit"),
        ];
        let mut text = vec![Line::from("")];
        for (keys, action) in bindings {
            text.push(Line::from(vec![
                Span::styled(format!("{keys:>16}  "), Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)),
                Span::raw(action),
            ]));
        }
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);
        let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, area);
    }

    /// Render a confirmation dialog for deletion.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let title = self
            .confirm_delete
            .and_then(|id| self.session.store().get(id))
            .map(|t| format!("Delete task {}: {}", t.id, t.title))
            .unwrap_or_default();

        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));
        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(title),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} | a add  c complete  s start  r reopen  d delete  f filter  o sort | h help",
                    self.session.visible_tasks().len()
                ),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(PRIMARY).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let gauge_height = if self.session.store().is_empty() { 0 } else { 3 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3 + gauge_height),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_stats(f, chunks[1]);
        self.render_task_list(f, chunks[2]);

        match self.state {
            AppState::TaskList => {}
            AppState::AddTask => self.render_task_form(f, chunks[2]),
            AppState::Help => self.render_help(f, chunks[2]),
            AppState::Confirm => self.render_confirm(f, chunks[2]),
        }

        self.render_status_bar(f, chunks[3]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Fires expired completions, renders, then processes input until the
    /// user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.apply_pending();
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

fn field_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Draw a bordered text input, placing the terminal cursor in it when focused.
fn render_input(f: &mut Frame, input: &InputField, title: &str, focused: bool, area: Rect) {
    let widget = Paragraph::new(input.value.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(field_border(focused)),
    );
    f.render_widget(widget, area);
    if focused {
        f.set_cursor_position((area.x + 1 + cursor_offset(input.cursor, area.width), area.y + 1));
    }
}

/// Column of the cursor inside a bordered field `width` cells wide.
fn cursor_offset(cursor: usize, width: u16) -> u16 {
    u16::try_from(cursor)
        .unwrap_or(u16::MAX)
        .min(width.saturating_sub(2))
}
