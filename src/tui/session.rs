//! Transient UI session state.
//!
//! A `Session` wraps the store with everything the interface owns but the
//! store must not: the current filter and sort selection, the add dialog
//! draft, and completions waiting on their visual delay. Time is passed in
//! explicitly so the whole session can be driven without a terminal.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fields::{SortKey, Status, StatusFilter};
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use crate::tui::task_form::TaskForm;
use crate::view::{compute_stats, derive_view, TaskStats};

/// Delay between requesting completion and applying it.
pub const DEFAULT_COMPLETION_DELAY: Duration = Duration::from_millis(300);

/// Start-up options for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub filter: StatusFilter,
    pub sort: SortKey,
    pub completion_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            filter: StatusFilter::All,
            sort: SortKey::Created,
            completion_delay: DEFAULT_COMPLETION_DELAY,
        }
    }
}

/// What a status request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusChange {
    Applied,
    /// Completion will land once the delay expires.
    Scheduled,
}

#[derive(Clone, Copy, Debug)]
struct PendingCompletion {
    id: TaskId,
    due_at: Instant,
}

pub struct Session {
    store: TaskStore,
    pub filter: StatusFilter,
    pub sort: SortKey,
    completion_delay: Duration,
    pending: Vec<PendingCompletion>,
    add_dialog: Option<TaskForm>,
}

impl Session {
    pub fn new(store: TaskStore, config: &SessionConfig) -> Self {
        info!(
            tasks = store.len(),
            filter = %config.filter,
            sort = %config.sort,
            "starting session"
        );
        Self {
            store,
            filter: config.filter,
            sort: config.sort,
            completion_delay: config.completion_delay,
            pending: Vec::new(),
            add_dialog: None,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// The filtered, sorted list to display. Recomputed on every call.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        derive_view(self.store.tasks(), self.filter, self.sort)
    }

    /// Statistics over every task, regardless of the current filter.
    pub fn stats(&self) -> TaskStats {
        compute_stats(self.store.tasks())
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.cycle();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.cycle();
    }

    pub fn show_all(&mut self) {
        self.filter = StatusFilter::All;
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    fn cancel_pending(&mut self, id: TaskId) {
        self.pending.retain(|p| p.id != id);
    }

    /// Request a status change for task `id`.
    ///
    /// Completing a task that is not already completed is deferred by the
    /// configured delay; everything else applies immediately and cancels any
    /// completion still pending for that task.
    pub fn request_status(&mut self, id: TaskId, status: Status, now: Instant) -> Result<StatusChange> {
        let current = self.store.get(id).ok_or(Error::NotFound(id))?.status;

        if status == Status::Completed && current != Status::Completed && !self.completion_delay.is_zero() {
            if !self.is_pending(id) {
                self.pending.push(PendingCompletion {
                    id,
                    due_at: now + self.completion_delay,
                });
                debug!(id, "scheduled completion");
            }
            return Ok(StatusChange::Scheduled);
        }

        self.cancel_pending(id);
        self.store.change_status(id, status)?;
        Ok(StatusChange::Applied)
    }

    /// Apply every pending completion whose delay has expired by `now`.
    /// Returns the ids that were completed.
    pub fn tick(&mut self, now: Instant) -> Vec<TaskId> {
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_at <= now);
        self.pending = waiting;

        let mut applied = Vec::new();
        for p in ready {
            match self.store.change_status(p.id, Status::Completed) {
                Ok(()) => applied.push(p.id),
                Err(e) => debug!(id = p.id, error = %e, "dropped pending completion"),
            }
        }
        applied
    }

    /// Delete task `id`, dropping any completion pending for it.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Task> {
        let task = self.store.delete_task(id)?;
        self.cancel_pending(id);
        Ok(task)
    }

    pub fn add_dialog(&self) -> Option<&TaskForm> {
        self.add_dialog.as_ref()
    }

    pub fn add_dialog_mut(&mut self) -> Option<&mut TaskForm> {
        self.add_dialog.as_mut()
    }

    /// Open the add dialog with a fresh draft.
    pub fn open_add_dialog(&mut self) {
        self.add_dialog = Some(TaskForm::new());
    }

    /// Close the add dialog, discarding the draft.
    pub fn close_add_dialog(&mut self) {
        self.add_dialog = None;
    }

    /// Validate the draft and add it to the store.
    ///
    /// On failure the dialog stays open with its draft intact.
    pub fn submit_add_dialog(&mut self, today: NaiveDate) -> Result<Task> {
        let form = self
            .add_dialog
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("add dialog is not open".to_string()))?;
        let input = form.to_new_task(today)?;
        let task = self.store.add_task(input)?;
        self.add_dialog = None;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use crate::seed::demo_tasks;
    use crate::tui::task_form::FormField;

    fn session_with_delay(delay_ms: u64) -> Session {
        let store = TaskStore::with_tasks(demo_tasks()).unwrap();
        let config = SessionConfig {
            completion_delay: Duration::from_millis(delay_ms),
            ..SessionConfig::default()
        };
        Session::new(store, &config)
    }

    fn status_of(session: &Session, id: TaskId) -> Status {
        session.store().get(id).unwrap().status
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()
    }

    #[test]
    fn test_visible_tasks_follow_selection() {
        let mut session = session_with_delay(0);
        let ids: Vec<_> = session.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);

        session.cycle_filter();
        assert_eq!(session.filter, StatusFilter::Todo);
        let ids: Vec<_> = session.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4]);

        session.cycle_sort();
        session.show_all();
        let ids: Vec<_> = session.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_stats_ignore_filter() {
        let mut session = session_with_delay(0);
        session.filter = StatusFilter::Completed;
        assert_eq!(session.visible_tasks().len(), 1);
        assert_eq!(session.stats().total, 4);
    }

    #[test]
    fn test_completion_is_delayed() {
        let mut session = session_with_delay(300);
        let t0 = Instant::now();

        let outcome = session.request_status(2, Status::Completed, t0).unwrap();
        assert_eq!(outcome, StatusChange::Scheduled);
        assert!(session.is_pending(2));
        assert_eq!(status_of(&session, 2), Status::Todo);

        assert!(session.tick(t0 + Duration::from_millis(299)).is_empty());
        assert_eq!(status_of(&session, 2), Status::Todo);

        assert_eq!(session.tick(t0 + Duration::from_millis(300)), vec![2]);
        assert_eq!(status_of(&session, 2), Status::Completed);
        assert!(!session.is_pending(2));
    }

    #[test]
    fn test_zero_delay_applies_immediately() {
        let mut session = session_with_delay(0);
        let outcome = session.request_status(2, Status::Completed, Instant::now()).unwrap();
        assert_eq!(outcome, StatusChange::Applied);
        assert_eq!(status_of(&session, 2), Status::Completed);
    }

    #[test]
    fn test_other_transitions_are_immediate() {
        let mut session = session_with_delay(300);
        let now = Instant::now();
        assert_eq!(
            session.request_status(3, Status::Todo, now).unwrap(),
            StatusChange::Applied
        );
        assert_eq!(status_of(&session, 3), Status::Todo);
        assert_eq!(
            session.request_status(2, Status::InProgress, now).unwrap(),
            StatusChange::Applied
        );
        assert_eq!(status_of(&session, 2), Status::InProgress);
    }

    #[test]
    fn test_reopen_cancels_pending_completion() {
        let mut session = session_with_delay(300);
        let t0 = Instant::now();
        session.request_status(1, Status::Completed, t0).unwrap();
        session.request_status(1, Status::Todo, t0).unwrap();
        assert!(!session.is_pending(1));
        assert!(session.tick(t0 + Duration::from_secs(1)).is_empty());
        assert_eq!(status_of(&session, 1), Status::Todo);
    }

    #[test]
    fn test_deleted_task_skips_pending_completion() {
        let mut session = session_with_delay(300);
        let t0 = Instant::now();
        session.request_status(2, Status::Completed, t0).unwrap();
        session.delete_task(2).unwrap();
        assert!(session.tick(t0 + Duration::from_secs(1)).is_empty());
        assert_eq!(session.store().len(), 3);
    }

    #[test]
    fn test_unknown_task() {
        let mut session = session_with_delay(300);
        let err = session.request_status(42, Status::Completed, Instant::now()).unwrap_err();
        assert!(matches!(err, Error::NotFound(42)));
        assert!(matches!(session.delete_task(42), Err(Error::NotFound(42))));
    }

    #[test]
    fn test_delete_then_filter_todo() {
        // without task 4 the demo set is A=2 (todo), B=1 (in-progress), C=3 (completed)
        let mut session = session_with_delay(0);
        session.delete_task(4).unwrap();
        session.delete_task(1).unwrap();
        session.filter = StatusFilter::Todo;
        let ids: Vec<_> = session.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_add_dialog_round_trip() {
        let mut session = session_with_delay(0);
        session.open_add_dialog();
        {
            let form = session.add_dialog_mut().unwrap();
            for c in "Triage bugs".chars() {
                form.handle_char(c);
            }
            form.current_field = FormField::Priority;
            form.handle_left_right(true);
        }
        let task = session.submit_add_dialog(today()).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(session.store().tasks()[0].id, task.id);
        assert!(session.add_dialog().is_none());

        session.open_add_dialog();
        assert_eq!(session.add_dialog().unwrap().selected_priority(), Priority::Medium);
        assert!(session.add_dialog().unwrap().title.value.is_empty());
    }

    #[test]
    fn test_add_dialog_keeps_draft_on_error() {
        let mut session = session_with_delay(0);
        session.open_add_dialog();
        session.add_dialog_mut().unwrap().handle_char(' ');
        let err = session.submit_add_dialog(today()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(session.add_dialog().is_some());
        assert_eq!(session.store().len(), 4);
    }
}
