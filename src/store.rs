//! In-memory task store.
//!
//! `TaskStore` owns the ordered task collection (newest first) and is the only
//! place tasks are created, have their status changed, or are removed. Every
//! operation either applies fully or leaves the collection untouched.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fields::Status;
use crate::task::{normalise_text, NewTask, Task, TaskId};

/// Authoritative ordered collection of tasks.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: TaskId,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a store holding `tasks` in the given order.
    ///
    /// Rejects duplicate ids and blank titles. Generated ids continue above
    /// the largest seeded id, so a seed holding `u64::MAX` is rejected too.
    pub fn with_tasks(tasks: Vec<Task>) -> Result<Self> {
        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.id) {
                warn!(id = task.id, "rejecting seed with duplicate id");
                return Err(Error::DuplicateId(task.id));
            }
            if task.title.trim().is_empty() {
                warn!(id = task.id, "rejecting seed with blank title");
                return Err(Error::InvalidInput(format!(
                    "task {} has an empty title",
                    task.id
                )));
            }
        }
        let next_id = match tasks.iter().map(|t| t.id).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                warn!(id = max, "seed leaves no room for new ids");
                Error::IdsExhausted(max)
            })?,
        };
        debug!(count = tasks.len(), next_id, "seeded task store");
        Ok(Self { tasks, next_id })
    }

    /// Current snapshot, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Create a task from `input`, stamped with the current time.
    pub fn add_task(&mut self, input: NewTask) -> Result<Task> {
        self.add_task_at(input, Utc::now())
    }

    /// Create a task from `input` with an explicit creation time.
    ///
    /// The new task always starts as `todo` and becomes the first element.
    pub fn add_task_at(&mut self, input: NewTask, now: DateTime<Utc>) -> Result<Task> {
        let Some(title) = normalise_text(Some(&input.title)) else {
            warn!("rejecting task with empty title");
            return Err(Error::InvalidInput("title cannot be empty".to_string()));
        };

        let following = self
            .next_id
            .checked_add(1)
            .ok_or(Error::IdsExhausted(self.next_id))?;
        let task = Task {
            id: self.next_id,
            title,
            description: normalise_text(input.description.as_deref()),
            status: Status::Todo,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now,
        };
        self.next_id = following;
        self.tasks.insert(0, task.clone());
        debug!(id = task.id, priority = %task.priority, "added task");
        Ok(task)
    }

    /// Set the status of task `id`. Setting the current status again is a no-op.
    pub fn change_status(&mut self, id: TaskId, status: Status) -> Result<()> {
        let Some(task) = self.get_mut(id) else {
            warn!(id, "status change for unknown task");
            return Err(Error::NotFound(id));
        };
        if task.status != status {
            debug!(id, from = %task.status, to = %status, "changed task status");
            task.status = status;
        }
        Ok(())
    }

    /// Remove task `id`, returning it. Remaining tasks keep their order.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Task> {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            warn!(id, "delete for unknown task");
            return Err(Error::NotFound(id));
        };
        let task = self.tasks.remove(idx);
        debug!(id, "deleted task");
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn seeded() -> TaskStore {
        let mut store = TaskStore::new();
        store.add_task_at(NewTask::new("A").with_priority(Priority::High), at(1)).unwrap();
        store.add_task_at(NewTask::new("B"), at(2)).unwrap();
        store.add_task_at(NewTask::new("C").with_priority(Priority::Low), at(3)).unwrap();
        store
    }

    fn titles(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_add_task_prepends_as_todo() {
        let mut store = seeded();
        let before = Utc::now();
        let task = store.add_task(NewTask::new("D")).unwrap();
        let after = Utc::now();

        assert_eq!(store.len(), 4);
        assert_eq!(store.tasks()[0], task);
        assert_eq!(task.status, Status::Todo);
        assert!(task.created_at >= before && task.created_at <= after);
        assert_eq!(titles(&store), vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn test_add_task_ids_unique() {
        let mut store = seeded();
        store.add_task(NewTask::new("D")).unwrap();
        let ids: HashSet<_> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn test_add_task_trims_fields() {
        let mut store = TaskStore::new();
        let task = store
            .add_task(NewTask::new("  Review PR  ").with_description("   "))
            .unwrap();
        assert_eq!(task.title, "Review PR");
        assert!(task.description.is_none());

        let task = store
            .add_task(NewTask::new("x").with_description("  details "))
            .unwrap();
        assert_eq!(task.description.as_deref(), Some("details"));
    }

    #[test]
    fn test_add_task_rejects_blank_title() {
        let mut store = seeded();
        for title in ["", "   ", "\t\n"] {
            let err = store.add_task(NewTask::new(title)).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
        assert_eq!(titles(&store), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_rejected_add_does_not_consume_id() {
        let mut store = TaskStore::new();
        let _ = store.add_task(NewTask::new(" "));
        let task = store.add_task(NewTask::new("first")).unwrap();
        assert_eq!(task.id, 1);
    }

    #[test]
    fn test_change_status_only_touches_status() {
        let mut store = seeded();
        let id = store.tasks()[1].id;
        let before = store.tasks().to_vec();

        store.change_status(id, Status::InProgress).unwrap();
        let after_first = store.tasks().to_vec();
        store.change_status(id, Status::InProgress).unwrap();
        assert_eq!(store.tasks(), after_first.as_slice());

        for (old, new) in before.iter().zip(store.tasks()) {
            if old.id == id {
                assert_eq!(new.status, Status::InProgress);
                assert_eq!(Task { status: old.status, ..new.clone() }, *old);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_change_status_unknown_id() {
        let mut store = seeded();
        let before = store.tasks().to_vec();
        let err = store.change_status(99, Status::Completed).unwrap_err();
        assert!(matches!(err, Error::NotFound(99)));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut store = seeded();
        let b = store.tasks()[1].id;
        let removed = store.delete_task(b).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(titles(&store), vec!["C", "A"]);
    }

    #[test]
    fn test_delete_twice_is_safe() {
        let mut store = seeded();
        let id = store.tasks()[0].id;
        store.delete_task(id).unwrap();
        let err = store.delete_task(id).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = seeded();
        let newest = store.tasks()[0].id;
        store.delete_task(newest).unwrap();
        let task = store.add_task(NewTask::new("D")).unwrap();
        assert_ne!(task.id, newest);
    }

    #[test]
    fn test_with_tasks_continues_ids() {
        let source = seeded();
        let mut store = TaskStore::with_tasks(source.tasks().to_vec()).unwrap();
        let task = store.add_task(NewTask::new("next")).unwrap();
        assert_eq!(task.id, 4);
    }

    #[test]
    fn test_with_tasks_rejects_duplicates() {
        let mut tasks = seeded().tasks().to_vec();
        tasks[1].id = tasks[0].id;
        let err = TaskStore::with_tasks(tasks).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(_)));
    }

    #[test]
    fn test_with_tasks_rejects_max_id() {
        let mut tasks = seeded().tasks().to_vec();
        tasks[0].id = u64::MAX;
        let err = TaskStore::with_tasks(tasks).unwrap_err();
        assert!(matches!(err, Error::IdsExhausted(u64::MAX)));
    }

    #[test]
    fn test_add_task_when_ids_run_out() {
        let mut tasks = seeded().tasks().to_vec();
        tasks[0].id = u64::MAX - 1;
        let mut store = TaskStore::with_tasks(tasks).unwrap();
        let before = store.tasks().to_vec();

        let err = store.add_task(NewTask::new("one more")).unwrap_err();
        assert!(matches!(err, Error::IdsExhausted(_)));
        assert_eq!(store.tasks(), before.as_slice());

        // status changes and deletes still work
        let id = store.tasks()[1].id;
        store.change_status(id, Status::Completed).unwrap();
        store.delete_task(id).unwrap();
    }

    #[test]
    fn test_with_tasks_rejects_blank_title() {
        let mut tasks = seeded().tasks().to_vec();
        tasks[2].title = "  ".to_string();
        let err = TaskStore::with_tasks(tasks).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
