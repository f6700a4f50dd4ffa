//! Derived views over a task collection.
//!
//! Everything here is a pure function of its inputs: the task slice is only
//! borrowed, and results are fresh vectors of references into it.

use std::cmp::Reverse;

use serde::Serialize;

use crate::fields::{SortKey, Status, StatusFilter};
use crate::task::Task;

/// Aggregate counts shown above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub todo: usize,
    pub high_priority_open: usize,
    /// Whole-number percentage of tasks completed, 0 for an empty list.
    pub completion_rate: u32,
}

/// Tasks passing `filter`, in input order.
pub fn filter_tasks(tasks: &[Task], filter: StatusFilter) -> Vec<&Task> {
    tasks.iter().filter(|t| filter.matches(t.status)).collect()
}

/// A newly ordered copy of `tasks`. Equal keys keep their input order.
pub fn sort_tasks<'a>(tasks: &[&'a Task], key: SortKey) -> Vec<&'a Task> {
    let mut sorted = tasks.to_vec();
    // slice::sort_by_key is stable
    match key {
        SortKey::Created => sorted.sort_by_key(|t| Reverse(t.created_at)),
        SortKey::Priority => sorted.sort_by_key(|t| Reverse(t.priority.rank())),
        SortKey::Status => sorted.sort_by_key(|t| t.status.rank()),
    }
    sorted
}

/// Filter then sort: the list the UI displays.
pub fn derive_view(tasks: &[Task], filter: StatusFilter, key: SortKey) -> Vec<&Task> {
    sort_tasks(&filter_tasks(tasks, filter), key)
}

/// Count tasks by status and compute the completion rate.
pub fn compute_stats<'a, I>(tasks: I) -> TaskStats
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut stats = TaskStats::default();
    for task in tasks {
        stats.total += 1;
        match task.status {
            Status::Todo => stats.todo += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::Completed => stats.completed += 1,
        }
        if task.is_high_priority_open() {
            stats.high_priority_open += 1;
        }
    }
    stats.completion_rate = completion_rate(stats.completed, stats.total);
    stats
}

/// `round(completed / total * 100)` with halves rounded up, in integer math.
fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (completed, total) = (completed as u64, total as u64);
    ((completed * 200 + total) / (total * 2)) as u32
}
