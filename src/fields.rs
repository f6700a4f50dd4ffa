//! Enumerations and field types for task tracking.
//!
//! Status and priority are closed sets; every consumer (filtering, sort ranks,
//! statistics, rendering) matches on them exhaustively.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl Status {
    /// All statuses in workflow order.
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Completed];

    /// Ascending sort rank: todo=1, in-progress=2, completed=3.
    pub fn rank(self) -> u8 {
        match self {
            Status::Todo => 1,
            Status::InProgress => 2,
            Status::Completed => 3,
        }
    }

    /// Wire name, as used by serde and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency ranking of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Selector order used by the add dialog.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Descending sort rank: high=3, medium=2, low=1.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status selection applied to the task list for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Todo,
    InProgress,
    Completed,
}

impl StatusFilter {
    /// Whether a task with `status` passes this filter.
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Todo => status == Status::Todo,
            StatusFilter::InProgress => status == Status::InProgress,
            StatusFilter::Completed => status == Status::Completed,
        }
    }

    /// Next filter in selector order, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Todo,
            StatusFilter::Todo => StatusFilter::InProgress,
            StatusFilter::InProgress => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Todo => Status::Todo.as_str(),
            StatusFilter::InProgress => Status::InProgress.as_str(),
            StatusFilter::Completed => Status::Completed.as_str(),
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        match status {
            Status::Todo => StatusFilter::Todo,
            Status::InProgress => StatusFilter::InProgress,
            Status::Completed => StatusFilter::Completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering criterion applied to a (filtered) task list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Created,
    Priority,
    Status,
}

impl SortKey {
    pub fn cycle(self) -> Self {
        match self {
            SortKey::Created => SortKey::Priority,
            SortKey::Priority => SortKey::Status,
            SortKey::Status => SortKey::Created,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Priority => "priority",
            SortKey::Status => "status",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
