//! Initial task sets for a session.
//!
//! The store itself never seeds; the binary picks one of these and hands the
//! result to `TaskStore::with_tasks`.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::info;

use crate::error::Result;
use crate::fields::{Priority, Status};
use crate::task::Task;

/// Where the starting task list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// The built-in demonstration set.
    Demo,
    /// No tasks at all.
    Empty,
    /// A JSON array of tasks.
    File(std::path::PathBuf),
}

impl SeedSource {
    pub fn load(&self) -> Result<Vec<Task>> {
        match self {
            SeedSource::Demo => Ok(demo_tasks()),
            SeedSource::Empty => Ok(Vec::new()),
            SeedSource::File(path) => load_seed_file(path),
        }
    }
}

fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Four sample tasks covering every status and priority.
pub fn demo_tasks() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            title: "Design new user interface".into(),
            description: Some("Create wireframes and mockups for the dashboard redesign project".into()),
            status: Status::InProgress,
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 20),
            created_at: midnight(2024, 1, 15),
        },
        Task {
            id: 2,
            title: "Implement authentication system".into(),
            description: Some("Set up JWT-based auth with proper security measures".into()),
            status: Status::Todo,
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 18),
            created_at: midnight(2024, 1, 14),
        },
        Task {
            id: 3,
            title: "Write unit tests".into(),
            description: Some("Add comprehensive test coverage for the user management module".into()),
            status: Status::Completed,
            priority: Priority::Medium,
            due_date: None,
            created_at: midnight(2024, 1, 10),
        },
        Task {
            id: 4,
            title: "Update documentation".into(),
            description: Some("Refresh API docs and add new endpoint examples".into()),
            status: Status::Todo,
            priority: Priority::Low,
            due_date: None,
            created_at: midnight(2024, 1, 12),
        },
    ]
}

/// Read a JSON array of tasks. The file is never written back.
pub fn load_seed_file(path: &Path) -> Result<Vec<Task>> {
    let buf = fs::read_to_string(path)?;
    let tasks: Vec<Task> = serde_json::from_str(&buf)?;
    info!(path = %path.display(), count = tasks.len(), "loaded seed file");
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::TaskStore;
    use crate::view::compute_stats;
    use std::io::Write;

    #[test]
    fn test_demo_tasks_seed_a_store() {
        let store = TaskStore::with_tasks(demo_tasks()).unwrap();
        assert_eq!(store.len(), 4);
        let stats = compute_stats(store.tasks());
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.todo, 2);
        assert_eq!(stats.high_priority_open, 2);
        assert_eq!(stats.completion_rate, 25);
    }

    #[test]
    fn test_empty_source() {
        assert!(SeedSource::Empty.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string_pretty(&demo_tasks()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let tasks = SeedSource::File(file.path().to_path_buf()).load().unwrap();
        assert_eq!(tasks, demo_tasks());
    }

    #[test]
    fn test_load_seed_file_errors() {
        let missing = SeedSource::File("/definitely/not/here.json".into()).load();
        assert!(matches!(missing, Err(Error::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let bad = load_seed_file(file.path());
        assert!(matches!(bad, Err(Error::Serialization(_))));
    }
}
