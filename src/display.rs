//! Formatting helpers shared by the CLI table output and the TUI.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

use crate::fields::{Priority, Status};
use crate::task::Task;
use crate::view::TaskStats;

/// Format a task status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Todo => "To Do",
        Status::InProgress => "In Progress",
        Status::Completed => "Completed",
    }
}

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

/// Calendar day of `at` in the local timezone.
pub fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// Month and day, e.g. "Jan 15".
pub fn format_short_date(d: NaiveDate) -> String {
    format!("{} {}", d.format("%b"), d.day())
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Render tasks as a fixed-width table.
pub fn render_table(tasks: &[&Task], today: NaiveDate) -> String {
    let mut out = format!(
        "{:<5} {:<12} {:<8} {:<8} {:<10} {}\n",
        "ID", "Status", "Priority", "Created", "Due", "Title"
    );
    for t in tasks {
        out.push_str(&format!(
            "{:<5} {:<12} {:<8} {:<8} {:<10} {}\n",
            t.id,
            format_status(t.status),
            format_priority(t.priority),
            format_short_date(local_date(t.created_at)),
            format_due_relative(t.due_date, today),
            truncate(&t.title, 60),
        ));
    }
    out
}

/// Render the statistics block.
pub fn render_stats(stats: &TaskStats) -> String {
    format!(
        "Total Tasks:     {}\nCompleted:       {}\nIn Progress:     {}\nTo Do:           {}\nHigh Priority:   {}\nCompletion Rate: {}%\n",
        stats.total,
        stats.completed,
        stats.in_progress,
        stats.todo,
        stats.high_priority_open,
        stats.completion_rate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_tasks;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_short_date() {
        assert_eq!(format_short_date(date(2024, 1, 5)), "Jan 5");
        assert_eq!(format_short_date(date(2024, 12, 25)), "Dec 25");
    }

    #[test]
    fn test_format_due_relative() {
        let today = date(2024, 1, 17);
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(format_due_relative(Some(date(2024, 1, 18)), today), "tomorrow");
        assert_eq!(format_due_relative(Some(date(2024, 1, 20)), today), "in 3d");
        assert_eq!(format_due_relative(Some(date(2024, 1, 15)), today), "2d late");
    }

    #[test]
    fn test_local_date_follows_local_offset() {
        use chrono::TimeZone;
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let local = at.with_timezone(&Local);
        assert_eq!(local_date(at), local.date_naive());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_render_table_rows() {
        let tasks = demo_tasks();
        let refs: Vec<&Task> = tasks.iter().collect();
        let table = render_table(&refs, date(2024, 1, 17));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("In Progress"));
        let created = format_short_date(local_date(tasks[0].created_at));
        assert!(lines[1].contains(&created));
        assert!(lines[1].contains("in 3d"));
    }

    #[test]
    fn test_render_stats() {
        let stats = TaskStats {
            total: 3,
            completed: 1,
            in_progress: 1,
            todo: 1,
            high_priority_open: 2,
            completion_rate: 33,
        };
        let text = render_stats(&stats);
        assert!(text.contains("Completion Rate: 33%"));
        assert!(text.contains("High Priority:   2"));
    }
}
