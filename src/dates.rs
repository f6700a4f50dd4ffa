//! Due-date input parsing.
//!
//! Accepts `YYYY-MM-DD` plus a few shorthands: `today`, `tomorrow`,
//! `in 3d` / `in 2w`, `end of week`, `end of month`, and weekday names
//! (`fri`, `next monday`).

use chrono::{Datelike, Duration, NaiveDate};

const WEEKDAYS: [(&str, &str, i64); 7] = [
    ("monday", "mon", 0),
    ("tuesday", "tue", 1),
    ("wednesday", "wed", 2),
    ("thursday", "thu", 3),
    ("friday", "fri", 4),
    ("saturday", "sat", 5),
    ("sunday", "sun", 6),
];

/// `today` shifted by `days`, or `None` past the calendar's range.
fn add_days(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    today.checked_add_signed(Duration::try_days(days)?)
}

/// Parse a due date relative to `today`. Returns `None` for unrecognised input.
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "end of week" | "eow" => {
            let weekday = today.weekday().num_days_from_monday() as i64;
            return add_days(today, 6 - weekday);
        }
        "end of month" | "eom" => {
            let (y, m) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            return NaiveDate::from_ymd_opt(y, m, 1).and_then(|d| d.pred_opt());
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return add_days(today, n);
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return today.checked_add_signed(Duration::try_weeks(n)?);
        }
        return None;
    }

    let (next_week, day) = match s.strip_prefix("next ") {
        Some(day) => (true, day),
        None => (false, s.strip_prefix("this ").unwrap_or(&s)),
    };
    if let Some(&(_, _, target)) = WEEKDAYS
        .iter()
        .find(|(long, short, _)| day == *long || day == *short)
    {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target - current).rem_euclid(7);
        let ahead = if next_week { ahead + 7 } else { ahead };
        return add_days(today, ahead);
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}
