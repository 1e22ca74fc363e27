use chrono::NaiveDate;

use crate::task::{Task, TaskRow};

/// A task is "upcoming" when it is due within this many days, inclusive.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Tasks due in the inclusive window `[today, today + 7]`, in store order.
///
/// Pure: overdue tasks are excluded even though their days-left is below
/// the window, and nothing is mutated.
pub fn upcoming(tasks: &[Task], today: NaiveDate) -> Vec<TaskRow> {
    tasks
        .iter()
        .filter(|t| {
            let days_left = t.days_left(today);
            t.due_date >= today && days_left <= UPCOMING_WINDOW_DAYS
        })
        .map(|t| t.row(today))
        .collect()
}
