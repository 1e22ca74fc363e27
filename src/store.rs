use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::error::{AddError, NoSelection};
use crate::task::{parse_due_date, Task, TaskRow};

/// In-memory ordered task list. Insertion order is display order; the
/// store is the single source of truth for the table.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validate and append a task.
    ///
    /// Inputs are trimmed first; the empty check runs before date parsing,
    /// so an empty field wins over a malformed date. On any error the
    /// store is left unchanged.
    pub fn add(&mut self, description: &str, date_str: &str) -> Result<&Task, AddError> {
        let description = description.trim();
        let date_str = date_str.trim();

        if description.is_empty() || date_str.is_empty() {
            return Err(AddError::EmptyInput);
        }

        let due_date = parse_due_date(date_str)?;
        debug!(%description, %due_date, "adding task");
        self.tasks.push(Task::new(description, due_date));
        Ok(self.tasks.last().expect("non-empty after push"))
    }

    /// Remove the selected task, shifting later indices down.
    pub fn delete(&mut self, selected: Option<usize>) -> Result<Task, NoSelection> {
        match selected {
            Some(index) if index < self.tasks.len() => {
                let task = self.tasks.remove(index);
                debug!(index, description = %task.description, "deleted task");
                Ok(task)
            }
            _ => Err(NoSelection),
        }
    }

    /// Wholesale replacement, used by load.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "replacing store contents");
        self.tasks = tasks;
    }

    /// Display rows with days-left recomputed against `today`.
    pub fn rows_at(&self, today: NaiveDate) -> Vec<TaskRow> {
        self.tasks.iter().map(|t| t.row(today)).collect()
    }

    /// Display rows against the current local date, so days-left is never
    /// stale from add-time.
    pub fn rows(&self) -> Vec<TaskRow> {
        self.rows_at(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn add_appends_and_rows_recompute() {
        let mut store = TaskStore::new();
        store.add("Submit report", "2099-01-01").unwrap();

        let rows = store.rows_at(date("2025-01-01"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Submit report");
        assert_eq!(rows[0].due_date, date("2099-01-01"));
        assert_eq!(rows[0].days_left, 27028);

        // Same store, later "today": the derived column moves.
        let rows = store.rows_at(date("2025-01-02"));
        assert_eq!(rows[0].days_left, 27027);
    }

    #[test]
    fn add_trims_inputs() {
        let mut store = TaskStore::new();
        store.add("  pay rent  ", " 2025-02-01 ").unwrap();
        assert_eq!(store.tasks()[0].description, "pay rent");
    }

    #[test]
    fn add_empty_field_never_mutates() {
        let mut store = TaskStore::new();
        assert!(matches!(store.add("", "2025-01-01"), Err(AddError::EmptyInput)));
        assert!(matches!(store.add("x", ""), Err(AddError::EmptyInput)));
        assert!(matches!(store.add("   ", "   "), Err(AddError::EmptyInput)));
        assert!(store.is_empty());
    }

    #[test]
    fn empty_check_wins_over_bad_date() {
        let mut store = TaskStore::new();
        assert!(matches!(store.add("", "nope"), Err(AddError::EmptyInput)));
    }

    #[test]
    fn add_bad_date_never_mutates() {
        let mut store = TaskStore::new();
        assert!(matches!(
            store.add("x", "not-a-date"),
            Err(AddError::DateParse(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_removes_selected_and_keeps_order() {
        let mut store = TaskStore::new();
        store.add("a", "2025-01-01").unwrap();
        store.add("b", "2025-01-02").unwrap();
        store.add("c", "2025-01-03").unwrap();

        let removed = store.delete(Some(1)).unwrap();
        assert_eq!(removed.description, "b");
        let names: Vec<_> = store.tasks().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn delete_without_selection_leaves_store_unchanged() {
        let mut store = TaskStore::new();
        store.add("a", "2025-01-01").unwrap();
        assert!(store.delete(None).is_err());
        assert!(store.delete(Some(5)).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn replace_all_swaps_contents() {
        let mut store = TaskStore::new();
        store.add("old", "2025-01-01").unwrap();
        store.replace_all(vec![Task::new("new", date("2025-06-01"))]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].description, "new");
    }
}
