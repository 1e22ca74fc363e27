use chrono::NaiveDate;

/// Due dates are always written and parsed as `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single tracked deadline.
///
/// Days-left is never stored; it is derived from the due date and the
/// current date whenever a row is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub due_date: NaiveDate,
}

impl Task {
    pub fn new(description: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            due_date,
        }
    }

    /// Signed day difference `due_date - today`; negative once overdue.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    pub fn row(&self, today: NaiveDate) -> TaskRow {
        TaskRow {
            description: self.description.clone(),
            due_date: self.due_date,
            days_left: self.days_left(today),
        }
    }
}

/// One display row for the task table and the upcoming popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub description: String,
    pub due_date: NaiveDate,
    pub days_left: i64,
}

/// Parse a due date in the fixed `YYYY-MM-DD` format.
pub fn parse_due_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn parse_valid_date() {
        assert_eq!(parse_due_date("2025-01-03").unwrap(), date("2025-01-03"));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_due_date("not-a-date").is_err());
        assert!(parse_due_date("03/01/2025").is_err());
    }

    #[test]
    fn days_left_is_signed() {
        let task = Task::new("report", date("2025-01-10"));
        assert_eq!(task.days_left(date("2025-01-01")), 9);
        assert_eq!(task.days_left(date("2025-01-10")), 0);
        assert_eq!(task.days_left(date("2025-01-15")), -5);
    }
}
