//! Error kinds for store mutations and persistence.
//!
//! Every fallible operation returns one of these instead of pushing a
//! dialog itself; the TUI maps them to the modal popup, and tests assert
//! on the kinds directly.

use thiserror::Error;

use crate::task::Task;

/// Why an add was rejected. The store is untouched in either case.
#[derive(Debug, Error)]
pub enum AddError {
    #[error("Please enter both a task and a due date.")]
    EmptyInput,

    #[error("Invalid date format! Use YYYY-MM-DD")]
    DateParse(#[from] chrono::ParseError),
}

/// Delete was requested with no row selected.
#[derive(Debug, Error)]
#[error("Select a task to delete.")]
pub struct NoSelection;

/// Why a load aborted.
///
/// The line-level variants carry the rows parsed before the failing line:
/// the caller applies them to the store before reporting the error,
/// keeping the original non-atomic load behavior.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error loading tasks: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error loading tasks: line {line} has no due date field")]
    MissingField { line: usize, partial: Vec<Task> },

    #[error("Error loading tasks: line {line} has an invalid due date: {source}")]
    DateParse {
        line: usize,
        #[source]
        source: chrono::ParseError,
        partial: Vec<Task>,
    },
}

impl LoadError {
    /// Rows that were read before the load aborted.
    pub fn into_partial(self) -> Vec<Task> {
        match self {
            LoadError::Io(_) => Vec::new(),
            LoadError::MissingField { partial, .. } => partial,
            LoadError::DateParse { partial, .. } => partial,
        }
    }
}
