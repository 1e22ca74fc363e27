//! Flat-file persistence: one `description,YYYY-MM-DD` line per task.
//!
//! No quoting or escaping; a comma inside a description corrupts the
//! round trip. Known format limitation, kept as-is.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::task::{parse_due_date, Task, DATE_FORMAT};

/// Overwrite `path` with the whole store, one line per task.
///
/// Saving an empty store truncates the file. I/O errors surface to the
/// caller without retry.
pub fn save(tasks: &[Task], path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for task in tasks {
        writeln!(
            writer,
            "{},{}",
            task.description,
            task.due_date.format(DATE_FORMAT)
        )?;
    }
    writer.flush()?;
    info!(count = tasks.len(), path = %path.display(), "saved tasks");
    Ok(())
}

/// Read the whole task file.
///
/// A missing file is an empty store, not an error. Each line is split on
/// its first comma; a missing or unparseable date field aborts the load,
/// carrying the rows read so far (see [`LoadError`]).
pub fn load(path: &Path) -> Result<Vec<Task>, LoadError> {
    if !path.exists() {
        debug!(path = %path.display(), "no task file yet, starting empty");
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut tasks = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;

        let Some((description, date_str)) = line.split_once(',') else {
            warn!(line = number, "task line has no due date field");
            return Err(LoadError::MissingField {
                line: number,
                partial: std::mem::take(&mut tasks),
            });
        };

        match parse_due_date(date_str.trim()) {
            Ok(due_date) => tasks.push(Task::new(description, due_date)),
            Err(source) => {
                warn!(line = number, %date_str, "task line has an invalid due date");
                return Err(LoadError::DateParse {
                    line: number,
                    source,
                    partial: std::mem::take(&mut tasks),
                });
            }
        }
    }

    info!(count = tasks.len(), path = %path.display(), "loaded tasks");
    Ok(tasks)
}
