//! Application state and key handling.
//!
//! `App` owns the task store and all transient UI state (input fields,
//! selection, popups). It does no rendering; `ui.rs` draws from it.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::persist;
use crate::query;
use crate::store::TaskStore;
use crate::task::TaskRow;

/// Which input field is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    Description,
    DueDate,
}

/// Interaction mode: browsing the table or filling the add form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Editing(InputFocus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Modal message shown over the table until any key is pressed.
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub store: TaskStore,
    pub tasks_file: PathBuf,
    pub mode: Mode,
    pub description_input: String,
    pub date_input: String,
    pub selected: Option<usize>,
    pub message: Option<Message>,
    pub upcoming: Option<Vec<TaskRow>>,
    pub should_quit: bool,
}

impl App {
    pub fn new(tasks_file: PathBuf) -> Self {
        Self {
            store: TaskStore::new(),
            tasks_file,
            mode: Mode::Normal,
            description_input: String::new(),
            date_input: String::new(),
            selected: None,
            message: None,
            upcoming: None,
            should_quit: false,
        }
    }

    /// Load the task file into the store.
    ///
    /// On a malformed line the rows read before it are still applied and
    /// the error is shown in the modal (the load is not atomic).
    pub fn load(&mut self) {
        match persist::load(&self.tasks_file) {
            Ok(tasks) => {
                self.store.replace_all(tasks);
            }
            Err(e) => {
                warn!(path = %self.tasks_file.display(), "load failed: {e}");
                let text = e.to_string();
                self.store.replace_all(e.into_partial());
                self.message = Some(Message::error(text));
            }
        }
        self.selected = if self.store.is_empty() { None } else { Some(0) };
    }

    /// Handle a key event. Quit is signaled through `should_quit`.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C quits from anywhere.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Popups are modal: the next key dismisses them.
        if self.message.take().is_some() {
            return;
        }
        if self.upcoming.is_some() {
            self.upcoming = None;
            return;
        }

        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Editing(focus) => self.handle_editing_key(key, focus),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.mode = Mode::Editing(InputFocus::Description),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('u') => self.show_upcoming_at(Local::now().date_naive()),
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent, focus: InputFocus) {
        match key.code {
            KeyCode::Esc => {
                self.description_input.clear();
                self.date_input.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Tab => {
                self.mode = Mode::Editing(match focus {
                    InputFocus::Description => InputFocus::DueDate,
                    InputFocus::DueDate => InputFocus::Description,
                });
            }
            KeyCode::Enter => match focus {
                InputFocus::Description => self.mode = Mode::Editing(InputFocus::DueDate),
                InputFocus::DueDate => self.submit_add(),
            },
            KeyCode::Backspace => {
                self.focused_input_mut(focus).pop();
            }
            KeyCode::Char(c) => {
                self.focused_input_mut(focus).push(c);
            }
            _ => {}
        }
    }

    fn focused_input_mut(&mut self, focus: InputFocus) -> &mut String {
        match focus {
            InputFocus::Description => &mut self.description_input,
            InputFocus::DueDate => &mut self.date_input,
        }
    }

    /// Validate the form and append to the store. On failure the modal
    /// shows why and the form keeps its content for correction.
    fn submit_add(&mut self) {
        match self.store.add(&self.description_input, &self.date_input) {
            Ok(task) => {
                info!(description = %task.description, due = %task.due_date, "task added");
                self.description_input.clear();
                self.date_input.clear();
                self.mode = Mode::Normal;
                if self.selected.is_none() {
                    self.selected = Some(self.store.len() - 1);
                }
            }
            Err(e) => {
                warn!("add rejected: {e}");
                self.message = Some(Message::error(e.to_string()));
            }
        }
    }

    fn delete_selected(&mut self) {
        match self.store.delete(self.selected) {
            Ok(task) => {
                info!(description = %task.description, "task deleted");
                self.selected = if self.store.is_empty() {
                    None
                } else {
                    // Keep the cursor in place, clamped to the last row.
                    Some(self.selected.unwrap_or(0).min(self.store.len() - 1))
                };
            }
            Err(e) => {
                self.message = Some(Message::error(e.to_string()));
            }
        }
    }

    fn save(&mut self) {
        match persist::save(self.store.tasks(), &self.tasks_file) {
            Ok(()) => {
                self.message = Some(Message::info("Tasks saved successfully!"));
            }
            Err(e) => {
                warn!(path = %self.tasks_file.display(), "save failed: {e}");
                self.message = Some(Message::error(format!("Error saving tasks: {e}")));
            }
        }
    }

    /// Open the read-only upcoming popup for the week starting `today`.
    pub fn show_upcoming_at(&mut self, today: NaiveDate) {
        self.upcoming = Some(query::upcoming(self.store.tasks(), today));
    }

    fn select_previous(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.saturating_sub(1));
        } else if !self.store.is_empty() {
            self.selected = Some(0);
        }
    }

    fn select_next(&mut self) {
        if let Some(i) = self.selected {
            if i + 1 < self.store.len() {
                self.selected = Some(i + 1);
            }
        } else if !self.store.is_empty() {
            self.selected = Some(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn app() -> App {
        App::new(PathBuf::from("tasks.txt"))
    }

    #[test]
    fn add_flow_populates_store_and_clears_form() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.mode, Mode::Editing(InputFocus::Description));

        type_text(&mut app, "Submit report");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Editing(InputFocus::DueDate));

        type_text(&mut app, "2099-01-01");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.tasks()[0].description, "Submit report");
        assert!(app.description_input.is_empty());
        assert!(app.date_input.is_empty());
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn bad_date_shows_modal_and_keeps_form() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "x");
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "not-a-date");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.store.is_empty());
        let message = app.message.as_ref().expect("modal expected");
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(app.date_input, "not-a-date");

        // Any key dismisses the modal; the form is still being edited.
        app.handle_key(key(KeyCode::Char('z')));
        assert!(app.message.is_none());
        assert_eq!(app.mode, Mode::Editing(InputFocus::DueDate));
        assert_eq!(app.date_input, "not-a-date");
    }

    #[test]
    fn empty_form_shows_empty_field_warning() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Enter));

        assert!(app.store.is_empty());
        assert!(app.message.is_some());
    }

    #[test]
    fn escape_cancels_editing_without_mutating_store() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "half-typed");
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.mode, Mode::Normal);
        assert!(app.store.is_empty());
        assert!(app.description_input.is_empty());
    }

    #[test]
    fn delete_without_selection_warns() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('d')));
        let message = app.message.as_ref().expect("modal expected");
        assert_eq!(message.kind, MessageKind::Error);
    }

    #[test]
    fn delete_clamps_selection() {
        let mut app = app();
        app.store.add("a", "2025-01-01").unwrap();
        app.store.add("b", "2025-01-02").unwrap();
        app.selected = Some(1);

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.selected, Some(0));

        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.store.is_empty());
        assert_eq!(app.selected, None);
    }

    #[test]
    fn selection_moves_within_bounds() {
        let mut app = app();
        app.store.add("a", "2025-01-01").unwrap();
        app.store.add("b", "2025-01-02").unwrap();

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected, Some(0));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected, Some(1));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected, Some(1));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected, Some(0));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn upcoming_popup_opens_and_any_key_dismisses() {
        let mut app = app();
        app.store.add("near", "2025-01-03").unwrap();
        app.store.add("far", "2025-01-10").unwrap();

        app.show_upcoming_at("2025-01-01".parse().unwrap());
        let rows = app.upcoming.as_ref().expect("popup expected");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "near");
        assert_eq!(rows[0].days_left, 2);

        app.handle_key(key(KeyCode::Esc));
        assert!(app.upcoming.is_none());
    }

    #[test]
    fn save_reports_success_and_writes_file() {
        let dir = tempdir().unwrap();
        let mut app = App::new(dir.path().join("tasks.txt"));
        app.store.add("a", "2025-01-01").unwrap();

        app.handle_key(key(KeyCode::Char('s')));
        let message = app.message.as_ref().expect("modal expected");
        assert_eq!(message.kind, MessageKind::Info);
        assert_eq!(
            fs::read_to_string(dir.path().join("tasks.txt")).unwrap(),
            "a,2025-01-01\n"
        );
    }

    #[test]
    fn save_error_surfaces_io_text() {
        let dir = tempdir().unwrap();
        // A directory path cannot be created as a file.
        let mut app = App::new(dir.path().to_path_buf());
        app.handle_key(key(KeyCode::Char('s')));
        let message = app.message.as_ref().expect("modal expected");
        assert_eq!(message.kind, MessageKind::Error);
        assert!(message.text.starts_with("Error saving tasks:"));
    }

    #[test]
    fn load_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let mut app = App::new(dir.path().join("tasks.txt"));
        app.load();
        assert!(app.store.is_empty());
        assert!(app.message.is_none());
        assert_eq!(app.selected, None);
    }

    #[test]
    fn load_keeps_partial_rows_on_bad_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        fs::write(&path, "ok,2025-01-01\nbroken,nope\n").unwrap();

        let mut app = App::new(path);
        app.load();

        // Non-atomic by design: the first row survives, the error shows.
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.tasks()[0].description, "ok");
        let message = app.message.as_ref().expect("modal expected");
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn quit_key_sets_flag() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_even_while_editing() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
